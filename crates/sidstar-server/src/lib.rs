//! Shared library surface for the SID/STAR trainer server and its tools.

pub mod api;
pub mod cache;
pub mod config;
pub mod logging;
pub mod persistence;
pub mod state;
