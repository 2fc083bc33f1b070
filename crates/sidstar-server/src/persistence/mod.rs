//! Persistence layer for the SID/STAR trainer.
//!
//! Provides SQLite-backed storage for charts. Reads go through the
//! DashMap chart cache held by the application state.

pub mod charts;
pub mod db;

pub use db::{init_database, Database};
