//! SID/STAR CLI - Command line tools for the trainer API.
//!
//! Binaries:
//! - list_charts: list the procedures published for an airport
//! - submit_route: score a waypoint file against a chart

pub mod client;

pub use client::{load_waypoints, parse_waypoints, TrainerClient};
