//! API routes for the SID/STAR trainer server.

pub mod charts;
pub mod request_id;
mod routes;
pub mod score;

use crate::config::Config;
use axum::Router;

pub fn routes(config: &Config) -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router(config)
}

#[cfg(test)]
mod tests;
