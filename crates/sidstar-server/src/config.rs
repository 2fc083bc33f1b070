//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    /// Allowed browser origin; `*` allows any.
    pub cors_origin: String,
    /// Directory served under `/data` (chart images).
    pub static_dir: String,
    pub chart_cache_ttl_s: u64,
    pub chart_cache_max_entries: usize,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SIDSTAR_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            database_path: env::var("SIDSTAR_DATABASE_PATH")
                .unwrap_or_else(|_| "data/sidstar.db".to_string()),
            database_max_connections: env::var("SIDSTAR_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|value| *value > 0)
                .unwrap_or(5),
            cors_origin: env::var("SIDSTAR_CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            static_dir: env::var("SIDSTAR_STATIC_DIR").unwrap_or_else(|_| "data".to_string()),
            chart_cache_ttl_s: env::var("SIDSTAR_CHART_CACHE_TTL_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
            chart_cache_max_entries: env::var("SIDSTAR_CHART_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(256),
            log_json: env::var("SIDSTAR_LOG_JSON")
                .map(|value| matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}
