//! SID/STAR Trainer Server - chart lookup and route scoring backend

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

use sidstar_server::config::Config;
use sidstar_server::state::AppState;
use sidstar_server::{api, logging, persistence};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    logging::init_tracing("sidstar_server=debug", config.log_json)?;

    tracing::info!("Starting SID/STAR Trainer Server...");

    let db = persistence::init_database(&config.database_path, config.database_max_connections)
        .await?;
    let state = Arc::new(AppState::with_database(db, config.clone()));

    let app = api::routes(&config).with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("API accessible at http://localhost:{}/api/charts/LLBG", config.server_port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
