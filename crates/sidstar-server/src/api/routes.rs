//! REST API routes.

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::api::{charts, request_id, score};
use crate::config::Config;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    let api_routes = Router::new()
        .route("/api/charts/:airport_id", get(charts::get_charts_by_airport))
        .route("/api/chart/:chart_id", get(charts::get_chart))
        .route("/api/score", post(score::calculate_score));

    Router::new()
        .route("/", get(|| async { "SID/STAR Trainer API is running." }))
        .route("/health", get(|| async { "OK" }))
        .merge(api_routes)
        .nest_service("/data", ServeDir::new(&config.static_dir))
        .layer(cors_layer(&config.cors_origin))
        .layer(TraceLayer::new_for_http().make_span_with(request_id::request_span))
        .layer(middleware::from_fn(request_id::assign_request_id))
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin.trim() == "*" {
        return CorsLayer::permissive();
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match HeaderValue::from_str(origin.trim()) {
        Ok(origin) => layer.allow_origin(origin),
        Err(err) => {
            tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, err);
            layer
        }
    }
}
