//! Chart lookup endpoints.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sidstar_core::{Chart, PracticeMode};
use std::sync::Arc;

use crate::api::request_id::RequestId;
use crate::state::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

/// List every SID and STAR for an airport.
pub async fn get_charts_by_airport(
    State(state): State<Arc<AppState>>,
    Path(airport_id): Path<String>,
) -> Result<Json<Vec<Chart>>, ApiError> {
    let airport_id = airport_id.trim().to_uppercase();

    let charts = state
        .charts_for_airport(&airport_id)
        .await
        .map_err(|err| {
            tracing::error!("Failed to load charts for {}: {}", airport_id, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Internal Server Error fetching charts."
                })),
            )
        })?;

    if charts.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "message": format!("No charts found for airport {}.", airport_id)
            })),
        ));
    }

    tracing::info!("Serving {} charts for {}", charts.len(), airport_id);
    Ok(Json(charts))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Practice mode used to pick the chart image variant.
    pub mode: Option<PracticeMode>,
}

#[derive(Debug, Serialize)]
pub struct ChartView {
    #[serde(flatten)]
    pub chart: Chart,
    /// Image to show for the requested practice mode.
    pub active_map_url: String,
}

/// Get one chart, with the image variant for the requested mode.
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(chart_id): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartView>, ApiError> {
    let chart = state
        .get_chart(&chart_id)
        .await
        .map_err(|err| {
            tracing::error!("[{}] Failed to load chart {}: {}", request_id, chart_id, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Internal Server Error fetching chart."
                })),
            )
        })?
        .ok_or_else(|| {
            tracing::info!("[{}] Chart {} not found", request_id, chart_id);
            (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "message": "Chart not found"
                })),
            )
        })?;

    let active_map_url = chart.map_url_for(query.mode).to_string();
    tracing::info!("[{}] Serving chart {} ({:?})", request_id, chart.id, query.mode);
    Ok(Json(ChartView {
        chart,
        active_map_url,
    }))
}
