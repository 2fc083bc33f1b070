//! Route scoring endpoint.
//!
//! The body is parsed as JSON whatever its `Content-Type`. An empty body reads
//! as an empty request, and every rejection answers `400` with a
//! `{"message": ...}` body like the rest of this API.

use axum::{
    body::Bytes,
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sidstar_core::{score_route, Lenient, PracticeMode, ScoreResult, UserWaypoint};
use std::sync::Arc;

use crate::api::request_id::RequestId;
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message })))
}

/// Validated score request.
#[derive(Debug)]
pub struct ScoreRequest {
    pub map_id: String,
    pub waypoints: Vec<Lenient<UserWaypoint>>,
    pub practice_mode: Option<PracticeMode>,
}

impl ScoreRequest {
    /// Parse raw request bytes, then check the envelope.
    pub fn from_bytes(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::from_body(Value::Null);
        }
        let body = serde_json::from_slice(body).map_err(|err| {
            tracing::info!("Rejected score body: {}", err);
            bad_request("Request body must be valid JSON")
        })?;
        Self::from_body(body)
    }

    /// Check the request envelope. Individual waypoints are never rejected here.
    pub fn from_body(body: Value) -> Result<Self, ApiError> {
        let map_id = match body.get("mapId") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(bad_request("Missing mapId")),
        };

        let waypoints = match body.get("waypoints") {
            Some(waypoints @ Value::Array(_)) => serde_json::from_value(waypoints.clone())
                .map_err(|_| bad_request("Waypoints must be an array"))?,
            _ => return Err(bad_request("Waypoints must be an array")),
        };

        // A missing, null or non-string mode falls back to name matching.
        let practice_mode = body
            .get("practiceMode")
            .filter(|mode| mode.is_string())
            .and_then(|mode| serde_json::from_value(mode.clone()).ok());

        Ok(Self {
            map_id,
            waypoints,
            practice_mode,
        })
    }
}

/// Score a submitted route against the stored chart.
pub async fn calculate_score(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ScoreResult>, ApiError> {
    let request = ScoreRequest::from_bytes(&body)?;
    tracing::info!(
        "[{}] Processing score request for {} ({} waypoints, mode {:?})",
        request_id,
        request.map_id,
        request.waypoints.len(),
        request.practice_mode
    );

    let chart = state
        .get_chart(&request.map_id)
        .await
        .map_err(|err| {
            tracing::error!(
                "[{}] Failed to load chart {}: {}",
                request_id,
                request.map_id,
                err
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Server error calculating score"
                })),
            )
        })?
        .ok_or_else(|| {
            tracing::info!("[{}] Chart {} not found", request_id, request.map_id);
            (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "message": "Chart not found"
                })),
            )
        })?;

    let result = score_route(&chart.fixes, &request.waypoints, request.practice_mode);
    tracing::info!("[{}] Score calculated for {}: {}", request_id, chart.id, result.score);

    Ok(Json(result))
}
