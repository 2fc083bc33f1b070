//! Blocking HTTP client for the trainer API.

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use sidstar_core::{Chart, Lenient, PracticeMode, ScoreResult, UserWaypoint};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreRequest<'a> {
    map_id: &'a str,
    waypoints: &'a [Lenient<UserWaypoint>],
    #[serde(skip_serializing_if = "Option::is_none")]
    practice_mode: Option<PracticeMode>,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the SID/STAR trainer server.
pub struct TrainerClient {
    client: Client,
    base_url: String,
}

impl TrainerClient {
    /// Create a client for a server root such as `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn charts_url(&self, airport_id: &str) -> String {
        format!("{}/api/charts/{}", self.base_url, airport_id.trim().to_uppercase())
    }

    pub fn score_url(&self) -> String {
        format!("{}/api/score", self.base_url)
    }

    /// Fetch every chart published for an airport.
    pub fn list_charts(&self, airport_id: &str) -> Result<Vec<Chart>> {
        let response = self
            .client
            .get(self.charts_url(airport_id))
            .send()
            .context("Failed to fetch charts. Is the backend running?")?;

        read_json(response)
    }

    /// Submit a route for scoring. Without a mode the server matches fixes by name.
    pub fn submit_route(
        &self,
        map_id: &str,
        waypoints: &[Lenient<UserWaypoint>],
        mode: Option<PracticeMode>,
    ) -> Result<ScoreResult> {
        let request = ScoreRequest {
            map_id,
            waypoints,
            practice_mode: mode,
        };

        let response = self
            .client
            .post(self.score_url())
            .json(&request)
            .send()
            .context("Failed to submit route")?;

        read_json(response)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ApiMessage>()
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("Backend error: {}", status));
        bail!("{} ({})", message, status.as_u16());
    }
    response.json().context("Failed to parse server response")
}

/// Read a JSON array of waypoints from disk. Malformed entries are kept for the server to skip.
pub fn load_waypoints(path: &Path) -> Result<Vec<Lenient<UserWaypoint>>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_waypoints(&raw).with_context(|| format!("Invalid waypoint file {}", path.display()))
}

pub fn parse_waypoints(raw: &str) -> Result<Vec<Lenient<UserWaypoint>>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_array() {
        bail!("Waypoints must be an array");
    }
    Ok(serde_json::from_value(value)?)
}
