//! Core data models for the SID/STAR trainer.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::altitude::RawAltitude;

/// Errors raised while building chart records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("chart document has no id")]
    MissingId,
    #[error("unknown chart type '{0}' (expected SID or STAR)")]
    InvalidType(String),
    #[error("unknown practice mode '{0}' (expected FULL, NO_ALT, NO_FIX or CLEAN)")]
    InvalidMode(String),
}

/// A sequence element that is either well formed or kept as the raw JSON it arrived as.
///
/// Stored charts and user submissions are not trusted to be uniform; malformed
/// entries are carried through so the scorer can skip them in place. Only JSON
/// objects can be valid: arrays, strings, numbers and nulls are always malformed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Malformed(serde_json::Value),
}

impl<'de, T> Deserialize<'de> for Lenient<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Ok(Lenient::Malformed(value));
        }
        Ok(match T::deserialize(&value) {
            Ok(valid) => Lenient::Valid(valid),
            Err(_) => Lenient::Malformed(value),
        })
    }
}

impl<T> Lenient<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Malformed(_) => None,
        }
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Valid(value)
    }
}

/// Strings pass through, numbers are stringified, anything else reads as missing.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

/// A fix on the published procedure, as stored with its chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFix {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub fix_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub min_alt: RawAltitude,
    #[serde(default)]
    pub max_alt: RawAltitude,
    /// Screen position on the chart image. Display only.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl ReferenceFix {
    pub fn new(
        fix_name: impl Into<String>,
        min_alt: impl Into<RawAltitude>,
        max_alt: impl Into<RawAltitude>,
    ) -> Self {
        Self {
            fix_name: Some(fix_name.into()),
            min_alt: min_alt.into(),
            max_alt: max_alt.into(),
            ..Default::default()
        }
    }

    /// The fix identifier: `fix_name` first, then `name`. Empty strings count as missing.
    pub fn display_name(&self) -> Option<&str> {
        self.fix_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.name.as_deref().filter(|name| !name.is_empty()))
    }
}

/// A waypoint placed by the user, submitted for scoring. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWaypoint {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub min_altitude: RawAltitude,
    #[serde(default)]
    pub max_altitude: RawAltitude,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl UserWaypoint {
    pub fn new(
        name: impl Into<String>,
        min_altitude: impl Into<RawAltitude>,
        max_altitude: impl Into<RawAltitude>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            min_altitude: min_altitude.into(),
            max_altitude: max_altitude.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartType {
    /// Standard Instrument Departure
    #[serde(rename = "SID")]
    Sid,
    /// Standard Terminal Arrival Route
    #[serde(rename = "STAR")]
    Star,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Sid => "SID",
            ChartType::Star => "STAR",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "SID" => Ok(ChartType::Sid),
            "STAR" => Ok(ChartType::Star),
            _ => Err(ChartError::InvalidType(value.to_string())),
        }
    }
}

/// Which chart variant the user practices on, and therefore which facets are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PracticeMode {
    /// Full chart; names and altitudes entered.
    Full,
    /// Altitudes hidden on the chart; only altitudes are scored.
    NoAlt,
    /// Fix names hidden on the chart; only names are scored.
    NoFix,
    /// Route line only; names and altitudes entered.
    Clean,
    /// Any unrecognized tag. Scored like `FULL`.
    #[serde(other)]
    Other,
}

impl PracticeMode {
    pub fn facets(&self) -> Facets {
        match self {
            PracticeMode::NoAlt => Facets::AltitudesOnly,
            PracticeMode::NoFix => Facets::NamesOnly,
            PracticeMode::Full | PracticeMode::Clean | PracticeMode::Other => Facets::Both,
        }
    }
}

impl FromStr for PracticeMode {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().replace('-', "_").as_str() {
            "FULL" => Ok(PracticeMode::Full),
            "NO_ALT" => Ok(PracticeMode::NoAlt),
            "NO_FIX" => Ok(PracticeMode::NoFix),
            "CLEAN" => Ok(PracticeMode::Clean),
            _ => Err(ChartError::InvalidMode(value.to_string())),
        }
    }
}

/// The facets of a route that a practice mode scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facets {
    Both,
    NamesOnly,
    AltitudesOnly,
}

impl Facets {
    pub fn names(&self) -> bool {
        matches!(self, Facets::Both | Facets::NamesOnly)
    }

    pub fn altitudes(&self) -> bool {
        matches!(self, Facets::Both | Facets::AltitudesOnly)
    }

    /// Human-readable name of what is being scored.
    pub fn label(&self) -> &'static str {
        match self {
            Facets::Both => "Procedure",
            Facets::AltitudesOnly => "Altitude Constraints",
            Facets::NamesOnly => "Fix Names",
        }
    }
}

/// A published SID or STAR with its reference route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    #[serde(rename = "_id")]
    pub id: String,
    pub airport_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    /// Full chart image.
    pub map_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_url_no_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_url_no_fix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_url_clean: Option<String>,
    /// Ordered reference route.
    #[serde(default)]
    pub fixes: Vec<Lenient<ReferenceFix>>,
}

impl Chart {
    /// The chart image matching a practice mode, falling back to the full chart.
    pub fn map_url_for(&self, mode: Option<PracticeMode>) -> &str {
        let variant = match mode {
            Some(PracticeMode::NoAlt) => self.map_url_no_alt.as_deref(),
            Some(PracticeMode::NoFix) => self.map_url_no_fix.as_deref(),
            Some(PracticeMode::Clean) => self.map_url_clean.as_deref(),
            _ => None,
        };
        variant
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.map_url)
    }
}

/// Chart file format used for seeding the store.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartDocument {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(default)]
    pub map_url: String,
    #[serde(default)]
    pub map_url_no_alt: Option<String>,
    #[serde(default)]
    pub map_url_no_fix: Option<String>,
    #[serde(default)]
    pub map_url_clean: Option<String>,
    #[serde(default)]
    pub fixes: Vec<Lenient<ReferenceFix>>,
}

impl ChartDocument {
    /// Build the stored chart. The airport is the id prefix, e.g. `LLBG` in `LLBG-SUVAS1`.
    pub fn into_chart(self) -> Result<Chart, ChartError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ChartError::MissingId);
        }
        let airport_id = id
            .split('-')
            .next()
            .unwrap_or(id.as_str())
            .to_uppercase();

        Ok(Chart {
            id,
            airport_id,
            name: self.name,
            chart_type: self.chart_type,
            map_url: self.map_url,
            map_url_no_alt: self.map_url_no_alt,
            map_url_no_fix: self.map_url_no_fix,
            map_url_clean: self.map_url_clean,
            fixes: self.fixes,
        })
    }
}

/// Outcome of scoring one submitted route against a chart.
///
/// Per-facet fields are omitted from JSON entirely when the facet was not scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Percentage, 0 to 100.
    pub score: u8,
    pub total_fixes: usize,
    /// Fixes where every scored facet was right.
    pub correct_fixes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_altitudes: Option<usize>,
    #[serde(default)]
    pub altitude_errors: Vec<String>,
    #[serde(default)]
    pub missed_fixes: Vec<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_accuracy: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_accuracy: Option<u8>,
}
