//! Altitude constraint normalization.
//!
//! Chart documents and user submissions carry altitude bounds in whatever
//! shape the author typed: numbers, numeric strings, flight-level text such as
//! `"FL080"`, grouped digits like `"5 000"`, empty strings or nothing at all.
//! Everything is folded into a single integer encoding where
//! [`NO_CONSTRAINT`] (`-1`) means "unconstrained" and every other value is a
//! plain integer read from the digits of the input.

use serde::{Deserialize, Serialize};

/// Canonical encoding for "no altitude constraint".
pub const NO_CONSTRAINT: i64 = -1;

/// An altitude value as it arrives on the wire, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAltitude {
    /// Field missing or JSON `null`.
    #[default]
    Absent,
    Number(serde_json::Number),
    Text(String),
    /// Booleans, arrays or objects. Read through their JSON text.
    Other(serde_json::Value),
}

impl RawAltitude {
    /// String form used for digit extraction. `None` means there is nothing to read.
    fn text(&self) -> Option<String> {
        match self {
            RawAltitude::Absent => None,
            RawAltitude::Text(text) if text.is_empty() => None,
            RawAltitude::Text(text) => Some(text.clone()),
            RawAltitude::Number(number) => Some(number_text(number)),
            RawAltitude::Other(value) => Some(value.to_string()),
        }
    }
}

impl From<i64> for RawAltitude {
    fn from(value: i64) -> Self {
        RawAltitude::Number(value.into())
    }
}

impl From<&str> for RawAltitude {
    fn from(value: &str) -> Self {
        RawAltitude::Text(value.to_string())
    }
}

impl From<String> for RawAltitude {
    fn from(value: String) -> Self {
        RawAltitude::Text(value)
    }
}

impl<T: Into<RawAltitude>> From<Option<T>> for RawAltitude {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Whole-valued floats print without a fractional part, so `5000.0` reads as `5000`.
fn number_text(number: &serde_json::Number) -> String {
    if let Some(value) = number.as_i64() {
        return value.to_string();
    }
    if let Some(value) = number.as_u64() {
        return value.to_string();
    }
    match number.as_f64() {
        Some(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 => {
            (value as i64).to_string()
        }
        Some(value) => value.to_string(),
        None => number.to_string(),
    }
}

/// Normalize a raw altitude into its canonical integer encoding.
///
/// - absent, `null` or `""` → [`NO_CONSTRAINT`]
/// - text that trims to `"-1"` → [`NO_CONSTRAINT`]
/// - otherwise every non-digit is dropped and the remaining run is read as an
///   integer; no digits at all reads as `0` (ground level, not "unknown")
/// - a digit run too long to represent → [`NO_CONSTRAINT`]
pub fn parse_altitude(raw: &RawAltitude) -> i64 {
    let Some(text) = raw.text() else {
        return NO_CONSTRAINT;
    };

    let text = text.trim();
    if text == "-1" {
        return NO_CONSTRAINT;
    }

    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }

    match digits.parse::<i64>() {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("Unreadable altitude {:?}: {}", text, err);
            NO_CONSTRAINT
        }
    }
}

/// Render a canonical altitude for diagnostics; [`NO_CONSTRAINT`] reads as `None`.
pub fn format_altitude(value: i64) -> String {
    if value == NO_CONSTRAINT {
        "None".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn parse_json(value: serde_json::Value) -> i64 {
        let raw: RawAltitude = serde_json::from_value(value).unwrap();
        parse_altitude(&raw)
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(parse_altitude(&"5000".into()), 5000);
        assert_eq!(parse_altitude(&"FL080".into()), 80);
        assert_eq!(parse_altitude(&" 5 000 ".into()), 5000);
        assert_eq!(parse_altitude(&"".into()), NO_CONSTRAINT);
        assert_eq!(parse_altitude(&RawAltitude::Absent), NO_CONSTRAINT);
        assert_eq!(parse_altitude(&"abc".into()), 0);
        assert_eq!(parse_altitude(&"-1".into()), NO_CONSTRAINT);
        assert_eq!(parse_altitude(&5000.into()), 5000);
    }

    #[test]
    fn test_missing_values_are_unconstrained() {
        assert_eq!(parse_json(json!(null)), NO_CONSTRAINT);
        assert_eq!(parse_json(json!("")), NO_CONSTRAINT);
        assert_eq!(parse_altitude(&RawAltitude::from(None::<i64>)), NO_CONSTRAINT);
    }

    #[test]
    fn test_whitespace_only_reads_as_ground_level() {
        // Non-empty input with no digits collapses to zero, not to "unconstrained".
        assert_eq!(parse_altitude(&"   ".into()), 0);
    }

    #[test]
    fn test_json_numbers() {
        assert_eq!(parse_json(json!(-1)), NO_CONSTRAINT);
        assert_eq!(parse_json(json!(3000)), 3000);
        assert_eq!(parse_json(json!(3000.0)), 3000);
        assert_eq!(parse_json(json!(" -1 ")), NO_CONSTRAINT);
        assert_eq!(parse_json(json!(-500)), 500);
    }

    #[test]
    fn test_other_json_shapes() {
        assert_eq!(parse_json(json!(true)), 0);
        assert_eq!(parse_json(json!([7000])), 7000);
    }

    #[test]
    fn test_overflowing_digits_are_unconstrained() {
        assert_eq!(parse_altitude(&"99999999999999999999999".into()), NO_CONSTRAINT);
    }

    #[test]
    fn test_format_altitude() {
        assert_eq!(format_altitude(NO_CONSTRAINT), "None");
        assert_eq!(format_altitude(0), "0");
        assert_eq!(format_altitude(5000), "5000");
    }

    proptest! {
        #[test]
        fn parse_is_idempotent(text in ".{0,16}") {
            let once = parse_altitude(&RawAltitude::from(text.as_str()));
            let twice = parse_altitude(&RawAltitude::from(once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn parse_never_goes_below_sentinel(value in any::<i64>()) {
            prop_assert!(parse_altitude(&RawAltitude::from(value)) >= NO_CONSTRAINT);
        }
    }
}
