//! Route scoring against a chart's reference fixes.
//!
//! Two matching strategies are supported:
//!
//! - **Name matched** ([`score_by_name`]): each reference fix is looked up in
//!   the submission by name, order is ignored, and names and altitudes are
//!   scored together (2 points for the name, 1 each for min and max).
//! - **Position matched** ([`score_by_position`]): the i-th submitted
//!   waypoint is compared with the i-th reference fix, and the practice mode
//!   decides whether names, altitudes or both are scored.
//!
//! Scoring is pure; malformed fixes and waypoints are skipped in place
//! rather than failing the whole comparison.

use crate::altitude::{format_altitude, parse_altitude};
use crate::models::{Facets, Lenient, PracticeMode, ReferenceFix, ScoreResult, UserWaypoint};

const POINTS_PER_FIX: usize = 4;
const NAME_POINTS: usize = 2;
const GOOD_SCORE_THRESHOLD: u8 = 70;

/// Score a submission. Without a mode the legacy name-matched strategy is used.
pub fn score_route(
    fixes: &[Lenient<ReferenceFix>],
    waypoints: &[Lenient<UserWaypoint>],
    mode: Option<PracticeMode>,
) -> ScoreResult {
    match mode {
        Some(mode) => score_by_position(fixes, waypoints, mode),
        None => score_by_name(fixes, waypoints),
    }
}

/// Score by looking each reference fix up by name, case-insensitively.
pub fn score_by_name(
    fixes: &[Lenient<ReferenceFix>],
    waypoints: &[Lenient<UserWaypoint>],
) -> ScoreResult {
    let submitted = sanitize(waypoints);

    let mut points = 0;
    let mut fully_correct = 0;
    let mut altitude_errors = Vec::new();
    let mut missed_fixes = Vec::new();

    for fix in fixes.iter().filter_map(Lenient::valid) {
        let Some(name) = fix.display_name() else {
            continue;
        };
        let expected = name.to_uppercase();

        let found = submitted.iter().find(|waypoint| {
            waypoint
                .name
                .as_deref()
                .is_some_and(|entered| !entered.is_empty() && entered.to_uppercase() == expected)
        });
        let Some(waypoint) = found else {
            missed_fixes.push(expected);
            continue;
        };

        points += NAME_POINTS;
        let check = AltitudeCheck::compare(&expected, fix, waypoint);
        points += check.points();
        match check.error {
            Some(error) => altitude_errors.push(error),
            None => fully_correct += 1,
        }
    }

    // Malformed entries still count toward the maximum.
    let max_points = fixes.len() * POINTS_PER_FIX;
    let score = percent(points, max_points).round() as u8;

    tracing::debug!(
        score,
        total = fixes.len(),
        missed = missed_fixes.len(),
        "Scored route by name"
    );

    ScoreResult {
        score,
        total_fixes: fixes.len(),
        correct_fixes: fully_correct,
        correct_altitudes: None,
        altitude_errors,
        missed_fixes,
        message: summary_message(score, None),
        scoring_mode: None,
        fix_accuracy: None,
        alt_accuracy: None,
    }
}

/// Score by position, gating names and altitudes on the practice mode.
pub fn score_by_position(
    fixes: &[Lenient<ReferenceFix>],
    waypoints: &[Lenient<UserWaypoint>],
    mode: PracticeMode,
) -> ScoreResult {
    let facets = mode.facets();
    let submitted = sanitize(waypoints);
    let total = fixes.len();

    let mut matched_names = 0;
    let mut matched_altitudes = 0;
    let mut fully_correct = 0;
    let mut altitude_errors = Vec::new();
    let mut missed_fixes = Vec::new();

    for (index, entry) in fixes.iter().enumerate() {
        let Some(fix) = entry.valid() else {
            continue;
        };
        let Some(name) = fix.display_name() else {
            continue;
        };
        let expected = name.trim().to_uppercase();

        let Some(waypoint) = submitted.get(index) else {
            if facets.names() {
                missed_fixes.push(expected.clone());
            }
            if facets.altitudes() {
                altitude_errors.push(format!("{expected}: No waypoint entered."));
            }
            continue;
        };

        let mut all_correct = true;

        if facets.names() {
            let entered = waypoint.name.as_deref().map(str::trim).unwrap_or_default();
            if entered.to_uppercase() == expected {
                matched_names += 1;
            } else {
                all_correct = false;
                let shown = if entered.is_empty() { "Empty" } else { entered };
                missed_fixes.push(format!("{expected} (entered: {shown})"));
            }
        }

        if facets.altitudes() {
            match AltitudeCheck::compare(&expected, fix, waypoint).error {
                Some(error) => {
                    all_correct = false;
                    altitude_errors.push(error);
                }
                None => matched_altitudes += 1,
            }
        }

        if all_correct {
            fully_correct += 1;
        }
    }

    let fix_percent = percent(matched_names, total);
    let alt_percent = percent(matched_altitudes, total);
    let blended = match facets {
        Facets::Both => (fix_percent + alt_percent) / 2.0,
        Facets::NamesOnly => fix_percent,
        Facets::AltitudesOnly => alt_percent,
    };
    let score = blended.round() as u8;
    let label = facets.label();

    tracing::debug!(
        score,
        total,
        mode = ?mode,
        matched_names,
        matched_altitudes,
        "Scored route by position"
    );

    ScoreResult {
        score,
        total_fixes: total,
        correct_fixes: fully_correct,
        correct_altitudes: facets.altitudes().then_some(matched_altitudes),
        altitude_errors,
        missed_fixes,
        message: summary_message(score, Some(label)),
        scoring_mode: Some(label.to_string()),
        fix_accuracy: facets.names().then(|| fix_percent.round() as u8),
        alt_accuracy: facets.altitudes().then(|| alt_percent.round() as u8),
    }
}

/// Drop submitted entries that are not waypoint objects.
fn sanitize(waypoints: &[Lenient<UserWaypoint>]) -> Vec<&UserWaypoint> {
    waypoints.iter().filter_map(Lenient::valid).collect()
}

/// `part / whole` as a percentage; an empty whole scores zero.
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0).min(100.0)
}

fn summary_message(score: u8, label: Option<&str>) -> String {
    match (score, label) {
        (100, Some(label)) => format!("Perfect {label}!"),
        (100, None) => "Perfect Flight!".to_string(),
        (score, _) if score > GOOD_SCORE_THRESHOLD => "Good Job!".to_string(),
        (_, Some(label)) => format!("Check your {}.", label.to_lowercase()),
        (_, None) => "Check your altitude constraints.".to_string(),
    }
}

/// Min/max comparison for one fix after normalization.
struct AltitudeCheck {
    min_matches: bool,
    max_matches: bool,
    error: Option<String>,
}

impl AltitudeCheck {
    fn compare(name: &str, fix: &ReferenceFix, waypoint: &UserWaypoint) -> Self {
        let expected_min = parse_altitude(&fix.min_alt);
        let expected_max = parse_altitude(&fix.max_alt);
        let entered_min = parse_altitude(&waypoint.min_altitude);
        let entered_max = parse_altitude(&waypoint.max_altitude);

        let min_matches = expected_min == entered_min;
        let max_matches = expected_max == entered_max;

        let error = (!min_matches || !max_matches).then(|| {
            let mut message = format!("{name}: ");
            if !min_matches {
                message.push_str(&format!(
                    "Minimum altitude expected {}, got {}. ",
                    format_altitude(expected_min),
                    format_altitude(entered_min)
                ));
            }
            if !max_matches {
                message.push_str(&format!(
                    "Maximum altitude expected {}, got {}.",
                    format_altitude(expected_max),
                    format_altitude(entered_max)
                ));
            }
            message.trim().to_string()
        });

        Self {
            min_matches,
            max_matches,
            error,
        }
    }

    fn points(&self) -> usize {
        usize::from(self.min_matches) + usize::from(self.max_matches)
    }
}
