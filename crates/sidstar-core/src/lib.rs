pub mod altitude;
pub mod models;
pub mod scoring;

pub use altitude::{format_altitude, parse_altitude, RawAltitude, NO_CONSTRAINT};
pub use models::{
    Chart, ChartDocument, ChartError, ChartType, Facets, Lenient, PracticeMode, ReferenceFix,
    ScoreResult, UserWaypoint,
};
pub use scoring::{score_by_name, score_by_position, score_route};
