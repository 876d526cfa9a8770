use std::path::Path;

use thiserror::Error;
use tracing::info;

pub mod cache;
pub mod normalize;
pub mod payload;

pub use normalize::{normalize, parse_report};

use crate::model::Report;

/// Failure to turn a payload into a [`Report`]. Fatal to that load only: the
/// previously active report stays in place.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed report: {0}")]
    Malformed(String),

    #[error("shape mismatch in {field}: {detail}")]
    ShapeMismatch { field: &'static str, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads and normalizes a payload file (`.json` or `.json.gz`).
pub fn load_report(path: &Path) -> Result<Report, ReportError> {
    let text = cache::read_maybe_gz(path)?;
    let report = parse_report(&text)?;
    info!(
        path = %path.display(),
        report_id = %report.id,
        observations = report.observation_count(),
        features = report.known_features().len(),
        "loaded report"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
