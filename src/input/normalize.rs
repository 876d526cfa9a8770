use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::input::ReportError;
use crate::input::cache::content_id;
use crate::input::payload::RawPayload;
use crate::model::{FeatureImportance, Report};

/// Validates a raw payload and builds the index-aligned [`Report`].
///
/// Missing optional keys (`shap_values`, `feature_values`, `base_values`,
/// `feature_encodings`, `feature_names`) normalize to empty containers:
/// importance-only reports are a supported degraded form, not an error.
/// Everything else that does not line up is rejected, never truncated.
pub fn normalize(raw: &Value) -> Result<Report, ReportError> {
    if !raw.is_object() {
        return Err(ReportError::Malformed(
            "report payload must be a JSON object".to_string(),
        ));
    }
    let payload =
        RawPayload::deserialize(raw).map_err(|e| ReportError::Malformed(e.to_string()))?;

    let id = match payload.report_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => content_id(&raw.to_string()),
    };

    let importance_data = payload.importance_data.ok_or_else(|| {
        ReportError::Malformed("missing importance_data.features".to_string())
    })?;
    let features = importance_data.features.ok_or_else(|| {
        ReportError::Malformed("missing importance_data.features".to_string())
    })?;
    let values = importance_data
        .values
        .ok_or_else(|| ReportError::Malformed("missing importance_data.values".to_string()))?;
    if features.len() != values.len() {
        return Err(ReportError::Malformed(format!(
            "importance_data has {} features but {} values",
            features.len(),
            values.len()
        )));
    }
    ensure_unique("importance_data.features", &features)?;
    let importance: Vec<FeatureImportance> = features
        .into_iter()
        .zip(values)
        .map(|(feature, value)| FeatureImportance { feature, value })
        .collect();

    let feature_names = payload.feature_names.unwrap_or_default();
    ensure_unique("feature_names", &feature_names)?;

    let shap_values = payload.shap_values.unwrap_or_default();
    let feature_values = payload.feature_values.unwrap_or_default();
    let base_values = payload
        .base_values
        .map(|b| b.into_vec())
        .unwrap_or_default();
    let feature_encodings = payload.feature_encodings.unwrap_or_default();

    // Without feature_names the importance features name the columns.
    let declared = if feature_names.is_empty() {
        importance.len()
    } else {
        feature_names.len()
    };
    check_rows("shap_values", shap_values.iter().map(Vec::len), declared)?;
    check_rows("feature_values", feature_values.iter().map(Vec::len), declared)?;

    if !shap_values.is_empty()
        && !feature_values.is_empty()
        && shap_values.len() != feature_values.len()
    {
        return Err(ReportError::ShapeMismatch {
            field: "feature_values",
            detail: format!(
                "{} rows but shap_values has {}",
                feature_values.len(),
                shap_values.len()
            ),
        });
    }

    let report = Report {
        id,
        feature_names,
        importance,
        shap_values,
        feature_values,
        base_values,
        feature_encodings,
    };

    let n = report.observation_count();
    let n_base = report.base_values.len();
    if n_base > 1 && n_base != n {
        return Err(ReportError::ShapeMismatch {
            field: "base_values",
            detail: format!("{n_base} values for {n} observations (expected 0, 1 or {n})"),
        });
    }

    audit_feature_references(&report);
    debug!(
        report_id = %report.id,
        features = report.feature_names.len(),
        observations = n,
        "normalized report"
    );
    Ok(report)
}

/// Parses payload text and normalizes it.
pub fn parse_report(text: &str) -> Result<Report, ReportError> {
    let raw: Value = serde_json::from_str(text)
        .map_err(|e| ReportError::Malformed(format!("invalid JSON: {e}")))?;
    normalize(&raw)
}

fn ensure_unique(field: &str, names: &[String]) -> Result<(), ReportError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ReportError::Malformed(format!(
                "{field} contains duplicate feature {name:?}"
            )));
        }
    }
    Ok(())
}

/// Every row must have exactly `width` columns.
fn check_rows(
    field: &'static str,
    lengths: impl Iterator<Item = usize>,
    width: usize,
) -> Result<(), ReportError> {
    for (row, len) in lengths.enumerate() {
        if len != width {
            return Err(ReportError::ShapeMismatch {
                field,
                detail: format!("row {row} has {len} values, expected {width}"),
            });
        }
    }
    Ok(())
}

fn audit_feature_references(report: &Report) {
    if report.feature_names.is_empty() {
        return;
    }
    for entry in &report.importance {
        if report.feature_index(&entry.feature).is_none() {
            warn!(
                feature = %entry.feature,
                "importance feature is not listed in feature_names"
            );
        }
    }
    for feature in report.feature_encodings.keys() {
        if report.feature_index(feature).is_none() {
            warn!(feature = %feature, "feature encoding for unknown feature");
        }
    }
}
