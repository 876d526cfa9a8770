use serde::Serialize;

use crate::config::ViewConfig;
use crate::encode::ColorToken;
use crate::model::{FeatureValue, Report};
use crate::selection::SelectionError;
use crate::views::cache::ViewCache;
use crate::views::percentile_ranks;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub observation: usize,
    pub shap: f64,
    pub value: Option<FeatureValue>,
    pub label: Option<String>,
    /// Percentile rank of the feature value within its column, 0..=100.
    pub rank: Option<f64>,
    pub color: ColorToken,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureScatter {
    pub feature: String,
    pub min_shap: f64,
    pub max_shap: f64,
    pub points: Vec<ScatterPoint>,
}

/// SHAP value of one feature across every observation, colored by where the
/// observation's feature value sits in the column.
pub fn feature_scatter(
    report: &Report,
    feature: &str,
    selected_observation: Option<usize>,
    config: &ViewConfig,
    cache: &mut ViewCache,
) -> Result<FeatureScatter, SelectionError> {
    let column = report
        .feature_index(feature)
        .ok_or_else(|| SelectionError::UnknownFeature(feature.to_string()))?;
    if report.shap_values.first().is_some_and(|row| column >= row.len()) {
        return Err(SelectionError::UnknownFeature(feature.to_string()));
    }

    let values: Vec<Option<&FeatureValue>> = (0..report.shap_values.len())
        .map(|obs| report.feature_value(obs, column))
        .collect();
    let numeric: Vec<Option<f64>> = values
        .iter()
        .map(|v| v.and_then(FeatureValue::as_f64))
        .collect();
    let ranks = percentile_ranks(&numeric);

    let mut min_shap = f64::INFINITY;
    let mut max_shap = f64::NEG_INFINITY;
    let mut points = Vec::with_capacity(report.shap_values.len());
    for (observation, row) in report.shap_values.iter().enumerate() {
        let shap = row[column];
        min_shap = min_shap.min(shap);
        max_shap = max_shap.max(shap);
        let rank = ranks[observation];
        let heat = rank
            .map(|r| r / 100.0 * config.domain_max)
            .unwrap_or(config.domain_max / 2.0);
        let value = values[observation].cloned();
        points.push(ScatterPoint {
            observation,
            shap,
            label: value.as_ref().map(|v| report.display_value(feature, v)),
            value,
            rank,
            color: cache.color(heat, config.domain_max),
            selected: selected_observation == Some(observation),
        });
    }
    if points.is_empty() {
        min_shap = 0.0;
        max_shap = 0.0;
    }

    Ok(FeatureScatter {
        feature: feature.to_string(),
        min_shap,
        max_shap,
        points,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/views/scatter.rs"]
mod tests;
