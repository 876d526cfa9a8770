use serde::Serialize;

use crate::config::{ContributionOrder, ViewConfig};
use crate::encode::{ColorToken, final_value};
use crate::model::{ContributionRange, Report};
use crate::selection::SelectionError;
use crate::views::cache::ViewCache;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub feature: String,
    pub column: usize,
    pub contribution: f64,
    pub range: ContributionRange,
    pub color: ColorToken,
    /// Decoded feature value of this observation, when the report has one.
    pub label: Option<String>,
    pub selected: bool,
}

/// Drill-down view: how one observation's prediction is built up from its
/// base value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waterfall {
    pub observation: usize,
    pub base_value: f64,
    pub final_value: f64,
    pub steps: Vec<WaterfallStep>,
}

/// Column order for one SHAP row. Magnitude order is stable, so equal
/// magnitudes keep their payload order.
pub fn contribution_order(row: &[f64], order: ContributionOrder) -> Vec<usize> {
    let mut columns: Vec<usize> = (0..row.len()).collect();
    if order == ContributionOrder::Magnitude {
        columns.sort_by(|&a, &b| {
            row[b]
                .abs()
                .partial_cmp(&row[a].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
    columns
}

pub fn waterfall(
    report: &Report,
    observation: usize,
    selected_feature: Option<&str>,
    config: &ViewConfig,
    cache: &mut ViewCache,
) -> Result<Waterfall, SelectionError> {
    let set = cache
        .ranges(report, observation, config.waterfall_order)?
        .clone();

    let row = report.shap_row(observation).unwrap_or(&[]);
    let max_abs = row.iter().map(|v| v.abs()).fold(0.0f64, f64::max);
    let half = config.domain_max / 2.0;

    let mut steps = Vec::with_capacity(set.ranges.len());
    for (&column, &range) in set.columns.iter().zip(set.ranges.iter()) {
        let feature = report
            .column_name(column)
            .map(str::to_string)
            .unwrap_or_else(|| format!("feature_{column}"));
        let contribution = row.get(column).copied().unwrap_or_else(|| range.contribution());
        let scaled = if max_abs > 0.0 {
            half + half * contribution / max_abs
        } else {
            half
        };
        let label = report
            .feature_value(observation, column)
            .map(|value| report.display_value(&feature, value));
        steps.push(WaterfallStep {
            selected: selected_feature == Some(feature.as_str()),
            color: cache.color(scaled, config.domain_max),
            feature,
            column,
            contribution,
            range,
            label,
        });
    }

    Ok(Waterfall {
        observation,
        base_value: set.base_value,
        final_value: final_value(&set.ranges, set.base_value),
        steps,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/views/waterfall.rs"]
mod tests;
