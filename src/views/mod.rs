//! Chart-ready data for the three report views: importance bars (aggregate),
//! per-feature SHAP scatter (aggregate, feature-scoped) and the
//! per-observation waterfall (drill-down).
//!
//! Views derive everything from a `(Report, SelectionState)` pair and never
//! mutate either.

pub mod cache;
pub mod importance;
pub mod scatter;
pub mod waterfall;

use serde::Serialize;

pub use cache::{RangeSet, ViewCache};
pub use importance::{ImportanceBar, importance_bars};
pub use scatter::{FeatureScatter, ScatterPoint, feature_scatter};
pub use waterfall::{Waterfall, WaterfallStep, contribution_order, waterfall};

use crate::config::ViewConfig;
use crate::model::{DrillDepth, Report, SelectionState};
use crate::selection::SelectionError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedViews {
    pub selection: SelectionState,
    pub importance: Vec<ImportanceBar>,
    pub scatter: Option<FeatureScatter>,
    pub waterfall: Option<Waterfall>,
}

/// Builds every view the selection implies: importance always, the scatter
/// once a feature with SHAP values is selected, the waterfall in `Detail`
/// when the report has SHAP values.
pub fn render_selection(
    report: &Report,
    selection: &SelectionState,
    config: &ViewConfig,
    cache: &mut ViewCache,
) -> Result<RenderedViews, SelectionError> {
    let importance = importance_bars(report, selection, config, cache);

    let scatter = match selection.selected_feature.as_deref() {
        Some(feature) if !report.shap_values.is_empty() => Some(feature_scatter(
            report,
            feature,
            selection.selected_observation,
            config,
            cache,
        )?),
        _ => None,
    };

    let waterfall = match (selection.drill_depth, selection.selected_observation) {
        (DrillDepth::Detail, Some(observation)) if !report.shap_values.is_empty() => {
            Some(waterfall(
                report,
                observation,
                selection.selected_feature.as_deref(),
                config,
                cache,
            )?)
        }
        _ => None,
    };

    Ok(RenderedViews {
        selection: selection.clone(),
        importance,
        scatter,
        waterfall,
    })
}

/// Mid-rank percentile (0..=100) of each present value among the present
/// values. Ties share a rank; a single value sits at the midpoint.
pub fn percentile_ranks(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut sorted: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();

    values
        .iter()
        .map(|value| {
            let v = (*value)?;
            if v.is_nan() {
                return None;
            }
            if n <= 1 {
                return Some(50.0);
            }
            let less = sorted.partition_point(|x| *x < v);
            let not_greater = sorted.partition_point(|x| *x <= v);
            let equal = not_greater - less;
            let mid_rank = less as f64 + (equal as f64 - 1.0) / 2.0;
            Some(mid_rank / (n - 1) as f64 * 100.0)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/views/mod.rs"]
mod tests;
