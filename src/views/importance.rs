use serde::Serialize;

use crate::config::ViewConfig;
use crate::encode::ColorToken;
use crate::model::{Report, SelectionState};
use crate::views::cache::ViewCache;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportanceBar {
    pub feature: String,
    pub value: f64,
    /// Share of the total importance, or the raw value when normalization is
    /// off or the total is not positive.
    pub share: f64,
    pub color: ColorToken,
    pub selected: bool,
}

/// Aggregate view: one bar per feature, most important first.
pub fn importance_bars(
    report: &Report,
    selection: &SelectionState,
    config: &ViewConfig,
    cache: &mut ViewCache,
) -> Vec<ImportanceBar> {
    let total: f64 = report.importance.iter().map(|e| e.value).sum();
    let max = report
        .importance
        .iter()
        .map(|e| e.value)
        .fold(0.0f64, f64::max);

    let mut entries: Vec<_> = report.importance.iter().collect();
    entries.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(k) = config.top_k {
        entries.truncate(k);
    }

    entries
        .into_iter()
        .map(|entry| {
            let share = if config.normalize_importance && total > 0.0 {
                entry.value / total
            } else {
                entry.value
            };
            let scaled = if max > 0.0 {
                entry.value / max * config.domain_max
            } else {
                0.0
            };
            ImportanceBar {
                feature: entry.feature.clone(),
                value: entry.value,
                share,
                color: cache.color(scaled, config.domain_max),
                selected: selection.selected_feature.as_deref() == Some(entry.feature.as_str()),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/views/importance.rs"]
mod tests;
