use std::collections::HashMap;

use tracing::debug;

use crate::config::ContributionOrder;
use crate::encode::{ColorToken, build_ranges, color_of};
use crate::model::{ContributionRange, Report, SelectionState};
use crate::selection::SelectionError;
use crate::views::waterfall::contribution_order;

/// Ranges for one observation, with the SHAP column behind each range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSet {
    pub columns: Vec<usize>,
    pub ranges: Vec<ContributionRange>,
    pub base_value: f64,
}

/// Memoized colors and waterfall ranges for the active report.
///
/// Attach it to a [`crate::selection::SelectionCoordinator`] through
/// [`ViewCache::observe`]; it empties itself whenever the active report id
/// changes, including the pass through `Unloaded`.
#[derive(Debug, Default)]
pub struct ViewCache {
    report_id: Option<String>,
    colors: HashMap<(u64, u64), ColorToken>,
    ranges: HashMap<(usize, ContributionOrder), RangeSet>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_id(&self) -> Option<&str> {
        self.report_id.as_deref()
    }

    pub fn observe(&mut self, state: &SelectionState) {
        if state.active_report_id != self.report_id {
            self.reset();
            self.report_id = state.active_report_id.clone();
        }
    }

    pub fn reset(&mut self) {
        if !self.colors.is_empty() || !self.ranges.is_empty() {
            debug!(
                colors = self.colors.len(),
                ranges = self.ranges.len(),
                "dropping view cache"
            );
        }
        self.colors.clear();
        self.ranges.clear();
        self.report_id = None;
    }

    pub fn color(&mut self, value: f64, domain_max: f64) -> ColorToken {
        self.colors
            .entry((value.to_bits(), domain_max.to_bits()))
            .or_insert_with(|| color_of(value, domain_max))
            .clone()
    }

    pub fn ranges(
        &mut self,
        report: &Report,
        observation: usize,
        order: ContributionOrder,
    ) -> Result<&RangeSet, SelectionError> {
        self.adopt(&report.id);
        let row = report
            .shap_row(observation)
            .ok_or(SelectionError::IndexOutOfRange {
                index: observation,
                count: report.shap_values.len(),
            })?;
        let base_value = report.base_value(observation);
        Ok(self.ranges.entry((observation, order)).or_insert_with(|| {
            let columns = contribution_order(row, order);
            let values: Vec<f64> = columns.iter().map(|&c| row[c]).collect();
            RangeSet {
                ranges: build_ranges(&values, base_value),
                columns,
                base_value,
            }
        }))
    }

    pub fn color_entries(&self) -> usize {
        self.colors.len()
    }

    pub fn range_entries(&self) -> usize {
        self.ranges.len()
    }

    fn adopt(&mut self, report_id: &str) {
        if self.report_id.as_deref() != Some(report_id) {
            self.reset();
            self.report_id = Some(report_id.to_string());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/views/cache.rs"]
mod tests;
