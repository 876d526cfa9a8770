use crate::model::ContributionRange;

/// Chains signed contributions into contiguous waterfall intervals.
///
/// The running total is seeded with `base_value` before the first element,
/// so `ranges[0].start == base_value` and every later range starts where the
/// previous one ended. An empty input yields an empty output and never reads
/// `base_value`.
pub fn build_ranges(values: &[f64], base_value: f64) -> Vec<ContributionRange> {
    let mut ranges = Vec::with_capacity(values.len());
    let mut cumulative = base_value;
    for &value in values {
        let start = cumulative;
        cumulative += value;
        ranges.push(ContributionRange {
            start,
            end: cumulative,
        });
    }
    ranges
}

/// Value the chain arrives at: the last end, or the base when there is
/// nothing to chain.
pub fn final_value(ranges: &[ContributionRange], base_value: f64) -> f64 {
    ranges.last().map(|r| r.end).unwrap_or(base_value)
}

#[cfg(test)]
#[path = "../../tests/src_inline/encode/ranges.rs"]
mod tests;
