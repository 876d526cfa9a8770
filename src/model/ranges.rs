use serde::Serialize;

/// One waterfall bar: `end - start` is the contribution it represents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContributionRange {
    pub start: f64,
    pub end: f64,
}

impl ContributionRange {
    pub fn contribution(&self) -> f64 {
        self.end - self.start
    }

    /// Strictly increasing; a zero-width range is neither positive nor
    /// negative.
    pub fn is_positive(&self) -> bool {
        self.end > self.start
    }

    pub fn is_negative(&self) -> bool {
        self.end < self.start
    }
}

impl From<ContributionRange> for (f64, f64) {
    fn from(range: ContributionRange) -> Self {
        (range.start, range.end)
    }
}
