use crate::encode::DEFAULT_DOMAIN_MAX;

/// Order in which a waterfall lays out one observation's contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionOrder {
    /// Largest absolute contribution first.
    Magnitude,
    /// Column order of the payload.
    Payload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub domain_max: f64,
    pub top_k: Option<usize>,
    pub waterfall_order: ContributionOrder,
    pub normalize_importance: bool,
}

impl ViewConfig {
    pub fn default_v1() -> Self {
        Self {
            domain_max: DEFAULT_DOMAIN_MAX,
            top_k: None,
            waterfall_order: ContributionOrder::Magnitude,
            normalize_importance: true,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_order(mut self, order: ContributionOrder) -> Self {
        self.waterfall_order = order;
        self
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config/tests.rs"]
mod tests;
