pub mod ranges;
pub mod report;
pub mod selection;

pub use ranges::ContributionRange;
pub use report::{FeatureImportance, FeatureValue, Report};
pub use selection::{DrillDepth, SelectionPhase, SelectionState};
