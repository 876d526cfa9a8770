use thiserror::Error;

pub mod coordinator;

pub use coordinator::{LoadOutcome, LoadTicket, SelectionCoordinator, SubscriberHandle};

/// A rejected interaction request. The selection is left exactly as it was,
/// so the caller can surface a transient notice and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown feature {0:?}")]
    UnknownFeature(String),

    #[error("observation index {index} out of range (report has {count} observations)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("no report is loaded")]
    NoReportLoaded,
}
