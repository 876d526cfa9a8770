//! Chart-ready data and shared selection state for model-explainability
//! reports (feature importance, SHAP attributions, per-observation
//! drill-downs).
//!
//! - [`input`] validates raw report payloads into a [`model::Report`].
//! - [`encode`] holds the two pure encoders every chart uses: heat-map
//!   colors and cumulative waterfall ranges.
//! - [`selection`] is the coordinator that tracks the selected feature and
//!   observation and notifies chart views.
//! - [`views`] builds the importance, scatter and waterfall view data.
//! - [`report`] writes rendered views to disk.

pub mod config;
pub mod encode;
pub mod input;
pub mod logging;
pub mod model;
pub mod report;
pub mod selection;
pub mod views;

pub use config::{ContributionOrder, ViewConfig};
pub use encode::{ColorToken, build_ranges, color_of, color_of_percent};
pub use input::{ReportError, load_report, normalize, parse_report};
pub use model::{ContributionRange, DrillDepth, FeatureValue, Report, SelectionState};
pub use selection::{LoadOutcome, LoadTicket, SelectionCoordinator, SelectionError};
pub use views::{RenderedViews, ViewCache, render_selection};
