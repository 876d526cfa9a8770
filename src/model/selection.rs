use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillDepth {
    #[default]
    Overview,
    Detail,
}

/// Selection shared by every chart view of one mounted report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SelectionState {
    pub active_report_id: Option<String>,
    pub selected_feature: Option<String>,
    pub selected_observation: Option<usize>,
    pub drill_depth: DrillDepth,
}

impl SelectionState {
    pub fn unloaded() -> Self {
        Self::default()
    }

    pub fn overview(report_id: &str) -> Self {
        Self {
            active_report_id: Some(report_id.to_string()),
            ..Self::default()
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.active_report_id.is_some()
    }

    pub fn phase(&self) -> SelectionPhase {
        match (&self.active_report_id, self.drill_depth) {
            (None, _) => SelectionPhase::Unloaded,
            (Some(_), DrillDepth::Overview) => SelectionPhase::Overview,
            (Some(_), DrillDepth::Detail) => SelectionPhase::Detail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Unloaded,
    Overview,
    Detail,
}
