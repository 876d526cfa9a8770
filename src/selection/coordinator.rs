use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::input::{ReportError, normalize};
use crate::model::{DrillDepth, Report, SelectionPhase, SelectionState};
use crate::selection::SelectionError;

pub type SelectionCallback = Box<dyn FnMut(&SelectionState)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberHandle(u64);

/// Proof of a requested load. Only the most recent ticket can complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    report_id: String,
}

impl LoadTicket {
    pub fn report_id(&self) -> &str {
        &self.report_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was requested after this one; nothing changed.
    Stale,
}

/// Selection bookkeeping for one mounted report view.
///
/// States are `Unloaded`, `Overview` and `Detail` (see [`SelectionPhase`]).
/// Every successful change is pushed synchronously, in registration order,
/// to all subscribers as an immutable snapshot. The coordinator holds the
/// active report for validation only; chart geometry is derived by the
/// subscribers themselves.
pub struct SelectionCoordinator {
    state: SelectionState,
    report: Option<Arc<Report>>,
    subscribers: BTreeMap<SubscriberHandle, SelectionCallback>,
    next_handle: u64,
    load_seq: u64,
    pending_load: Option<u64>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self {
            state: SelectionState::unloaded(),
            report: None,
            subscribers: BTreeMap::new(),
            next_handle: 0,
            load_seq: 0,
            pending_load: None,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn phase(&self) -> SelectionPhase {
        self.state.phase()
    }

    pub fn active_report(&self) -> Option<Arc<Report>> {
        self.report.clone()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&SelectionState) + 'static) -> SubscriberHandle {
        let handle = SubscriberHandle(self.next_handle);
        self.next_handle += 1;
        self.subscribers.insert(handle, Box::new(callback));
        handle
    }

    pub fn unsubscribe(&mut self, handle: SubscriberHandle) -> bool {
        self.subscribers.remove(&handle).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Records a load request for `report_id`, superseding any pending one.
    pub fn begin_load(&mut self, report_id: &str) -> LoadTicket {
        self.load_seq += 1;
        self.pending_load = Some(self.load_seq);
        debug!(report_id, seq = self.load_seq, "load requested");
        LoadTicket {
            seq: self.load_seq,
            report_id: report_id.to_string(),
        }
    }

    /// Applies a finished load unless a newer request has been made since.
    pub fn complete_load(&mut self, ticket: &LoadTicket, report: Report) -> LoadOutcome {
        if self.pending_load != Some(ticket.seq) || report.id != ticket.report_id {
            warn!(
                requested = %ticket.report_id,
                received = %report.id,
                "ignoring superseded report load"
            );
            return LoadOutcome::Stale;
        }
        self.pending_load = None;
        self.apply_report(Arc::new(report));
        LoadOutcome::Applied
    }

    /// Normalizes a fetched payload, then completes the load. A payload that
    /// fails to normalize leaves the previous report active.
    pub fn complete_load_payload(
        &mut self,
        ticket: &LoadTicket,
        raw: &Value,
    ) -> Result<LoadOutcome, ReportError> {
        if self.pending_load != Some(ticket.seq) {
            warn!(requested = %ticket.report_id, "ignoring superseded report payload");
            return Ok(LoadOutcome::Stale);
        }
        let mut report = normalize(raw)?;
        if raw.get("report_id").is_none() {
            report.id = ticket.report_id.clone();
        }
        Ok(self.complete_load(ticket, report))
    }

    /// Makes `report` the active report and enters `Overview`. A report with
    /// a different id first resets everything to `Unloaded`.
    pub fn load_report(&mut self, report: Report) {
        self.load_seq += 1;
        self.pending_load = None;
        self.apply_report(Arc::new(report));
    }

    /// Drops the active report.
    pub fn unload(&mut self) -> bool {
        if !self.state.is_loaded() {
            return false;
        }
        self.reset();
        true
    }

    pub fn select_feature(&mut self, name: &str) -> Result<(), SelectionError> {
        let report = self.require_report()?;
        if !report.is_known_feature(name) {
            return Err(SelectionError::UnknownFeature(name.to_string()));
        }
        let mut next = self.state.clone();
        next.selected_feature = Some(name.to_string());
        self.transition(next);
        Ok(())
    }

    pub fn clear_feature(&mut self) -> Result<(), SelectionError> {
        self.require_report()?;
        let mut next = self.state.clone();
        next.selected_feature = None;
        self.transition(next);
        Ok(())
    }

    /// Drills down into one observation (`Overview -> Detail`, or switches
    /// observation while already in `Detail`).
    pub fn select_observation(&mut self, index: usize) -> Result<(), SelectionError> {
        let count = self.require_report()?.observation_count();
        if index >= count {
            return Err(SelectionError::IndexOutOfRange { index, count });
        }
        let mut next = self.state.clone();
        next.selected_observation = Some(index);
        next.drill_depth = DrillDepth::Detail;
        self.transition(next);
        Ok(())
    }

    pub fn clear_observation(&mut self) -> Result<(), SelectionError> {
        self.require_report()?;
        if self.state.drill_depth == DrillDepth::Overview {
            return Ok(());
        }
        let mut next = self.state.clone();
        next.selected_observation = None;
        next.drill_depth = DrillDepth::Overview;
        self.transition(next);
        Ok(())
    }

    fn require_report(&self) -> Result<Arc<Report>, SelectionError> {
        self.report.clone().ok_or(SelectionError::NoReportLoaded)
    }

    fn apply_report(&mut self, report: Arc<Report>) {
        let switching = self
            .state
            .active_report_id
            .as_deref()
            .is_some_and(|active| active != report.id);
        if switching {
            self.reset();
        }
        debug!(report_id = %report.id, "entering overview");
        self.state = SelectionState::overview(&report.id);
        self.report = Some(report);
        self.notify();
    }

    fn reset(&mut self) {
        debug!(
            report_id = self.state.active_report_id.as_deref().unwrap_or(""),
            "unloading report"
        );
        self.report = None;
        self.state = SelectionState::unloaded();
        self.notify();
    }

    fn transition(&mut self, next: SelectionState) {
        if next == self.state {
            return;
        }
        debug!(
            feature = next.selected_feature.as_deref().unwrap_or(""),
            observation = ?next.selected_observation,
            depth = ?next.drill_depth,
            "selection changed"
        );
        self.state = next;
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.state.clone();
        for callback in self.subscribers.values_mut() {
            callback(&snapshot);
        }
    }
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SelectionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionCoordinator")
            .field("state", &self.state)
            .field("report", &self.report.as_ref().map(|r| r.id.as_str()))
            .field("subscribers", &self.subscribers.len())
            .field("pending_load", &self.pending_load)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/selection/coordinator.rs"]
mod tests;
