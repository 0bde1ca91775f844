#[cfg(test)]
#[path = "projection_test.rs"]
mod tests;

use super::Orchestrator;
use crate::domain::models::FailureReason;
use crate::domain::models::Tab;

/// Read-only view derived from the orchestrator. The projection never mutates
/// anything; the tab is set by orchestrator transitions alone.
#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    pub is_loading: bool,
    pub tab: Tab,
    pub error: Option<FailureReason>,
}

impl UiState {
    pub fn project(orchestrator: &Orchestrator) -> UiState {
        return UiState {
            is_loading: orchestrator.phase.is_loading(),
            tab: orchestrator.tab,
            error: orchestrator.last_failure.clone(),
        };
    }
}
