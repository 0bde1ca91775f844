use super::ArtifactDraft;
use super::ExecutionResult;
use super::FailureReason;
use super::SessionId;

/// Backend callbacks delivered to the orchestrator's single event loop. Every
/// variant is tagged with the session that produced it so stale deliveries
/// from a superseded session can be dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    GenerationPartial(SessionId, ArtifactDraft),
    GenerationComplete(SessionId, Result<ArtifactDraft, FailureReason>),
    ExecutionFinished(SessionId, Result<ExecutionResult, FailureReason>),
}
