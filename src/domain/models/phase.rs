use super::FailureReason;
use super::SessionId;

/// The submission lifecycle. `AwaitingAuth` is a deferred submission, not a
/// failure: the pending input is preserved and the user resubmits after
/// authenticating.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Idle,
    AwaitingAuth,
    Generating(SessionId),
    Dispatching(SessionId),
    Done,
    Failed(FailureReason),
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        return matches!(self, Phase::Generating(_) | Phase::Dispatching(_));
    }
}

/// Which side view the user is looking at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tab {
    Code,
    Artifact,
}
