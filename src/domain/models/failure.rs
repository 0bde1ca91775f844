use thiserror::Error;

/// Every way a submission can terminally fail. All of these leave the
/// orchestrator in a resubmittable state; none are fatal to the process.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("the model backend could not be reached: {0}")]
    Transport(String),
    #[error("the model backend rate limited the request")]
    RateLimited,
    #[error("the model produced an incomplete artifact, missing field {0}")]
    SchemaMismatch(String),
    #[error("the sandbox failed to run the artifact: {0}")]
    Execution(String),
}
