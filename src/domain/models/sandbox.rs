use std::sync::Arc;

use async_trait::async_trait;

use super::Artifact;
use super::ExecutionResult;
use super::FailureReason;

pub type SandboxBox = Arc<dyn SandboxBackend + Send + Sync>;

#[async_trait]
pub trait SandboxBackend {
    /// Runs a finished artifact in the sandbox. Fire and forget from the
    /// orchestrator's point of view; there is no automatic retry.
    async fn execute(
        &self,
        artifact: &Artifact,
        user_id: &str,
        api_key: Option<&str>,
    ) -> Result<ExecutionResult, FailureReason>;
}
