use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::Event;
use super::FailureReason;
use super::GenerationRequest;
use super::SessionId;

pub type GenerationBox = Arc<dyn GenerationBackend + Send + Sync>;

#[async_trait]
pub trait GenerationBackend {
    /// Used at startup to verify the generation endpoint is reachable before
    /// the first submission.
    async fn health_check(&self) -> Result<()>;

    /// Opens one structured-completion stream. Each decoded partial snapshot
    /// is sent through the channel as `Event::GenerationPartial`, followed by
    /// exactly one `Event::GenerationComplete` carrying the final snapshot.
    ///
    /// Failing to open or read the stream is returned as an error instead;
    /// the caller converts it into the session's completion event so
    /// completion fires exactly once either way.
    async fn stream_object<'a>(
        &self,
        session: SessionId,
        request: GenerationRequest,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<(), FailureReason>;
}
