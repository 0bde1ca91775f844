#[cfg(test)]
#[path = "streaming_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::Event;
use crate::domain::models::GenerationBox;
use crate::domain::models::GenerationRequest;
use crate::domain::models::SessionId;

/// Manages at most one structured-completion session against the generation
/// backend. Starting a new session always cancels the previous one first, and
/// session ids are handed to the orchestrator so it can drop any callback from
/// a superseded session.
pub struct StreamingObjectClient {
    backend: GenerationBox,
    worker: Option<JoinHandle<()>>,
    active: Option<SessionId>,
    next_id: u64,
}

impl StreamingObjectClient {
    pub fn new(backend: GenerationBox) -> StreamingObjectClient {
        return StreamingObjectClient {
            backend,
            worker: None,
            active: None,
            next_id: 0,
        };
    }

    pub fn start(
        &mut self,
        request: GenerationRequest,
        tx: &mpsc::UnboundedSender<Event>,
    ) -> SessionId {
        self.cancel();

        self.next_id += 1;
        let session = SessionId(self.next_id);

        let backend = Arc::clone(&self.backend);
        let worker_tx = tx.clone();
        self.worker = Some(tokio::spawn(async move {
            if let Err(reason) = backend.stream_object(session, request, &worker_tx).await {
                tracing::error!(session = %session, reason = %reason, "generation stream failed");
                let _ = worker_tx.send(Event::GenerationComplete(session, Err(reason)));
            }
        }));
        self.active = Some(session);

        return session;
    }

    /// Idempotent. Best effort against the backend (the remote generation may
    /// keep running), authoritative locally: the worker is aborted and the
    /// orchestrator's session gate drops anything already queued.
    pub fn cancel(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
        self.active = None;
    }

    pub fn active(&self) -> Option<SessionId> {
        return self.active;
    }
}
