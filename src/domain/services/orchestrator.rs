#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::mpsc;

use super::AnalyticsService;
use super::MessageStore;
use super::StreamingObjectClient;
use crate::configuration::Catalogs;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::configuration::ModelEntry;
use crate::domain::models::ArtifactDraft;
use crate::domain::models::Event;
use crate::domain::models::ExecutionResult;
use crate::domain::models::FailureReason;
use crate::domain::models::GenerationBox;
use crate::domain::models::GenerationRequest;
use crate::domain::models::IdentityBox;
use crate::domain::models::Message;
use crate::domain::models::MessageMeta;
use crate::domain::models::ModelConfig;
use crate::domain::models::Phase;
use crate::domain::models::SandboxBox;
use crate::domain::models::SessionId;
use crate::domain::models::Tab;

/// The submission state machine. Owns the message history and the single
/// in-flight generation/dispatch, and is the only writer of either. Backend
/// callbacks come back through the event channel and are applied here on one
/// logical thread, gated by the session id they were produced under.
pub struct Orchestrator {
    store: MessageStore,
    client: StreamingObjectClient,
    sandbox: SandboxBox,
    identity: IdentityBox,
    catalogs: Catalogs,
    tx: mpsc::UnboundedSender<Event>,

    pub phase: Phase,
    pub tab: Tab,
    pub draft: ArtifactDraft,
    pub result: Option<ExecutionResult>,
    pub last_failure: Option<FailureReason>,
    pub pending_input: String,
    pub model_config: ModelConfig,

    active_user: Option<String>,
    trailing: Option<usize>,
}

impl Orchestrator {
    pub fn new(
        generation: GenerationBox,
        sandbox: SandboxBox,
        identity: IdentityBox,
        catalogs: Catalogs,
        tx: mpsc::UnboundedSender<Event>,
    ) -> Orchestrator {
        return Orchestrator {
            store: MessageStore::default(),
            client: StreamingObjectClient::new(generation),
            sandbox,
            identity,
            catalogs,
            tx,
            phase: Phase::Idle,
            tab: Tab::Code,
            draft: ArtifactDraft::default(),
            result: None,
            last_failure: None,
            pending_input: "".to_string(),
            model_config: ModelConfig::default(),
            active_user: None,
            trailing: None,
        };
    }

    pub fn set_input(&mut self, text: &str) {
        self.pending_input = text.to_string();
    }

    pub fn messages(&self) -> &[Message] {
        return self.store.messages();
    }

    pub fn catalogs(&self) -> &Catalogs {
        return &self.catalogs;
    }

    /// The user submit action. Unauthenticated submissions are deferred with
    /// the pending input preserved; the user resubmits after signing in.
    pub fn submit(&mut self) {
        let user_id = match self.identity.current_user() {
            Some(user_id) => user_id,
            None => {
                tracing::info!("submission deferred, no authenticated session");
                self.phase = Phase::AwaitingAuth;
                return;
            }
        };

        // Latest submission wins. Local delivery from the previous session is
        // cut off here, before the new placeholder message exists, so a stale
        // partial can never land on the new turn.
        self.client.cancel();
        self.last_failure = None;

        let input = std::mem::take(&mut self.pending_input);
        self.store.append(Message::user(&input));

        let template_id = Config::get(ConfigKey::Template);
        let model_id = Config::get(ConfigKey::Model);
        let mut config = self.model_config.clone();
        config.model = model_id.to_string();

        let request = GenerationRequest {
            user_id: user_id.to_string(),
            messages: self.store.to_request_messages(),
            template: self.catalogs.select_templates(&template_id),
            model: self.resolve_model(&model_id),
            config,
        };

        self.trailing = Some(self.store.append(Message::placeholder()));
        self.draft = ArtifactDraft::default();
        self.tab = Tab::Code;
        self.active_user = Some(user_id);

        let session = self.client.start(request, &self.tx);
        self.phase = Phase::Generating(session);
        tracing::info!(session = %session, "generation started");

        AnalyticsService::capture(
            "chat_submit",
            serde_json::json!({ "template": template_id, "model": model_id }),
        );
    }

    /// Explicit user cancel. Idempotent, never dispatches.
    pub fn stop(&mut self) {
        if let Phase::Generating(session) = self.phase {
            tracing::info!(session = %session, "generation stopped by user");
            self.client.cancel();
            self.phase = Phase::Idle;
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::GenerationPartial(session, snapshot) => {
                self.apply_partial(session, snapshot);
            }
            Event::GenerationComplete(session, res) => {
                self.complete_generation(session, res);
            }
            Event::ExecutionFinished(session, res) => {
                self.finish_dispatch(session, res);
            }
        }
    }

    /// Each snapshot replaces the live draft wholesale and rewrites the
    /// trailing assistant turn in place. Never appends a message.
    fn apply_partial(&mut self, session: SessionId, snapshot: ArtifactDraft) {
        if self.phase != Phase::Generating(session) {
            tracing::debug!(session = %session, "dropping stale partial");
            return;
        }

        self.draft = snapshot;
        self.sync_trailing();
    }

    fn complete_generation(
        &mut self,
        session: SessionId,
        res: Result<ArtifactDraft, FailureReason>,
    ) {
        if self.phase != Phase::Generating(session) {
            tracing::debug!(session = %session, "dropping stale completion");
            return;
        }

        let final_snapshot = match res {
            Ok(snapshot) => snapshot,
            Err(reason) => {
                // The placeholder keeps whatever partial content arrived, so
                // the user can inspect it before resubmitting.
                self.fail(reason);
                return;
            }
        };

        self.draft = final_snapshot;
        self.sync_trailing();

        let artifact = match self.draft.finalize() {
            Ok(artifact) => artifact,
            Err(reason) => {
                self.fail(reason);
                return;
            }
        };

        self.client.cancel();
        self.phase = Phase::Dispatching(session);
        tracing::info!(session = %session, title = artifact.title, "artifact complete, dispatching");

        let sandbox = Arc::clone(&self.sandbox);
        let tx = self.tx.clone();
        let user_id = self.active_user.clone().unwrap_or_default();
        let api_key = self.identity.api_key();
        tokio::spawn(async move {
            let res = sandbox.execute(&artifact, &user_id, api_key.as_deref()).await;
            let _ = tx.send(Event::ExecutionFinished(session, res));
        });
    }

    fn finish_dispatch(
        &mut self,
        session: SessionId,
        res: Result<ExecutionResult, FailureReason>,
    ) {
        if self.phase != Phase::Dispatching(session) {
            // A newer submission superseded this dispatch; its result is
            // ignored, consistent with generation cancellation.
            tracing::debug!(session = %session, "dropping stale execution result");
            return;
        }

        match res {
            Ok(result) => {
                self.result = Some(result);
                self.tab = Tab::Artifact;
                self.phase = Phase::Done;
            }
            Err(reason) => {
                // The generated code stays visible under the code tab so the
                // user can iterate or retry execution.
                self.fail(reason);
            }
        }
    }

    fn sync_trailing(&mut self) {
        let index = match self.trailing {
            Some(index) => index,
            None => return,
        };

        let meta = MessageMeta {
            title: self.draft.title.clone(),
            description: self.draft.description.clone(),
        };
        let content = self.draft.code.clone().unwrap_or_default();
        let commentary = self.draft.commentary.clone().unwrap_or_default();

        self.store.rewrite_assistant(index, &content, &commentary, meta);
    }

    fn fail(&mut self, reason: FailureReason) {
        tracing::warn!(reason = %reason, "submission failed");
        self.last_failure = Some(reason.clone());
        self.phase = Phase::Failed(reason);
    }

    fn resolve_model(&self, id: &str) -> ModelEntry {
        if let Some(entry) = self.catalogs.find_model(id) {
            return entry.clone();
        }

        tracing::warn!(model = id, "model not in catalog, passing through as-is");
        return ModelEntry {
            id: id.to_string(),
            provider: "Unknown".to_string(),
            provider_id: "unknown".to_string(),
            name: id.to_string(),
        };
    }
}
