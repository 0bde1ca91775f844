use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::yield_now;

use super::Orchestrator;
use crate::configuration::Catalogs;
use crate::domain::models::Artifact;
use crate::domain::models::ArtifactDraft;
use crate::domain::models::Event;
use crate::domain::models::ExecutionResult;
use crate::domain::models::FailureReason;
use crate::domain::models::GenerationBackend;
use crate::domain::models::GenerationRequest;
use crate::domain::models::IdentityProvider;
use crate::domain::models::Phase;
use crate::domain::models::Role;
use crate::domain::models::SandboxBackend;
use crate::domain::models::SessionId;
use crate::domain::models::Tab;
use crate::domain::models::GENERATING_COMMENTARY;

#[derive(Clone, Default)]
struct Script {
    snapshots: Vec<ArtifactDraft>,
    fail: Option<FailureReason>,
}

struct FakeGeneration {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

#[async_trait]
impl GenerationBackend for FakeGeneration {
    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    async fn stream_object<'a>(
        &self,
        session: SessionId,
        request: GenerationRequest,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<(), FailureReason> {
        self.requests.lock().unwrap().push(request);

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();

        let mut last = ArtifactDraft::default();
        for snapshot in script.snapshots {
            last = snapshot.clone();
            let _ = tx.send(Event::GenerationPartial(session, snapshot));
        }

        if let Some(reason) = script.fail {
            return Err(reason);
        }

        let _ = tx.send(Event::GenerationComplete(session, Ok(last)));
        return Ok(());
    }
}

struct FakeSandbox {
    result: Mutex<Result<ExecutionResult, FailureReason>>,
    calls: Mutex<Vec<Artifact>>,
}

#[async_trait]
impl SandboxBackend for FakeSandbox {
    async fn execute(
        &self,
        artifact: &Artifact,
        _user_id: &str,
        _api_key: Option<&str>,
    ) -> Result<ExecutionResult, FailureReason> {
        self.calls.lock().unwrap().push(artifact.clone());
        return self.result.lock().unwrap().clone();
    }
}

struct FakeIdentity {
    user: Mutex<Option<String>>,
}

impl IdentityProvider for FakeIdentity {
    fn current_user(&self) -> Option<String> {
        return self.user.lock().unwrap().clone();
    }

    fn api_key(&self) -> Option<String> {
        return Some("sk-test".to_string());
    }
}

struct Harness {
    orchestrator: Orchestrator,
    rx: mpsc::UnboundedReceiver<Event>,
    generation: Arc<FakeGeneration>,
    sandbox: Arc<FakeSandbox>,
    identity: Arc<FakeIdentity>,
}

impl Harness {
    fn new(scripts: Vec<Script>, sandbox_result: Result<ExecutionResult, FailureReason>) -> Harness {
        let generation = Arc::new(FakeGeneration {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(vec![]),
        });
        let sandbox = Arc::new(FakeSandbox {
            result: Mutex::new(sandbox_result),
            calls: Mutex::new(vec![]),
        });
        let identity = Arc::new(FakeIdentity {
            user: Mutex::new(Some("user-1".to_string())),
        });

        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let orchestrator = Orchestrator::new(
            generation.clone(),
            sandbox.clone(),
            identity.clone(),
            Catalogs::load().unwrap(),
            tx,
        );

        return Harness {
            orchestrator,
            rx,
            generation,
            sandbox,
            identity,
        };
    }

    async fn pump_one(&mut self) -> Event {
        let event = self.rx.recv().await.unwrap();
        self.orchestrator.handle_event(event.clone());
        return event;
    }

    fn drain(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.orchestrator.handle_event(event);
        }
    }

    fn trailing_content(&self) -> String {
        return self.orchestrator.messages().last().unwrap().content.to_string();
    }
}

fn partial(code: &str) -> ArtifactDraft {
    return ArtifactDraft {
        commentary: Some("Working on it".to_string()),
        code: Some(code.to_string()),
        ..ArtifactDraft::default()
    };
}

fn complete(code: &str) -> ArtifactDraft {
    return ArtifactDraft {
        commentary: Some("I built a counter app.".to_string()),
        template: Some("nextjs-developer".to_string()),
        title: Some("Counter".to_string()),
        description: Some("A simple counter app.".to_string()),
        file_path: Some("pages/index.tsx".to_string()),
        code: Some(code.to_string()),
        ..ArtifactDraft::default()
    };
}

fn ok_result() -> Result<ExecutionResult, FailureReason> {
    return Ok(ExecutionResult {
        url: Some("https://sandbox.example/abc".to_string()),
        stdout: "".to_string(),
        stderr: "".to_string(),
        exit_code: Some(0),
        template: None,
    });
}

#[tokio::test]
async fn it_runs_the_full_submit_flow() {
    let script = Script {
        snapshots: vec![partial("let"), partial("let x"), complete("let x = 1;")],
        fail: None,
    };
    let mut harness = Harness::new(vec![script], ok_result());

    harness.orchestrator.set_input("build a counter app");
    harness.orchestrator.submit();

    let messages = harness.orchestrator.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "build a counter app");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(
        messages[1].commentary.as_deref(),
        Some(GENERATING_COMMENTARY)
    );
    assert_eq!(harness.orchestrator.phase, Phase::Generating(SessionId(1)));
    assert_eq!(harness.orchestrator.tab, Tab::Code);
    assert!(harness.orchestrator.pending_input.is_empty());

    // Each snapshot replaces the trailing content wholesale.
    harness.pump_one().await;
    assert_eq!(harness.trailing_content(), "let");
    harness.pump_one().await;
    assert_eq!(harness.trailing_content(), "let x");
    harness.pump_one().await;
    assert_eq!(harness.trailing_content(), "let x = 1;");
    assert_eq!(harness.orchestrator.messages().len(), 2);

    harness.pump_one().await;
    assert_eq!(harness.orchestrator.phase, Phase::Dispatching(SessionId(1)));

    harness.pump_one().await;
    assert_eq!(harness.orchestrator.phase, Phase::Done);
    assert_eq!(harness.orchestrator.tab, Tab::Artifact);
    assert_eq!(
        harness
            .orchestrator
            .result
            .as_ref()
            .unwrap()
            .url
            .as_deref(),
        Some("https://sandbox.example/abc")
    );

    let calls = harness.sandbox.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "Counter");

    // The request was built before the placeholder was appended and carries
    // only role and content.
    let requests = harness.generation.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_id, "user-1");
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[0].messages[0].content, "build a counter app");
}

#[tokio::test]
async fn it_defers_unauthenticated_submissions() {
    let script = Script {
        snapshots: vec![complete("let x = 1;")],
        fail: None,
    };
    let mut harness = Harness::new(vec![script], ok_result());
    *harness.identity.user.lock().unwrap() = None;

    harness.orchestrator.set_input("build a counter app");
    harness.orchestrator.submit();

    assert_eq!(harness.orchestrator.phase, Phase::AwaitingAuth);
    assert!(harness.orchestrator.messages().is_empty());
    assert_eq!(harness.orchestrator.pending_input, "build a counter app");
    assert!(harness.rx.try_recv().is_err());

    // Resubmitting after authenticating proceeds with the original input.
    *harness.identity.user.lock().unwrap() = Some("user-1".to_string());
    harness.orchestrator.submit();

    assert_eq!(harness.orchestrator.phase, Phase::Generating(SessionId(1)));
    assert_eq!(
        harness.orchestrator.messages()[0].content,
        "build a counter app"
    );
}

#[tokio::test]
async fn it_enforces_latest_submission_wins() {
    let first = Script {
        snapshots: vec![complete("OLD")],
        fail: None,
    };
    let second = Script {
        snapshots: vec![complete("NEW")],
        fail: None,
    };
    let mut harness = Harness::new(vec![first, second], ok_result());

    harness.orchestrator.set_input("one");
    harness.orchestrator.submit();

    // Let the first session's worker enqueue everything it has, then submit
    // again without processing any of it.
    yield_now().await;
    yield_now().await;

    harness.orchestrator.set_input("two");
    harness.orchestrator.submit();
    assert_eq!(harness.orchestrator.phase, Phase::Generating(SessionId(2)));
    assert_eq!(harness.orchestrator.messages().len(), 4);

    while harness.orchestrator.phase != Phase::Done {
        harness.pump_one().await;
    }

    let messages = harness.orchestrator.messages();
    // Nothing from the cancelled session touched the first placeholder, and
    // the new turn only ever saw the new session's snapshots.
    assert_eq!(messages[1].content, "");
    assert_eq!(messages[3].content, "NEW");
    assert_eq!(harness.sandbox.calls.lock().unwrap().len(), 1);
    assert_eq!(harness.sandbox.calls.lock().unwrap()[0].code, "NEW");
}

#[tokio::test]
async fn it_fails_on_schema_mismatch_without_dispatching() {
    let script = Script {
        snapshots: vec![partial("let x = 1;")],
        fail: None,
    };
    let mut harness = Harness::new(vec![script], ok_result());

    harness.orchestrator.set_input("build a counter app");
    harness.orchestrator.submit();

    harness.pump_one().await;
    harness.pump_one().await;

    assert_eq!(
        harness.orchestrator.phase,
        Phase::Failed(FailureReason::SchemaMismatch("template".to_string()))
    );
    // The partial content stays visible for inspection.
    assert_eq!(harness.trailing_content(), "let x = 1;");
    assert_eq!(harness.orchestrator.tab, Tab::Code);
    assert!(harness.sandbox.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn it_surfaces_stream_errors_as_a_failed_turn() {
    let script = Script {
        snapshots: vec![partial("let x")],
        fail: Some(FailureReason::Transport("connection reset".to_string())),
    };
    let mut harness = Harness::new(vec![script], ok_result());

    harness.orchestrator.set_input("build a counter app");
    harness.orchestrator.submit();

    harness.pump_one().await;
    harness.pump_one().await;

    assert_eq!(
        harness.orchestrator.phase,
        Phase::Failed(FailureReason::Transport("connection reset".to_string()))
    );
    assert_eq!(harness.trailing_content(), "let x");
    assert!(harness.sandbox.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn it_surfaces_execution_errors_and_keeps_the_code_tab() {
    let script = Script {
        snapshots: vec![complete("let x = 1;")],
        fail: None,
    };
    let mut harness = Harness::new(
        vec![script],
        Err(FailureReason::Execution("sandbox exploded".to_string())),
    );

    harness.orchestrator.set_input("build a counter app");
    harness.orchestrator.submit();

    while !matches!(harness.orchestrator.phase, Phase::Failed(_)) {
        harness.pump_one().await;
    }

    assert_eq!(
        harness.orchestrator.phase,
        Phase::Failed(FailureReason::Execution("sandbox exploded".to_string()))
    );
    assert_eq!(harness.orchestrator.tab, Tab::Code);
    assert_eq!(harness.orchestrator.result, None);
    assert_eq!(harness.trailing_content(), "let x = 1;");
}

#[tokio::test]
async fn it_stops_idempotently_without_dispatching() {
    let script = Script {
        snapshots: vec![complete("let x = 1;")],
        fail: None,
    };
    let mut harness = Harness::new(vec![script], ok_result());

    harness.orchestrator.set_input("build a counter app");
    harness.orchestrator.submit();
    yield_now().await;
    yield_now().await;

    harness.orchestrator.stop();
    assert_eq!(harness.orchestrator.phase, Phase::Idle);
    harness.orchestrator.stop();
    assert_eq!(harness.orchestrator.phase, Phase::Idle);

    // Anything the cancelled session already queued is dropped.
    harness.drain();
    assert_eq!(harness.orchestrator.phase, Phase::Idle);
    assert_eq!(harness.trailing_content(), "");
    assert!(harness.sandbox.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn it_ignores_superseded_dispatch_results() {
    let first = Script {
        snapshots: vec![complete("OLD")],
        fail: None,
    };
    let second = Script::default();
    let mut harness = Harness::new(vec![first, second], ok_result());

    harness.orchestrator.set_input("one");
    harness.orchestrator.submit();

    while harness.orchestrator.phase != Phase::Dispatching(SessionId(1)) {
        harness.pump_one().await;
    }

    // Let the sandbox task enqueue its result, then supersede the dispatch.
    yield_now().await;
    yield_now().await;
    harness.orchestrator.set_input("two");
    harness.orchestrator.submit();

    let event = harness.pump_one().await;
    assert!(matches!(event, Event::ExecutionFinished(SessionId(1), _)));
    assert_eq!(harness.orchestrator.result, None);
    assert_eq!(harness.orchestrator.phase, Phase::Generating(SessionId(2)));
}
