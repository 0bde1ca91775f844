use super::HttpSandbox;
use crate::domain::models::Artifact;
use crate::domain::models::ExecutionResult;
use crate::domain::models::FailureReason;
use crate::domain::models::SandboxBackend;

impl HttpSandbox {
    fn with_url(url: String) -> HttpSandbox {
        return HttpSandbox { url };
    }
}

fn artifact() -> Artifact {
    return Artifact {
        commentary: "I built a counter app.".to_string(),
        template: "nextjs-developer".to_string(),
        title: "Counter".to_string(),
        description: "A simple counter app.".to_string(),
        additional_dependencies: vec![],
        has_additional_dependencies: false,
        install_dependencies_command: None,
        port: Some(3000),
        file_path: "pages/index.tsx".to_string(),
        code: "export default function Counter() {}".to_string(),
    };
}

#[tokio::test]
async fn it_executes_artifacts() {
    let body = serde_json::to_string(&ExecutionResult {
        url: Some("https://sandbox.example/abc".to_string()),
        stdout: "".to_string(),
        stderr: "".to_string(),
        exit_code: Some(0),
        template: Some("nextjs-developer".to_string()),
    })
    .unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/sandbox")
        .with_status(200)
        .with_body(body)
        .create();

    let backend = HttpSandbox::with_url(server.url());
    let res = backend
        .execute(&artifact(), "user-1", Some("sk-test"))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(res.url.as_deref(), Some("https://sandbox.example/abc"));
    assert_eq!(res.exit_code, Some(0));
}

#[tokio::test]
async fn it_maps_non_success_to_execution_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/api/sandbox").with_status(500).create();

    let backend = HttpSandbox::with_url(server.url());
    let res = backend.execute(&artifact(), "user-1", None).await;

    mock.assert();
    match res.unwrap_err() {
        FailureReason::Execution(reason) => assert!(reason.contains("500")),
        other => panic!("expected an execution failure, got {other:?}"),
    }
}

#[tokio::test]
async fn it_maps_bad_payloads_to_execution_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/sandbox")
        .with_status(200)
        .with_body("not json")
        .create();

    let backend = HttpSandbox::with_url(server.url());
    let res = backend.execute(&artifact(), "user-1", None).await;

    mock.assert();
    assert!(matches!(res.unwrap_err(), FailureReason::Execution(_)));
}
