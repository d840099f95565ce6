use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use serde_json::{Value, json};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
};
use wiremock::{
    Match, Mock, MockServer, Request as WiremockRequest, ResponseTemplate,
    matchers::{method, path},
};
use xai_client::{AnalysisTask, DevAssistant, XaiClient, XaiConfig, XaiError};

const SAMPLE_CODE: &str = "function add(a, b) { return a + b; }";

#[derive(Clone)]
struct SystemPromptIs(AnalysisTask);

impl Match for SystemPromptIs {
    fn matches(&self, request: &WiremockRequest) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .map(|body| body["messages"][0]["content"] == self.0.system_prompt())
            .unwrap_or(false)
    }
}

/// Counts error-level events emitted by the assistant module.
#[derive(Clone, Default)]
struct AssistantErrors(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for AssistantErrors {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() == tracing::Level::ERROR
            && metadata.target().starts_with("xai_client::assistant")
        {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn assistant_for(server: &MockServer) -> DevAssistant {
    let client =
        XaiClient::new(XaiConfig::new("test-key").with_base_url(format!("{}/v1", server.uri())))
            .expect("client");
    DevAssistant::new(client)
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "grok-2-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

async fn mount_task(server: &MockServer, task: AnalysisTask, reply: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(SystemPromptIs(task))
        .respond_with(completion(reply))
        .mount(server)
        .await;
}

#[tokio::test]
async fn find_bugs_returns_reply_text() {
    let server = MockServer::start().await;
    mount_task(&server, AnalysisTask::Bugs, "No input validation.").await;

    let bugs = assistant_for(&server)
        .find_bugs(SAMPLE_CODE)
        .await
        .expect("bugs");
    assert_eq!(bugs, "No input validation.");

    let requests = server.received_requests().await.expect("requests");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["model"], "grok-2-mini");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(
        body["messages"][1]["content"],
        format!("Find potential bugs in this code:\n\n{SAMPLE_CODE}")
    );
    assert!((body["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
}

#[tokio::test]
async fn improve_runs_three_tasks_in_order() {
    let server = MockServer::start().await;
    mount_task(&server, AnalysisTask::Documentation, "/** Adds two numbers. */").await;
    mount_task(&server, AnalysisTask::Bugs, "String inputs concatenate.").await;
    mount_task(&server, AnalysisTask::Refactoring, "Use an arrow function.").await;

    let report = assistant_for(&server)
        .improve(SAMPLE_CODE)
        .await
        .expect("report");

    assert_eq!(report.documentation, "/** Adds two numbers. */");
    assert_eq!(report.issues, "String inputs concatenate.");
    assert_eq!(report.improvements, "Use an arrow function.");

    let requests = server.received_requests().await.expect("requests");
    let prompts: Vec<String> = requests
        .iter()
        .map(|request| {
            let body: Value = serde_json::from_slice(&request.body).expect("json body");
            body["messages"][0]["content"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        prompts,
        vec![
            AnalysisTask::Documentation.system_prompt(),
            AnalysisTask::Bugs.system_prompt(),
            AnalysisTask::Refactoring.system_prompt(),
        ]
    );
}

#[tokio::test]
async fn improve_stops_at_first_failure() {
    let server = MockServer::start().await;
    mount_task(&server, AnalysisTask::Documentation, "docs").await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(SystemPromptIs(AnalysisTask::Bugs))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "overloaded" })))
        .mount(&server)
        .await;

    let err = assistant_for(&server)
        .improve(SAMPLE_CODE)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(500));

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn missing_reply_text_is_unexpected_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = assistant_for(&server)
        .with_model("grok-beta")
        .review_code(SAMPLE_CODE)
        .await
        .unwrap_err();
    assert!(matches!(err, XaiError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn failed_analysis_is_returned_not_logged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "message": "down" })))
        .mount(&server)
        .await;

    let errors = AssistantErrors::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(errors.clone()));

    let err = assistant_for(&server)
        .generate_tests(SAMPLE_CODE)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(503));
    assert_eq!(errors.0.load(Ordering::SeqCst), 0);
}
