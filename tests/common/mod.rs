#![allow(dead_code)]
//! Shared test utilities: an in-process mock Obot server.
//!
//! The server speaks just enough of the Obot API for the client tests:
//! agent CRUD with canned fixtures, model/tool references for validation,
//! and an invoke endpoint whose behavior is selected by agent id
//! ("echo", "fragmented", "plain", "no-thread", "streamer", "firehose",
//! "missing").

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Observable server-side state for assertions.
#[derive(Default)]
pub struct MockState {
    /// Number of POST /api/agents requests that reached the server.
    pub create_hits: AtomicUsize,
    /// The X-Obot-Thread-Id header of the last invoke request, if any.
    pub last_thread_header: Mutex<Option<String>>,
    /// Body of the last PUT /api/agents/{id} request.
    pub last_put_body: Mutex<Option<Value>>,
    /// Set when a "firehose" stream consumer disconnected mid-stream.
    pub stream_cancelled: Arc<AtomicBool>,
    /// When set, every request must carry `Authorization: Bearer <token>`.
    pub require_token: Option<String>,
}

impl MockState {
    pub fn with_required_token(token: &str) -> Self {
        Self {
            require_token: Some(token.to_string()),
            ..Self::default()
        }
    }
}

/// Start the mock server on an ephemeral port. Returns the base URL
/// (without `/api` — the client appends it) and the shared state handle.
pub async fn start_server() -> (String, Arc<MockState>) {
    start_server_with(MockState::default()).await
}

pub async fn start_server_with(state: MockState) -> (String, Arc<MockState>) {
    let state = Arc::new(state);
    let router = app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

fn app(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/agents", get(list_agents).post(create_agent))
        .route("/api/agents/{id}", get(get_agent).put(update_agent))
        .route("/api/models", get(list_models))
        .route("/api/model-providers", get(list_model_providers))
        .route("/api/tool-references", get(list_tool_references))
        .route("/api/threads", get(list_threads))
        .route("/api/threads/{id}", get(get_thread).delete(delete_thread))
        .route("/api/credentials", get(list_credentials).post(create_credential))
        .route("/api/credentials/{id}", delete(delete_ok))
        .route("/api/webhooks", get(list_webhooks).post(create_webhook))
        .route("/api/webhooks/{id}", delete(delete_ok))
        .route("/api/workflows", get(list_workflows).post(create_workflow))
        .route("/api/workflows/{id}", get(get_workflow).delete(delete_ok))
        .route("/api/runs", get(list_runs))
        .route("/api/invoke/{agent_id}", post(invoke))
        .layer(middleware::from_fn_with_state(state.clone(), check_auth))
        .with_state(state)
}

async fn check_auth(
    State(state): State<Arc<MockState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = &state.require_token {
        let authorized = request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {expected}"))
            .unwrap_or(false);
        if !authorized {
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }
    next.run(request).await
}

// ===========================================================================
// Fixtures
// ===========================================================================

pub fn agent_fixture() -> Value {
    json!({
        "name": "helper",
        "description": "general helper",
        "prompt": "You are helpful.",
        "model": "m1-gpt4o",
        "tools": ["t1-search"],
        "id": "a1-abc",
        "created": "2026-01-05T10:00:00Z",
        "revision": "1",
        "type": "agent",
        "links": { "invoke": "http://obot.local/api/invoke/a1-abc" }
    })
}

fn models_fixture() -> Value {
    json!({ "items": [
        {
            "id": "m1-gpt4o", "name": "gpt-4o", "targetModel": "gpt-4o-2024",
            "modelProvider": "openai", "active": true, "usage": "llm"
        },
        {
            "id": "m2-legacy", "name": "legacy", "targetModel": "legacy-1",
            "modelProvider": "openai", "active": false, "usage": "llm"
        },
        {
            "id": "m3-claude", "name": "claude", "targetModel": "claude-3",
            "modelProvider": "anthropic", "active": true, "usage": "llm"
        }
    ]})
}

fn tool_references_fixture() -> Value {
    json!({ "items": [
        {
            "id": "t1-search", "name": "search", "toolType": "tool",
            "description": "web search", "active": true,
            "metadata": { "category": "Retrieval" }
        },
        {
            "id": "t2-browser", "name": "browser", "toolType": "tool",
            "description": "headless browser", "active": true,
            "metadata": { "category": "Web" }
        },
        {
            "id": "t9-openai-provider", "name": "openai", "toolType": "modelProvider",
            "description": "not a tool", "active": true
        }
    ]})
}

// ===========================================================================
// Agents
// ===========================================================================

async fn list_agents() -> Json<Value> {
    Json(json!({ "items": [agent_fixture()] }))
}

async fn get_agent(Path(id): Path<String>) -> Response {
    if id == "a1-abc" {
        Json(agent_fixture()).into_response()
    } else {
        (StatusCode::NOT_FOUND, "agent not found").into_response()
    }
}

async fn create_agent(
    State(state): State<Arc<MockState>>,
    Json(mut body): Json<Value>,
) -> Json<Value> {
    state.create_hits.fetch_add(1, Ordering::SeqCst);
    body["id"] = json!("a2-new");
    body["created"] = json!("2026-02-01T00:00:00Z");
    body["type"] = json!("agent");
    Json(body)
}

async fn update_agent(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Json<Value> {
    *state.last_put_body.lock().unwrap() = Some(body.clone());
    body["id"] = json!(id);
    body["revision"] = json!("2");
    Json(body)
}

// ===========================================================================
// Models / tools
// ===========================================================================

async fn list_models() -> Json<Value> {
    Json(models_fixture())
}

async fn list_model_providers() -> Json<Value> {
    Json(json!({ "items": [
        {
            "id": "mp1-openai", "name": "openai", "configured": true,
            "requiredConfigurationParameters": ["OPENAI_API_KEY"]
        },
        {
            "id": "mp2-anthropic", "name": "anthropic", "configured": false,
            "requiredConfigurationParameters": ["ANTHROPIC_API_KEY"],
            "missingConfigurationParameters": ["ANTHROPIC_API_KEY"]
        }
    ]}))
}

async fn list_tool_references() -> Json<Value> {
    Json(tool_references_fixture())
}

// ===========================================================================
// Threads / credentials / webhooks / workflows / runs
// ===========================================================================

async fn list_threads() -> Json<Value> {
    Json(json!({ "items": [
        { "id": "t-1", "title": "deploy chat" },
        { "id": "t-2" }
    ]}))
}

async fn get_thread(Path(id): Path<String>) -> Response {
    if id == "t-1" {
        Json(json!({ "id": "t-1", "title": "deploy chat" })).into_response()
    } else {
        (StatusCode::NOT_FOUND, "thread not found").into_response()
    }
}

async fn delete_thread() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn delete_ok() -> Json<Value> {
    Json(json!({ "status": "deleted" }))
}

async fn list_credentials() -> Json<Value> {
    Json(json!({ "items": [
        { "id": "c-1", "provider": "github", "secretName": "GH_TOKEN" }
    ]}))
}

async fn create_credential(Json(mut body): Json<Value>) -> Json<Value> {
    body["id"] = json!("c-2");
    body.as_object_mut().unwrap().remove("secretValue");
    Json(body)
}

async fn list_webhooks() -> Json<Value> {
    Json(json!({ "items": [
        { "id": "w-1", "url": "https://hooks.example.com/1", "event": "run.finished" }
    ]}))
}

async fn create_webhook(Json(mut body): Json<Value>) -> Json<Value> {
    body["id"] = json!("w-2");
    Json(body)
}

// Workflows answer inside a `data` envelope to exercise the unwrap path.
async fn list_workflows() -> Json<Value> {
    Json(json!({ "data": { "items": [
        { "id": "wf-1", "name": "nightly-report", "description": "nightly" }
    ]}}))
}

async fn get_workflow(Path(id): Path<String>) -> Response {
    if id == "wf-1" {
        Json(json!({ "id": "wf-1", "name": "nightly-report" })).into_response()
    } else {
        (StatusCode::NOT_FOUND, "workflow not found").into_response()
    }
}

async fn create_workflow(Json(mut body): Json<Value>) -> Json<Value> {
    body["id"] = json!("wf-2");
    Json(body)
}

async fn list_runs() -> Json<Value> {
    Json(json!({ "items": [
        { "id": "r-1", "status": "completed", "result": "ok" },
        { "id": "r-2", "status": "running" }
    ]}))
}

// ===========================================================================
// Invoke
// ===========================================================================

async fn invoke(
    State(state): State<Arc<MockState>>,
    Path(agent_id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let supplied = headers
        .get("x-obot-thread-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    *state.last_thread_header.lock().unwrap() = supplied.clone();

    // Continue the supplied thread or mint a fresh one, like the real server.
    let thread_id = supplied.unwrap_or_else(|| format!("t-{}", uuid::Uuid::new_v4()));

    match agent_id.as_str() {
        "missing" => (StatusCode::NOT_FOUND, "agent not found").into_response(),
        "fragmented" => with_thread(
            &thread_id,
            Json(json!({ "items": [
                { "content": "Hel", "contentID": "a" },
                { "content": "lo", "contentID": "a" },
                { "type": "system" }
            ]}))
            .into_response(),
        ),
        "plain" => with_thread(&thread_id, "  plain text reply  ".into_response()),
        "no-thread" => Json(json!({ "items": [
            { "content": "orphan reply", "contentID": "a" }
        ]}))
        .into_response(),
        "streamer" => with_thread(
            &thread_id,
            stream_response(
                vec!["Once ", "upon ", "a ", "time."],
                state.stream_cancelled.clone(),
                false,
            ),
        ),
        "firehose" => with_thread(
            &thread_id,
            stream_response(
                (0..1000).map(|i| format!("chunk-{i} ")).collect::<Vec<_>>(),
                state.stream_cancelled.clone(),
                true,
            ),
        ),
        _ => with_thread(
            &thread_id,
            Json(json!({ "items": [
                { "content": format!("Echo: {body}"), "contentID": "0" }
            ]}))
            .into_response(),
        ),
    }
}

fn with_thread(thread_id: &str, mut response: Response) -> Response {
    response
        .headers_mut()
        .insert("X-Obot-Thread-Id", thread_id.parse().unwrap());
    response
}

/// Build a chunked streaming response. With `throttle` the chunks are paced
/// so a disconnecting consumer is detected (recorded in `cancelled`).
fn stream_response<S: Into<Bytes>>(
    chunks: Vec<S>,
    cancelled: Arc<AtomicBool>,
    throttle: bool,
) -> Response {
    let chunks: Vec<Bytes> = chunks.into_iter().map(Into::into).collect();
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Bytes, std::convert::Infallible>>(1);

    tokio::spawn(async move {
        for chunk in chunks {
            if tx.send(Ok(chunk)).await.is_err() {
                cancelled.store(true, Ordering::SeqCst);
                return;
            }
            if throttle {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    });

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });

    Response::builder()
        .header("Content-Type", "text/plain")
        .body(Body::from_stream(stream))
        .unwrap()
}
