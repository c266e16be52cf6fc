//! High-level Obot client and per-resource facades.
//!
//! `ObotClient` owns the transport; each resource (agents, threads, tools,
//! models, credentials, webhooks, workflows, runs) gets a thin facade built
//! on the shared request/classify path. Chat lives directly on the client
//! because it is the one endpoint with protocol behavior beyond CRUD.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::chat::{extract_message, Conversation, THREAD_ID_HEADER};
use crate::client::response::{classify, ensure_success, ApiResponse};
use crate::client::stream::TextStream;
use crate::client::transport::{EndpointCall, Transport};
use crate::error::{ObotError, ObotResult};
use crate::types::{
    Agent, AgentCreate, AgentUpdate, Credential, CredentialCreate, ItemList, Model, ModelProvider,
    Run, Thread, Tool, Webhook, WebhookCreate, Workflow, WorkflowCreate,
};

/// Client for the Obot API.
///
/// Cheap to clone — clones share the underlying connection pool. Built via
/// [`ClientBuilder`]:
///
/// ```no_run
/// use obot_rs::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> obot_rs::ObotResult<()> {
/// let client = ClientBuilder::new("https://obot.example.com")
///     .with_token("sk-token")
///     .with_timeout(Duration::from_secs(60))
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// [`ClientBuilder`]: crate::builders::ClientBuilder
#[derive(Clone)]
pub struct ObotClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ObotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObotClient").finish_non_exhaustive()
    }
}

impl ObotClient {
    /// Create a client for the given base URL with default configuration
    /// (no token, no timeout). Use [`ClientBuilder`] for more control.
    ///
    /// [`ClientBuilder`]: crate::builders::ClientBuilder
    pub fn new(base_url: impl AsRef<str>) -> ObotResult<Self> {
        crate::builders::ClientBuilder::new(base_url.as_ref()).build()
    }

    /// Create a client with a custom transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Close the client and release held resources.
    ///
    /// Safe to call at any time; clones of this client keep the shared pool
    /// alive until the last one is dropped. A close failure never masks an
    /// in-flight operation's error — it is reported on its own.
    pub async fn close(self) -> ObotResult<()> {
        self.transport.close().await
    }

    // ──────────────────────────────────────────────────
    // Resource facades
    // ──────────────────────────────────────────────────

    /// Agent operations.
    pub fn agents(&self) -> AgentsApi<'_> {
        AgentsApi { client: self }
    }

    /// Thread operations.
    pub fn threads(&self) -> ThreadsApi<'_> {
        ThreadsApi { client: self }
    }

    /// Tool-reference operations.
    pub fn tools(&self) -> ToolsApi<'_> {
        ToolsApi { client: self }
    }

    /// Model and model-provider operations.
    pub fn models(&self) -> ModelsApi<'_> {
        ModelsApi { client: self }
    }

    /// Credential operations.
    pub fn credentials(&self) -> CredentialsApi<'_> {
        CredentialsApi { client: self }
    }

    /// Webhook operations.
    pub fn webhooks(&self) -> WebhooksApi<'_> {
        WebhooksApi { client: self }
    }

    /// Workflow operations.
    pub fn workflows(&self) -> WorkflowsApi<'_> {
        WorkflowsApi { client: self }
    }

    /// Run operations.
    pub fn runs(&self) -> RunsApi<'_> {
        RunsApi { client: self }
    }

    // ──────────────────────────────────────────────────
    // Chat
    // ──────────────────────────────────────────────────

    /// Start a conversation: send `message` to the agent and return a
    /// [`Conversation`] that continues the discovered thread.
    ///
    /// The thread id comes from the `X-Obot-Thread-Id` response header; if
    /// the server sends none, this fails with [`ObotError::Protocol`] — a
    /// conversation cannot be constructed without an id to continue it.
    pub async fn chat(&self, agent_id: &str, message: &str) -> ObotResult<Conversation> {
        let (reply, thread_id) = self.invoke(agent_id, message, None).await?;
        let thread_id = thread_id
            .ok_or_else(|| ObotError::protocol("no thread id found in response headers"))?;
        tracing::debug!(agent_id, thread_id = %thread_id, "conversation started");
        Ok(Conversation::new(self.clone(), agent_id, thread_id, reply))
    }

    /// Continue an existing thread as a [`Conversation`].
    ///
    /// The supplied `thread_id` wins over anything the server reports, so
    /// this never fails on thread-id discovery.
    pub async fn chat_in_thread(
        &self,
        agent_id: &str,
        message: &str,
        thread_id: &str,
    ) -> ObotResult<Conversation> {
        let (reply, _) = self.invoke(agent_id, message, Some(thread_id)).await?;
        Ok(Conversation::new(self.clone(), agent_id, thread_id, reply))
    }

    /// Send one message and return just the reply text.
    ///
    /// Pass `thread_id` to land the turn in an existing thread; with `None`
    /// the service opens a fresh thread. No thread id is required or
    /// discovered on this path.
    pub async fn chat_once(
        &self,
        agent_id: &str,
        message: &str,
        thread_id: Option<&str>,
    ) -> ObotResult<String> {
        let (reply, _) = self.invoke(agent_id, message, thread_id).await?;
        Ok(reply)
    }

    /// Send one message and stream the reply as text chunks.
    ///
    /// The returned stream holds the connection open until it is exhausted
    /// or dropped. The thread id, if needed for a later conversation, is on
    /// [`TextStream::thread_id()`] from the moment the stream opens.
    ///
    /// [`TextStream::thread_id()`]: crate::TextStream::thread_id
    pub async fn chat_stream(
        &self,
        agent_id: &str,
        message: &str,
        thread_id: Option<&str>,
    ) -> ObotResult<TextStream> {
        let call = invoke_call(agent_id, message, thread_id);
        self.transport.execute_stream(call).await
    }

    /// One non-streaming invoke exchange: returns the extracted reply and
    /// the continuing thread id (supplied id first, response header second).
    async fn invoke(
        &self,
        agent_id: &str,
        message: &str,
        thread_id: Option<&str>,
    ) -> ObotResult<(String, Option<String>)> {
        let call = invoke_call(agent_id, message, thread_id);
        let path = call.path.clone();
        let response = self.transport.execute(call).await?;
        ensure_success(&response, &path)?;

        let reply = extract_message(&response.body);
        let continuing = thread_id
            .map(str::to_string)
            .or_else(|| response.header(THREAD_ID_HEADER).map(str::to_string));
        Ok((reply, continuing))
    }

    // ──────────────────────────────────────────────────
    // Shared request/classify path
    // ──────────────────────────────────────────────────

    pub(crate) async fn get_json(&self, path: &str) -> ObotResult<Value> {
        self.classified(EndpointCall::get(path)).await
    }

    pub(crate) async fn post_json(&self, path: &str, body: Value) -> ObotResult<Value> {
        self.classified(EndpointCall::post(path).with_json(body)).await
    }

    pub(crate) async fn put_json(&self, path: &str, body: Value) -> ObotResult<Value> {
        self.classified(EndpointCall::put(path).with_json(body)).await
    }

    pub(crate) async fn delete_json(&self, path: &str) -> ObotResult<Value> {
        self.classified(EndpointCall::delete(path)).await
    }

    async fn classified(&self, call: EndpointCall) -> ObotResult<Value> {
        let path = call.path.clone();
        let response: ApiResponse = self.transport.execute(call).await?;
        classify(response, &path)
    }
}

fn invoke_call(agent_id: &str, message: &str, thread_id: Option<&str>) -> EndpointCall {
    let mut call = EndpointCall::post(format!("invoke/{agent_id}"))
        .with_text(message)
        .with_header("Content-Type", "text/plain");
    if let Some(id) = thread_id {
        call = call.with_header(THREAD_ID_HEADER, id);
    }
    call
}

/// Decode a classified value into a typed record.
fn from_value<T: DeserializeOwned>(value: Value, what: &str) -> ObotResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ObotError::protocol(format!("unexpected {what} payload: {e}")))
}

/// Decode a list response. Accepts both the `{"items": [...]}` envelope and
/// a bare array; an empty (`Null`) result expands to an empty list.
fn item_list<T: DeserializeOwned>(value: Value, what: &str) -> ObotResult<Vec<T>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => from_value(value, what),
        other => {
            let list: ItemList<T> = from_value(other, what)?;
            Ok(list.items)
        }
    }
}

// ============================================================================
// Agents
// ============================================================================

/// Agent CRUD operations.
#[derive(Debug)]
pub struct AgentsApi<'a> {
    client: &'a ObotClient,
}

impl AgentsApi<'_> {
    /// List all agents.
    pub async fn list(&self) -> ObotResult<Vec<Agent>> {
        let value = self.client.get_json("agents").await?;
        item_list(value, "agent list")
    }

    /// Get one agent by id.
    pub async fn get(&self, agent_id: &str) -> ObotResult<Agent> {
        let value = self.client.get_json(&format!("agents/{agent_id}")).await?;
        from_value(value, "agent")
    }

    /// Create an agent.
    ///
    /// The model **name** in `spec` is resolved to its model id against the
    /// active models, and tool ids are validated against the service's tool
    /// references — both before the create request is issued. Unknown names
    /// or ids fail with [`ObotError::Validation`] and nothing is created.
    pub async fn create(&self, spec: AgentCreate) -> ObotResult<Agent> {
        let mut body = serde_json::to_value(&spec)?;

        if let Some(model_name) = spec.model.as_deref() {
            let model_id = self.resolve_model_id(model_name).await?;
            body["model"] = Value::String(model_id);
        }
        if let Some(tool_ids) = spec.tools.as_deref() {
            self.validate_tool_ids(tool_ids).await?;
        }

        let value = self.client.post_json("agents", body).await?;
        from_value(value, "agent")
    }

    /// Update specific fields of an existing agent.
    ///
    /// Fetches the agent's current state, overlays only the fields set in
    /// `changes` (model names resolved, tool ids validated, as in
    /// [`create()`]), and PUTs the merged record back.
    ///
    /// [`create()`]: AgentsApi::create
    pub async fn update(&self, agent_id: &str, changes: AgentUpdate) -> ObotResult<Agent> {
        let current = self.get(agent_id).await?;

        let mut changes = changes;
        if let Some(model_name) = changes.model.take() {
            changes.model = Some(self.resolve_model_id(&model_name).await?);
        }
        if let Some(tool_ids) = changes.tools.as_deref() {
            self.validate_tool_ids(tool_ids).await?;
        }

        let mut merged = serde_json::to_value(&current)?;
        let overlay = serde_json::to_value(&changes)?;
        if let (Value::Object(merged), Value::Object(overlay)) = (&mut merged, overlay) {
            for (key, value) in overlay {
                merged.insert(key, value);
            }
        }

        let value = self
            .client
            .put_json(&format!("agents/{agent_id}"), merged)
            .await?;
        from_value(value, "agent")
    }

    /// Resolve a model name to its id among the **active** models.
    async fn resolve_model_id(&self, model_name: &str) -> ObotResult<String> {
        let models = self.client.models().list(None, Some(true)).await?;
        if let Some(model) = models.iter().find(|m| m.name == model_name) {
            return Ok(model.id.clone());
        }
        let available: Vec<String> = models.into_iter().map(|m| m.name).collect();
        Err(ObotError::validation(
            format!(
                "model '{model_name}' not found or not active; available active models: {}",
                available.join(", ")
            ),
            vec![model_name.to_string()],
            available,
        ))
    }

    /// Validate that every tool id exists among the `toolType == "tool"`
    /// references.
    async fn validate_tool_ids(&self, tool_ids: &[String]) -> ObotResult<()> {
        let tools = self.client.tools().list(None).await?;
        let valid: BTreeSet<&str> = tools.iter().map(|t| t.id.as_str()).collect();

        let invalid: Vec<String> = tool_ids
            .iter()
            .filter(|id| !valid.contains(id.as_str()))
            .cloned()
            .collect();
        if invalid.is_empty() {
            return Ok(());
        }

        let available: Vec<String> = tools.into_iter().map(|t| t.id).collect();
        Err(ObotError::validation(
            format!(
                "invalid tool ids: {}; available tool ids: {}",
                invalid.join(", "),
                available.join(", ")
            ),
            invalid,
            available,
        ))
    }
}

// ============================================================================
// Threads
// ============================================================================

/// Thread operations.
#[derive(Debug)]
pub struct ThreadsApi<'a> {
    client: &'a ObotClient,
}

impl ThreadsApi<'_> {
    /// List all threads.
    pub async fn list(&self) -> ObotResult<Vec<Thread>> {
        let value = self.client.get_json("threads").await?;
        item_list(value, "thread list")
    }

    /// Get one thread by id.
    pub async fn get(&self, thread_id: &str) -> ObotResult<Thread> {
        let value = self
            .client
            .get_json(&format!("threads/{thread_id}"))
            .await?;
        from_value(value, "thread")
    }

    /// Delete a thread.
    pub async fn delete(&self, thread_id: &str) -> ObotResult<()> {
        self.client
            .delete_json(&format!("threads/{thread_id}"))
            .await?;
        Ok(())
    }
}

// ============================================================================
// Tools
// ============================================================================

/// Tool-reference operations. Only references with `toolType == "tool"` are
/// surfaced; model providers and other reference kinds are filtered out.
#[derive(Debug)]
pub struct ToolsApi<'a> {
    client: &'a ObotClient,
}

impl ToolsApi<'_> {
    /// List available tools, optionally filtered by metadata category.
    pub async fn list(&self, category: Option<&str>) -> ObotResult<Vec<Tool>> {
        let value = self.client.get_json("tool-references").await?;
        let tools: Vec<Tool> = item_list(value, "tool list")?;
        Ok(tools
            .into_iter()
            .filter(|t| t.tool_type == "tool")
            .filter(|t| category.is_none() || t.category() == category)
            .collect())
    }

    /// List the distinct tool categories, sorted.
    pub async fn categories(&self) -> ObotResult<Vec<String>> {
        let tools = self.list(None).await?;
        let categories: BTreeSet<String> = tools
            .iter()
            .filter_map(|t| t.category())
            .map(str::to_string)
            .collect();
        Ok(categories.into_iter().collect())
    }
}

// ============================================================================
// Models
// ============================================================================

/// Model and model-provider operations.
#[derive(Debug)]
pub struct ModelsApi<'a> {
    client: &'a ObotClient,
}

impl ModelsApi<'_> {
    /// List models, optionally filtered by provider and/or active status.
    pub async fn list(
        &self,
        provider: Option<&str>,
        active: Option<bool>,
    ) -> ObotResult<Vec<Model>> {
        let value = self.client.get_json("models").await?;
        let models: Vec<Model> = item_list(value, "model list")?;
        Ok(models
            .into_iter()
            .filter(|m| provider.map_or(true, |p| m.model_provider == p))
            .filter(|m| active.map_or(true, |a| m.active == a))
            .collect())
    }

    /// List model providers, optionally filtered by configuration state.
    pub async fn providers(&self, configured: Option<bool>) -> ObotResult<Vec<ModelProvider>> {
        let value = self.client.get_json("model-providers").await?;
        let providers: Vec<ModelProvider> = item_list(value, "model provider list")?;
        Ok(providers
            .into_iter()
            .filter(|p| configured.map_or(true, |c| p.configured == c))
            .collect())
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Credential operations.
#[derive(Debug)]
pub struct CredentialsApi<'a> {
    client: &'a ObotClient,
}

impl CredentialsApi<'_> {
    /// List stored credentials.
    pub async fn list(&self) -> ObotResult<Vec<Credential>> {
        let value = self.client.get_json("credentials").await?;
        item_list(value, "credential list")
    }

    /// Store a new credential.
    pub async fn create(&self, spec: CredentialCreate) -> ObotResult<Credential> {
        let body = serde_json::to_value(&spec)?;
        let value = self.client.post_json("credentials", body).await?;
        from_value(value, "credential")
    }

    /// Delete a credential.
    pub async fn delete(&self, credential_id: &str) -> ObotResult<()> {
        self.client
            .delete_json(&format!("credentials/{credential_id}"))
            .await?;
        Ok(())
    }
}

// ============================================================================
// Webhooks
// ============================================================================

/// Webhook operations.
#[derive(Debug)]
pub struct WebhooksApi<'a> {
    client: &'a ObotClient,
}

impl WebhooksApi<'_> {
    /// List registered webhooks.
    pub async fn list(&self) -> ObotResult<Vec<Webhook>> {
        let value = self.client.get_json("webhooks").await?;
        item_list(value, "webhook list")
    }

    /// Register a webhook.
    pub async fn create(&self, spec: WebhookCreate) -> ObotResult<Webhook> {
        let body = serde_json::to_value(&spec)?;
        let value = self.client.post_json("webhooks", body).await?;
        from_value(value, "webhook")
    }

    /// Remove a webhook.
    pub async fn delete(&self, webhook_id: &str) -> ObotResult<()> {
        self.client
            .delete_json(&format!("webhooks/{webhook_id}"))
            .await?;
        Ok(())
    }
}

// ============================================================================
// Workflows
// ============================================================================

/// Workflow operations.
#[derive(Debug)]
pub struct WorkflowsApi<'a> {
    client: &'a ObotClient,
}

impl WorkflowsApi<'_> {
    /// List workflows.
    pub async fn list(&self) -> ObotResult<Vec<Workflow>> {
        let value = self.client.get_json("workflows").await?;
        item_list(value, "workflow list")
    }

    /// Get one workflow by id.
    pub async fn get(&self, workflow_id: &str) -> ObotResult<Workflow> {
        let value = self
            .client
            .get_json(&format!("workflows/{workflow_id}"))
            .await?;
        from_value(value, "workflow")
    }

    /// Create a workflow.
    pub async fn create(&self, spec: WorkflowCreate) -> ObotResult<Workflow> {
        let body = serde_json::to_value(&spec)?;
        let value = self.client.post_json("workflows", body).await?;
        from_value(value, "workflow")
    }

    /// Delete a workflow.
    pub async fn delete(&self, workflow_id: &str) -> ObotResult<()> {
        self.client
            .delete_json(&format!("workflows/{workflow_id}"))
            .await?;
        Ok(())
    }
}

// ============================================================================
// Runs
// ============================================================================

/// Run operations.
#[derive(Debug)]
pub struct RunsApi<'a> {
    client: &'a ObotClient,
}

impl RunsApi<'_> {
    /// List runs.
    pub async fn list(&self) -> ObotResult<Vec<Run>> {
        let value = self.client.get_json("runs").await?;
        item_list(value, "run list")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_list_accepts_envelope() {
        let value = json!({"items": [{"id": "t-1"}]});
        let threads: Vec<Thread> = item_list(value, "thread list").unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].id, "t-1");
    }

    #[test]
    fn item_list_accepts_bare_array() {
        let value = json!([{"id": "t-1"}, {"id": "t-2"}]);
        let threads: Vec<Thread> = item_list(value, "thread list").unwrap();
        assert_eq!(threads.len(), 2);
    }

    #[test]
    fn item_list_expands_null_to_empty() {
        let threads: Vec<Thread> = item_list(Value::Null, "thread list").unwrap();
        assert!(threads.is_empty());
    }

    #[test]
    fn from_value_reports_shape_mismatch_as_protocol_error() {
        let err = from_value::<Thread>(json!({"title": "no id"}), "thread").unwrap_err();
        match err {
            ObotError::Protocol(msg) => assert!(msg.contains("thread")),
            other => panic!("expected Protocol, got {other:?}"),
        }
    }

    #[test]
    fn invoke_call_sets_text_plain_and_thread_header() {
        let call = invoke_call("a1", "hi", Some("t-9"));
        assert_eq!(call.path, "invoke/a1");
        assert_eq!(call.text.as_deref(), Some("hi"));
        assert!(call
            .headers
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "text/plain"));
        assert!(call
            .headers
            .iter()
            .any(|(k, v)| k == THREAD_ID_HEADER && v == "t-9"));
    }

    #[test]
    fn invoke_call_without_thread_id_omits_header() {
        let call = invoke_call("a1", "hi", None);
        assert!(!call.headers.iter().any(|(k, _)| k == THREAD_ID_HEADER));
    }
}
