//! Blocking client — the synchronous calling convention.
//!
//! The protocol is implemented once, in the async client; this module is a
//! thin adapter that drives it to completion on a private current-thread
//! runtime. Observable results are identical to the async client for
//! identical inputs — the difference is purely how callers await completion.
//!
//! # Example
//!
//! ```no_run
//! use obot_rs::blocking::ObotClient;
//!
//! # fn example() -> obot_rs::ObotResult<()> {
//! let client = ObotClient::new("https://obot.example.com")?;
//! let mut convo = client.chat("a1-helper", "hello")?;
//! println!("{}", convo.last_reply());
//! convo.send("tell me more")?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::client::TextStream;
use crate::error::{ObotError, ObotResult};
use crate::types::{
    Agent, AgentCreate, AgentUpdate, Credential, CredentialCreate, Model, ModelProvider, Run,
    Thread, Tool, Webhook, WebhookCreate, Workflow, WorkflowCreate,
};

/// Blocking client for the Obot API.
///
/// Wraps the async [`ObotClient`](crate::ObotClient) and a private
/// current-thread runtime. Cheap to clone; clones share the runtime and the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ObotClient {
    inner: crate::ObotClient,
    runtime: Arc<Runtime>,
}

impl ObotClient {
    /// Create a blocking client with default configuration. Use
    /// [`ClientBuilder::build_blocking()`] for token/timeout settings.
    ///
    /// [`ClientBuilder::build_blocking()`]: crate::builders::ClientBuilder::build_blocking
    pub fn new(base_url: impl AsRef<str>) -> ObotResult<Self> {
        crate::builders::ClientBuilder::new(base_url.as_ref()).build_blocking()
    }

    pub(crate) fn from_async(inner: crate::ObotClient) -> ObotResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ObotError::config(format!("failed to start blocking runtime: {e}")))?;
        Ok(Self {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Close the client and release held resources. Idempotent across
    /// clones; the shared pool lives until the last clone is dropped.
    pub fn close(self) -> ObotResult<()> {
        let runtime = self.runtime.clone();
        runtime.block_on(self.inner.close())
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

    /// Start a conversation. See [`ObotClient::chat`](crate::ObotClient::chat).
    pub fn chat(&self, agent_id: &str, message: &str) -> ObotResult<Conversation> {
        let inner = self.block_on(self.inner.chat(agent_id, message))?;
        Ok(Conversation {
            inner,
            runtime: self.runtime.clone(),
        })
    }

    /// Continue an existing thread as a conversation. The supplied
    /// `thread_id` wins over anything the server reports.
    pub fn chat_in_thread(
        &self,
        agent_id: &str,
        message: &str,
        thread_id: &str,
    ) -> ObotResult<Conversation> {
        let inner = self.block_on(self.inner.chat_in_thread(agent_id, message, thread_id))?;
        Ok(Conversation {
            inner,
            runtime: self.runtime.clone(),
        })
    }

    /// Send one message and return just the reply text.
    pub fn chat_once(
        &self,
        agent_id: &str,
        message: &str,
        thread_id: Option<&str>,
    ) -> ObotResult<String> {
        self.block_on(self.inner.chat_once(agent_id, message, thread_id))
    }

    /// Send one message and iterate over the reply chunks.
    ///
    /// Dropping the iterator before exhaustion closes the connection.
    pub fn chat_stream(
        &self,
        agent_id: &str,
        message: &str,
        thread_id: Option<&str>,
    ) -> ObotResult<ChatChunks> {
        let stream = self.block_on(self.inner.chat_stream(agent_id, message, thread_id))?;
        Ok(ChatChunks {
            stream,
            runtime: self.runtime.clone(),
        })
    }
}

/// Blocking counterpart of [`Conversation`](crate::Conversation).
#[derive(Debug, Clone)]
pub struct Conversation {
    inner: crate::Conversation,
    runtime: Arc<Runtime>,
}

impl Conversation {
    /// The agent this conversation talks to.
    pub fn agent_id(&self) -> &str {
        self.inner.agent_id()
    }

    /// The service-side thread id this conversation continues.
    pub fn thread_id(&self) -> &str {
        self.inner.thread_id()
    }

    /// The reply text from the most recent non-streaming turn.
    pub fn last_reply(&self) -> &str {
        self.inner.last_reply()
    }

    /// Send the next message and return the reply, updating
    /// [`last_reply()`](Conversation::last_reply) in place.
    pub fn send(&mut self, message: &str) -> ObotResult<&str> {
        let runtime = self.runtime.clone();
        runtime.block_on(self.inner.send(message))
    }

    /// Send the next message and iterate over the reply chunks.
    pub fn send_stream(&self, message: &str) -> ObotResult<ChatChunks> {
        let runtime = self.runtime.clone();
        let stream = runtime.block_on(self.inner.send_stream(message))?;
        Ok(ChatChunks {
            stream,
            runtime: self.runtime.clone(),
        })
    }
}

impl std::fmt::Display for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.inner, f)
    }
}

/// Blocking iterator over the chunks of a streaming reply.
///
/// Each `next()` drives the underlying stream until one chunk arrives —
/// back-pressure is natural, nothing is fetched ahead of the consumer.
#[derive(Debug)]
pub struct ChatChunks {
    stream: TextStream,
    runtime: Arc<Runtime>,
}

impl ChatChunks {
    /// The continuing thread id from the response headers, if any.
    pub fn thread_id(&self) -> Option<&str> {
        self.stream.thread_id()
    }
}

impl Iterator for ChatChunks {
    type Item = ObotResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let runtime = self.runtime.clone();
        runtime.block_on(self.stream.next())
    }
}

// ============================================================================
// Facades — each method delegates to its async twin
// ============================================================================

/// Blocking agent CRUD operations.
#[derive(Debug)]
pub struct AgentsApi<'a> {
    client: &'a ObotClient,
}

impl AgentsApi<'_> {
    /// List all agents.
    pub fn list(&self) -> ObotResult<Vec<Agent>> {
        self.client.block_on(self.client.inner.agents().list())
    }

    /// Get one agent by id.
    pub fn get(&self, agent_id: &str) -> ObotResult<Agent> {
        self.client.block_on(self.client.inner.agents().get(agent_id))
    }

    /// Create an agent (model name resolved, tool ids validated — see the
    /// async [`AgentsApi::create`](crate::client::AgentsApi::create)).
    pub fn create(&self, spec: AgentCreate) -> ObotResult<Agent> {
        self.client.block_on(self.client.inner.agents().create(spec))
    }

    /// Update specific fields of an existing agent.
    pub fn update(&self, agent_id: &str, changes: AgentUpdate) -> ObotResult<Agent> {
        self.client
            .block_on(self.client.inner.agents().update(agent_id, changes))
    }
}

/// Blocking thread operations.
#[derive(Debug)]
pub struct ThreadsApi<'a> {
    client: &'a ObotClient,
}

impl ThreadsApi<'_> {
    /// List all threads.
    pub fn list(&self) -> ObotResult<Vec<Thread>> {
        self.client.block_on(self.client.inner.threads().list())
    }

    /// Get one thread by id.
    pub fn get(&self, thread_id: &str) -> ObotResult<Thread> {
        self.client
            .block_on(self.client.inner.threads().get(thread_id))
    }

    /// Delete a thread.
    pub fn delete(&self, thread_id: &str) -> ObotResult<()> {
        self.client
            .block_on(self.client.inner.threads().delete(thread_id))
    }
}

/// Blocking tool-reference operations.
#[derive(Debug)]
pub struct ToolsApi<'a> {
    client: &'a ObotClient,
}

impl ToolsApi<'_> {
    /// List available tools, optionally filtered by category.
    pub fn list(&self, category: Option<&str>) -> ObotResult<Vec<Tool>> {
        self.client.block_on(self.client.inner.tools().list(category))
    }

    /// List the distinct tool categories, sorted.
    pub fn categories(&self) -> ObotResult<Vec<String>> {
        self.client.block_on(self.client.inner.tools().categories())
    }
}

/// Blocking model and model-provider operations.
#[derive(Debug)]
pub struct ModelsApi<'a> {
    client: &'a ObotClient,
}

impl ModelsApi<'_> {
    /// List models, optionally filtered by provider and/or active status.
    pub fn list(&self, provider: Option<&str>, active: Option<bool>) -> ObotResult<Vec<Model>> {
        self.client
            .block_on(self.client.inner.models().list(provider, active))
    }

    /// List model providers, optionally filtered by configuration state.
    pub fn providers(&self, configured: Option<bool>) -> ObotResult<Vec<ModelProvider>> {
        self.client
            .block_on(self.client.inner.models().providers(configured))
    }
}

/// Blocking credential operations.
#[derive(Debug)]
pub struct CredentialsApi<'a> {
    client: &'a ObotClient,
}

impl CredentialsApi<'_> {
    /// List stored credentials.
    pub fn list(&self) -> ObotResult<Vec<Credential>> {
        self.client.block_on(self.client.inner.credentials().list())
    }

    /// Store a new credential.
    pub fn create(&self, spec: CredentialCreate) -> ObotResult<Credential> {
        self.client
            .block_on(self.client.inner.credentials().create(spec))
    }

    /// Delete a credential.
    pub fn delete(&self, credential_id: &str) -> ObotResult<()> {
        self.client
            .block_on(self.client.inner.credentials().delete(credential_id))
    }
}

/// Blocking webhook operations.
#[derive(Debug)]
pub struct WebhooksApi<'a> {
    client: &'a ObotClient,
}

impl WebhooksApi<'_> {
    /// List registered webhooks.
    pub fn list(&self) -> ObotResult<Vec<Webhook>> {
        self.client.block_on(self.client.inner.webhooks().list())
    }

    /// Register a webhook.
    pub fn create(&self, spec: WebhookCreate) -> ObotResult<Webhook> {
        self.client
            .block_on(self.client.inner.webhooks().create(spec))
    }

    /// Remove a webhook.
    pub fn delete(&self, webhook_id: &str) -> ObotResult<()> {
        self.client
            .block_on(self.client.inner.webhooks().delete(webhook_id))
    }
}

/// Blocking workflow operations.
#[derive(Debug)]
pub struct WorkflowsApi<'a> {
    client: &'a ObotClient,
}

impl WorkflowsApi<'_> {
    /// List workflows.
    pub fn list(&self) -> ObotResult<Vec<Workflow>> {
        self.client.block_on(self.client.inner.workflows().list())
    }

    /// Get one workflow by id.
    pub fn get(&self, workflow_id: &str) -> ObotResult<Workflow> {
        self.client
            .block_on(self.client.inner.workflows().get(workflow_id))
    }

    /// Create a workflow.
    pub fn create(&self, spec: WorkflowCreate) -> ObotResult<Workflow> {
        self.client
            .block_on(self.client.inner.workflows().create(spec))
    }

    /// Delete a workflow.
    pub fn delete(&self, workflow_id: &str) -> ObotResult<()> {
        self.client
            .block_on(self.client.inner.workflows().delete(workflow_id))
    }
}

/// Blocking run operations.
#[derive(Debug)]
pub struct RunsApi<'a> {
    client: &'a ObotClient,
}

impl RunsApi<'_> {
    /// List runs.
    pub fn list(&self) -> ObotResult<Vec<Run>> {
        self.client.block_on(self.client.inner.runs().list())
    }
}
