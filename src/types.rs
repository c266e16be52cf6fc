//! Obot API types — plain records mirroring the service's JSON resources.
//!
//! Every record is an immutable value object: unknown or absent optional
//! fields default to `None`/empty, and there is no behavior beyond field
//! access. Wire names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// List envelope
// ============================================================================

/// Generic `{"items": [...]}` envelope used by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemList<T> {
    /// The wrapped items; an absent field deserializes to an empty list.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

// ============================================================================
// Agents
// ============================================================================

/// Links the service publishes for an agent (currently just the invoke URL).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentLinks {
    /// URL of the agent's invoke endpoint.
    pub invoke: String,
}

/// Icon set attached to an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentIcons {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_dark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed_dark: Option<String>,
}

/// A configured remote conversational entity (name, model, tools, prompt).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Agent name. The only field required at creation time.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// System prompt context.
    #[serde(default)]
    pub prompt: String,

    /// Model **id** (names are resolved to ids before create/update).
    #[serde(default)]
    pub model: String,

    /// Tool ids enabled for this agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,

    // -- Server-populated fields --
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<AgentLinks>,

    /// Record discriminator — always "agent".
    #[serde(rename = "type", default = "agent_record_type")]
    pub record_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<AgentIcons>,

    #[serde(default)]
    pub default: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default)]
    pub alias: String,

    #[serde(default)]
    pub knowledge_description: String,

    /// Ids of agents this agent may delegate to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents: Option<Vec<String>>,

    /// Ids of workflows this agent may trigger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_thread_tools: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_thread_tools: Option<Vec<String>>,

    #[serde(default)]
    pub max_thread_tools: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<HashMap<String, String>>,

    #[serde(default)]
    pub alias_assigned: bool,
}

fn agent_record_type() -> String {
    "agent".to_string()
}

/// Fields accepted when creating an agent.
///
/// `model` takes a model **name**; the client resolves it to the matching
/// model id against the active models before issuing the request. `tools`
/// takes tool ids, validated against the service's tool references.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCreate {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

impl AgentCreate {
    /// Start a creation payload with the required name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the system prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the model by **name** (resolved to a model id at create time).
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model = Some(model_name.into());
        self
    }

    /// Set the tool ids to enable.
    pub fn with_tools(mut self, tool_ids: Vec<String>) -> Self {
        self.tools = Some(tool_ids);
        self
    }
}

/// Partial update for an agent. Only the set fields are changed; the client
/// merges them into the agent's current state before the PUT.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Model **name**, resolved to a model id before the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

impl AgentUpdate {
    /// An update with no fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Change the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Change the system prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Change the model by **name**.
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model = Some(model_name.into());
        self
    }

    /// Replace the tool ids.
    pub fn with_tools(mut self, tool_ids: Vec<String>) -> Self {
        self.tools = Some(tool_ids);
        self
    }
}

// ============================================================================
// Tools
// ============================================================================

/// A tool reference. The service mixes tools and other reference kinds in
/// one collection; the client filters on `tool_type == "tool"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// "tool" for actual tools; other values (e.g. "modelProvider") are
    /// excluded from tool listings.
    #[serde(default)]
    pub tool_type: String,

    #[serde(default)]
    pub reference: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub builtin: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,

    /// Free-form metadata; `category` is the key tool listings filter on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Tool {
    /// The tool's category from its metadata, if any.
    pub fn category(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("category"))
            .map(String::as_str)
    }
}

// ============================================================================
// Models & providers
// ============================================================================

/// A model registered with the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub target_model: String,

    #[serde(default)]
    pub model_provider: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub usage: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(default)]
    pub alias_assigned: bool,
}

/// A model provider and its configuration state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProvider {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub configured: bool,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub tool_reference: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(default)]
    pub required_configuration_parameters: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_configuration_parameters: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_configuration_parameters: Option<Vec<String>>,
}

// ============================================================================
// Threads
// ============================================================================

/// The service-side conversation context, identified by an opaque id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One message within a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    /// "system", "user", "assistant", …
    pub role: String,
    pub content: String,
}

// ============================================================================
// Credentials
// ============================================================================

/// A stored credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub provider: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

/// Fields required to store a new credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialCreate {
    pub provider: String,
    pub secret_name: String,
    pub secret_value: String,
}

// ============================================================================
// Webhooks
// ============================================================================

/// A webhook registered for certain events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    pub event: String,
}

/// Fields required to register a webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookCreate {
    pub url: String,
    pub event: String,
}

// ============================================================================
// Workflows
// ============================================================================

/// An existing workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields required to create a workflow.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowCreate {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ============================================================================
// Runs
// ============================================================================

/// One execution of an agent or workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}
