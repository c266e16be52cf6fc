//! # obot-rs — Rust SDK for the Obot agent-orchestration API
//!
//! Typed client for [Obot](https://obot.ai): list/create/update agents, chat
//! with them (optionally streaming), and manage threads, tools, models,
//! credentials, webhooks, and workflows.
//!
//! Two calling conventions with identical semantics:
//! - **Async** ([`ObotClient`]) — every operation suspends at the network
//!   boundary; the default.
//! - **Blocking** ([`blocking::ObotClient`], feature `blocking`, on by
//!   default) — a thin adapter that drives the async core on a private
//!   runtime.
//!
//! ## Quick Start
//!
//! ```no_run
//! use obot_rs::ClientBuilder;
//!
//! #[tokio::main]
//! async fn main() -> obot_rs::ObotResult<()> {
//!     let client = ClientBuilder::new("https://obot.example.com")
//!         .with_token(std::env::var("OBOT_TOKEN").unwrap_or_default())
//!         .build()?;
//!
//!     // List agents:
//!     for agent in client.agents().list().await? {
//!         println!("{} ({})", agent.name, agent.id.unwrap_or_default());
//!     }
//!
//!     // Start a conversation; the thread id is discovered from the
//!     // X-Obot-Thread-Id response header and every later turn continues it:
//!     let mut convo = client.chat("a1-helper", "Summarize open incidents").await?;
//!     println!("{}", convo.last_reply());
//!     convo.send("Only the critical ones, please").await?;
//!
//!     // Stream a reply chunk by chunk:
//!     let mut stream = client.chat_stream("a1-helper", "Write a haiku", None).await?;
//!     while let Some(chunk) = stream.next().await {
//!         print!("{}", chunk?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Feature flags
//!
//! | Feature    | Default | Description |
//! |------------|---------|-------------|
//! | `blocking` | yes     | Synchronous client adapter over the async core |
//!
//! ## Architecture
//!
//! - [`client::ObotClient`] — high-level client; per-resource facades plus
//!   the chat entry points
//! - [`client::Transport`] / [`client::HttpTransport`] — pluggable transport
//!   (header construction, JSON bodies, streaming POST)
//! - [`client::ApiResponse`] — raw status/headers/body of one exchange;
//!   headers are returned per-call, so thread-id discovery has no shared
//!   mutable state
//! - [`client::TextStream`] — pull stream of decoded text chunks for
//!   streaming replies; dropping it closes the connection
//! - [`Conversation`] — agent id + thread id + last reply, for multi-turn
//!   chat
//! - [`error::ObotError`] — the full error taxonomy (auth, agent-not-found,
//!   API/transport, protocol, validation, config)
//!
//! ## Errors
//!
//! Nothing is retried or swallowed: every failure surfaces to the caller as
//! an [`ObotError`]. The one deliberate degradation is the chat path —
//! a reply body that is not valid JSON is returned as raw trimmed text (with
//! a `tracing` debug diagnostic), because some deployments and test doubles
//! speak plain text.

pub mod builders;
pub mod client;
pub mod error;
pub mod types;

#[cfg(feature = "blocking")]
pub mod blocking;

/// Prelude module that re-exports the most frequently used types.
///
/// ```
/// use obot_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builders::ClientBuilder;
    pub use crate::client::{Conversation, ObotClient, TextStream, THREAD_ID_HEADER};
    pub use crate::error::{ObotError, ObotResult};
    pub use crate::types::{
        Agent, AgentCreate, AgentUpdate, Credential, CredentialCreate, Model, ModelProvider, Run,
        Thread, Tool, Webhook, WebhookCreate, Workflow, WorkflowCreate,
    };
}

// Re-export core types at crate root for convenience.
pub use builders::ClientBuilder;
pub use client::{Conversation, ObotClient, TextStream, THREAD_ID_HEADER};
pub use error::{ObotError, ObotResult};
pub use types::*;
