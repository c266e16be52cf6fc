//! Obot client — call the Obot agent-orchestration API.
//!
//! - [`ObotClient`] — high-level client with per-resource facades (agents,
//!   threads, tools, models, credentials, webhooks, workflows, runs) and the
//!   chat entry points
//! - [`Conversation`] — handle binding an agent id to a discovered thread
//!   id for multi-turn chat
//! - [`Transport`] / [`HttpTransport`] — pluggable transport layer
//! - [`TextStream`] — pull stream of text chunks for streaming replies
//!
//! # Quick Start
//!
//! ```no_run
//! use obot_rs::ClientBuilder;
//!
//! # async fn example() -> obot_rs::ObotResult<()> {
//! let client = ClientBuilder::new("https://obot.example.com")
//!     .with_token("sk-token")
//!     .build()?;
//!
//! // Start a conversation and keep talking in the same thread:
//! let mut convo = client.chat("a1-helper", "What's our deploy status?").await?;
//! println!("{}", convo.last_reply());
//! convo.send("And staging?").await?;
//!
//! // Stream a reply:
//! let mut stream = client.chat_stream("a1-helper", "Tell me a story", None).await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?);
//! }
//! # Ok(())
//! # }
//! ```

mod chat;
mod obot_client;
mod response;
mod stream;
mod transport;

pub use chat::{Conversation, THREAD_ID_HEADER};
pub use obot_client::{
    AgentsApi, CredentialsApi, ModelsApi, ObotClient, RunsApi, ThreadsApi, ToolsApi, WebhooksApi,
    WorkflowsApi,
};
pub use response::ApiResponse;
pub use stream::TextStream;
pub use transport::{EndpointCall, HttpTransport, Method, Transport, TransportConfig};
