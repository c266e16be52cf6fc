//! Chat protocol — reply extraction and conversation continuation.
//!
//! A chat turn POSTs the raw message text to the agent's invoke endpoint.
//! The non-streaming reply arrives as an event-stream-shaped JSON document;
//! the continuing thread id arrives in the `X-Obot-Thread-Id` response
//! header. [`Conversation`] binds an agent id to a discovered thread id so
//! later turns land in the same service-side thread.

use std::fmt;

use crate::client::obot_client::ObotClient;
use crate::client::stream::TextStream;
use crate::error::ObotResult;

/// Request and response header carrying the conversation thread id.
/// Matched case-insensitively on responses.
pub const THREAD_ID_HEADER: &str = "X-Obot-Thread-Id";

/// Extract the reply text from a non-streaming invoke response body.
///
/// The body is an event envelope `{"items": [...]}`; the reply is the
/// concatenation, in array order, of the `content` of every item that
/// carries both a `content` and a `contentID` key (items without a
/// `contentID` are control events and are skipped), trimmed of surrounding
/// whitespace.
///
/// A body that is not valid JSON degrades to the raw trimmed text. That is
/// deliberate — plain-text servers and test doubles stay usable — and is
/// surfaced as a debug diagnostic rather than an error.
pub(crate) fn extract_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            let mut message = String::new();
            if let Some(items) = value.get("items").and_then(|v| v.as_array()) {
                for item in items {
                    if item.get("contentID").is_none() {
                        continue;
                    }
                    if let Some(content) = item.get("content").and_then(|v| v.as_str()) {
                        message.push_str(content);
                    }
                }
            }
            message.trim().to_string()
        }
        Err(err) => {
            tracing::debug!(%err, "chat response body is not JSON; using raw text as reply");
            body.trim().to_string()
        }
    }
}

/// A client-side handle on one agent conversation.
///
/// Binds an agent id to the thread id discovered when the conversation
/// started, so every subsequent [`send()`] continues the same service-side
/// thread. Constructed by [`ObotClient::chat()`]; its identity is exactly
/// the thread id on the remote service — nothing is persisted locally.
///
/// One `Conversation` belongs to one logical thread; to run several
/// conversations concurrently, start one `Conversation` per thread.
///
/// [`send()`]: Conversation::send
/// [`ObotClient::chat()`]: crate::ObotClient::chat
#[derive(Debug, Clone)]
pub struct Conversation {
    client: ObotClient,
    agent_id: String,
    thread_id: String,
    last_reply: String,
}

impl Conversation {
    pub(crate) fn new(
        client: ObotClient,
        agent_id: impl Into<String>,
        thread_id: impl Into<String>,
        last_reply: String,
    ) -> Self {
        Self {
            client,
            agent_id: agent_id.into(),
            thread_id: thread_id.into(),
            last_reply,
        }
    }

    /// The agent this conversation talks to.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// The service-side thread id this conversation continues.
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// The reply text from the most recent non-streaming turn.
    pub fn last_reply(&self) -> &str {
        &self.last_reply
    }

    /// Send the next message in this conversation and return the reply.
    ///
    /// Updates [`last_reply()`] in place.
    ///
    /// [`last_reply()`]: Conversation::last_reply
    pub async fn send(&mut self, message: &str) -> ObotResult<&str> {
        let reply = self
            .client
            .chat_once(&self.agent_id, message, Some(&self.thread_id))
            .await?;
        self.last_reply = reply;
        Ok(&self.last_reply)
    }

    /// Send the next message and stream the reply chunk by chunk.
    ///
    /// Does not touch [`last_reply()`]; the caller owns the streamed text.
    ///
    /// [`last_reply()`]: Conversation::last_reply
    pub async fn send_stream(&self, message: &str) -> ObotResult<TextStream> {
        self.client
            .chat_stream(&self.agent_id, message, Some(&self.thread_id))
            .await
    }
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.last_reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_concatenate_and_control_events_are_skipped() {
        let body = r#"{"items":[
            {"content":"Hel","contentID":"a"},
            {"content":"lo","contentID":"a"},
            {"type":"system"}
        ]}"#;
        assert_eq!(extract_message(body), "Hello");
    }

    #[test]
    fn content_without_content_id_is_skipped() {
        let body = r#"{"items":[
            {"content":"ignored"},
            {"content":"kept","contentID":"x"}
        ]}"#;
        assert_eq!(extract_message(body), "kept");
    }

    #[test]
    fn reply_is_trimmed() {
        let body = r#"{"items":[{"content":"  spaced out  ","contentID":"a"}]}"#;
        assert_eq!(extract_message(body), "spaced out");
    }

    #[test]
    fn non_json_body_degrades_to_raw_text() {
        assert_eq!(
            extract_message("  plain text reply  "),
            "plain text reply"
        );
    }

    #[test]
    fn json_without_items_yields_empty_reply() {
        assert_eq!(extract_message(r#"{"status":"ok"}"#), "");
    }

    #[test]
    fn non_string_content_is_skipped() {
        let body = r#"{"items":[{"content":42,"contentID":"a"},{"content":"ok","contentID":"b"}]}"#;
        assert_eq!(extract_message(body), "ok");
    }
}
