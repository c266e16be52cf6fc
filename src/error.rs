//! Obot error types — one enum covering the full client-side taxonomy.
//!
//! - `Auth` — the service rejected the credentials (401) or the operation (403)
//! - `AgentNotFound` — an invoke call named an agent the service doesn't know
//! - `Api` — any other non-2xx response, or a transport-level failure
//!   (connect/timeout/DNS) reported with the sentinel status `0`
//! - `Protocol` — the exchange succeeded but violated the conversation
//!   protocol (e.g. no thread id discoverable after a chat)
//! - `Validation` — a request named unknown models or tools; raised before
//!   any create/update request is issued
//! - `Config` — the client could not be constructed from the given settings

/// Sentinel status code for failures that happen before any HTTP response
/// is received (connection refused, timeout, DNS).
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Unified error type for all Obot client operations.
///
/// Each variant carries enough structured detail (status code, raw body,
/// offending identifiers) to build an actionable message without re-parsing
/// the display text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ObotError {
    /// Authentication or authorization failure (HTTP 401 / 403).
    #[error("Auth error: {message}")]
    Auth {
        /// "authentication failed" for 401, "permission denied" for 403.
        message: String,
    },

    /// An invoke call targeted an agent id the service doesn't know (HTTP 404
    /// on an invoke path).
    #[error("Agent not found: {agent_id}")]
    AgentNotFound {
        /// The agent id parsed from the trailing path segment.
        agent_id: String,
    },

    /// The service returned a non-2xx response that maps to no more specific
    /// variant, or the request failed before any response arrived
    /// (`status == 0`).
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status code; [`TRANSPORT_FAILURE_STATUS`] for network-level
        /// failures.
        status: u16,
        /// Raw response body text (or the transport error message).
        body: String,
        /// The decoded error body, when it parsed as JSON.
        data: Option<serde_json::Value>,
    },

    /// The exchange succeeded at the HTTP level but violated the conversation
    /// protocol — e.g. no thread id was supplied or discoverable after a chat
    /// call, or a response body had an unexpected shape.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A create/update request referenced unknown model or tool identifiers.
    /// Raised before the request is issued.
    #[error("Validation failed: {message}")]
    Validation {
        /// Human-readable summary.
        message: String,
        /// Exactly the entries that failed validation.
        invalid: Vec<String>,
        /// The identifiers the service actually offers.
        available: Vec<String>,
    },

    /// The client could not be constructed (bad base URL, HTTP client setup
    /// failure, runtime setup failure).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience result type for Obot operations.
pub type ObotResult<T> = Result<T, ObotError>;

impl ObotError {
    /// Create an `Auth` error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an `AgentNotFound` error.
    pub fn agent_not_found(agent_id: impl Into<String>) -> Self {
        Self::AgentNotFound {
            agent_id: agent_id.into(),
        }
    }

    /// Create an `Api` error with no decoded body.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
            data: None,
        }
    }

    /// Create a `Protocol` error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a `Validation` error.
    pub fn validation(
        message: impl Into<String>,
        invalid: Vec<String>,
        available: Vec<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            invalid,
            available,
        }
    }

    /// Create a `Config` error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the HTTP status code for `Api` errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ObotError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error happened before any HTTP response was received.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            ObotError::Api {
                status: TRANSPORT_FAILURE_STATUS,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for ObotError {
    fn from(err: reqwest::Error) -> Self {
        let body = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            format!("request failed: {err}")
        };
        ObotError::Api {
            status: TRANSPORT_FAILURE_STATUS,
            body,
            data: None,
        }
    }
}

impl From<serde_json::Error> for ObotError {
    fn from(err: serde_json::Error) -> Self {
        ObotError::Protocol(format!("JSON encoding failed: {err}"))
    }
}
