//! Response classification — status taxonomy plus body unwrapping.
//!
//! Every HTTP exchange ends up here: non-2xx statuses map to typed errors,
//! 2xx bodies are unwrapped into a generic JSON value (with the `data`
//! envelope removed when present), and empty or non-JSON bodies degrade to
//! `Null` so call sites can expand them into empty results.

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::{ObotError, ObotResult};

/// The raw outcome of one HTTP exchange: status, headers, body text.
///
/// Scoped to a single call. The headers are returned here — rather than
/// stored on the client — so conversation thread-id discovery reads them
/// per-call with no shared state and no interleaving hazard.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Full response header set.
    pub headers: HeaderMap,
    /// Response body text.
    pub body: String,
}

impl ApiResponse {
    /// Look up a header value as a string (name match is case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Map a non-2xx status to its typed error.
///
/// 401/403 become [`ObotError::Auth`]; a 404 on an invoke path becomes
/// [`ObotError::AgentNotFound`] carrying the trailing path segment; anything
/// else becomes [`ObotError::Api`] with the decoded error body when the body
/// parses as JSON.
pub(crate) fn status_error(status: u16, body: String, path: &str) -> ObotError {
    match status {
        401 => ObotError::auth("authentication failed"),
        403 => ObotError::auth("permission denied"),
        404 if is_invoke_path(path) => ObotError::agent_not_found(trailing_segment(path)),
        _ => {
            let data = serde_json::from_str(&body).ok();
            ObotError::Api { status, body, data }
        }
    }
}

/// Fail with the typed error for a non-2xx response; no-op on 2xx.
pub(crate) fn ensure_success(response: &ApiResponse, path: &str) -> ObotResult<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(status_error(
            response.status,
            response.body.clone(),
            path,
        ))
    }
}

/// Classify one response into a generic JSON value.
///
/// Decision table, in order:
/// 1. non-2xx → typed error (see [`status_error`])
/// 2. 2xx empty body → `Null` (call sites expand to empty list/mapping)
/// 3. 2xx JSON object with a `data` field → just the `data` value
/// 4. 2xx other JSON → the parsed value as-is
/// 5. 2xx non-JSON body → `Null`, raw text kept for diagnostics only
pub(crate) fn classify(response: ApiResponse, path: &str) -> ObotResult<Value> {
    ensure_success(&response, path)?;

    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(mut map)) => Ok(map.remove("data").unwrap_or(Value::Object(map))),
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::debug!(%err, body = %response.body, "response body is not JSON; treating as empty");
            Ok(Value::Null)
        }
    }
}

fn is_invoke_path(path: &str) -> bool {
    path.split('/').any(|segment| segment == "invoke")
}

fn trailing_segment(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}
