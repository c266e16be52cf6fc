//! Transport layer for Obot client communication.
//!
//! Provides the `Transport` trait for abstracting over the request-issuing
//! machinery, and `HttpTransport` for the standard reqwest-based binding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Url;

use crate::error::{ObotError, ObotResult};

use super::response::ApiResponse;
use super::response::status_error;
use super::stream::TextStream;

/// HTTP method for an [`EndpointCall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One endpoint invocation: method, path, query, body, extra headers.
///
/// Constructed fresh for every call and consumed by the transport. The path
/// is resolved against the client's base URL by ordinary URL-join rules: a
/// leading slash replaces the base path, otherwise the path is appended.
#[derive(Debug, Clone)]
pub struct EndpointCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// JSON body; sets `Content-Type: application/json`.
    pub json: Option<serde_json::Value>,
    /// Raw text body; callers set `Content-Type` via `headers`.
    pub text: Option<String>,
    /// Extra headers. Override the transport defaults on key collision.
    pub headers: Vec<(String, String)>,
}

impl EndpointCall {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            json: None,
            text: None,
            headers: Vec::new(),
        }
    }

    /// A GET call.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// A POST call.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// A PUT call.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// A DELETE call.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Attach a raw text body.
    pub fn with_text(mut self, body: impl Into<String>) -> Self {
        self.text = Some(body.into());
        self
    }

    /// Add an extra header (overrides defaults on collision).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// Transport abstraction for Obot communication.
///
/// Implementations issue one HTTP exchange per [`EndpointCall`] and hand back
/// the raw status/headers/body for classification. The streaming variant
/// validates the status line and returns the live chunk sequence.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request and read the full response.
    async fn execute(&self, call: EndpointCall) -> ObotResult<ApiResponse>;

    /// Issue a streaming request (POST only) and return the chunk stream.
    ///
    /// The status line is validated before any chunk is yielded; a non-2xx
    /// status is classified exactly like a non-streaming failure.
    async fn execute_stream(&self, call: EndpointCall) -> ObotResult<TextStream>;

    /// Close the transport and release any held resources.
    ///
    /// The default implementation is a no-op; connection pools are released
    /// on drop. Override if your transport holds resources that need
    /// explicit cleanup.
    async fn close(&self) -> ObotResult<()> {
        Ok(())
    }
}

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Bearer token attached as `Authorization: Bearer <token>`.
    pub token: Option<String>,
    /// Single timeout bounding connect+read of every call. `None` = no timeout.
    pub timeout: Option<Duration>,
}

/// HTTP transport over `reqwest`.
///
/// Every request carries `Accept: application/json` and, when a token is
/// configured, `Authorization: Bearer <token>`. Caller-supplied headers
/// override those defaults on key collision.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the given base URL with default configuration
    /// (no token, no timeout).
    pub fn new(base_url: impl AsRef<str>) -> ObotResult<Self> {
        Self::with_config(base_url, TransportConfig::default())
    }

    /// Create a transport with custom configuration.
    pub fn with_config(base_url: impl AsRef<str>, config: TransportConfig) -> ObotResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ObotError::config(format!("failed to build HTTP client: {e}")))?;

        Self::with_client(base_url, client, config.token)
    }

    /// Create a transport with an existing `reqwest::Client`.
    ///
    /// Useful when you want to share a connection pool or configure TLS
    /// settings externally.
    pub fn with_client(
        base_url: impl AsRef<str>,
        client: reqwest::Client,
        token: Option<String>,
    ) -> ObotResult<Self> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// The normalized base URL this transport resolves paths against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> ObotResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ObotError::config(format!("invalid request path {path:?}: {e}")))
    }

    fn build(&self, call: &EndpointCall) -> ObotResult<reqwest::RequestBuilder> {
        let url = self.resolve(&call.path)?;
        tracing::debug!(method = ?call.method, %url, "issuing request");

        let mut request = self.client.request(call.method.into(), url);
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(json) = &call.json {
            request = request.json(json);
        }
        if let Some(text) = &call.text {
            request = request.body(text.clone());
        }
        request = request.headers(request_headers(self.token.as_deref(), &call.headers)?);
        Ok(request)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, call: EndpointCall) -> ObotResult<ApiResponse> {
        let response = self.build(&call)?.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    async fn execute_stream(&self, call: EndpointCall) -> ObotResult<TextStream> {
        if call.method != Method::Post {
            return Err(ObotError::config("streaming requests must use POST"));
        }

        let path = call.path.clone();
        let response = self.build(&call)?.send().await?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body, &path));
        }

        Ok(TextStream::new(response))
    }
}

/// Build the header map for one call: `Accept: application/json` always,
/// `Authorization: Bearer <token>` when configured, caller headers last so
/// they override the defaults on key collision.
fn request_headers(token: Option<&str>, extra: &[(String, String)]) -> ObotResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ObotError::config(format!("bearer token is not a valid header: {e}")))?;
        headers.insert(AUTHORIZATION, value);
    }

    for (key, value) in extra {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ObotError::config(format!("invalid header name {key:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ObotError::config(format!("invalid header value for {key:?}: {e}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Normalize a base URL to end in exactly one trailing slash so joined
/// paths append instead of replacing the last segment.
fn normalize_base_url(raw: &str) -> ObotResult<Url> {
    let trimmed = raw.trim_end_matches('/');
    Url::parse(&format!("{trimmed}/"))
        .map_err(|e| ObotError::config(format!("invalid base URL {raw:?}: {e}")))
}
