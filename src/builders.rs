//! Builder for configuring and constructing Obot clients.

use std::sync::Arc;
use std::time::Duration;

use crate::client::{HttpTransport, ObotClient, TransportConfig};
use crate::error::ObotResult;

/// Builder for [`ObotClient`] with optional token and timeout.
///
/// The base URL is the deployment root; an `/api` suffix is appended when
/// not already present, so `https://obot.example.com` and
/// `https://obot.example.com/api` configure the same client.
///
/// # Example
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
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a builder for the given deployment base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: None,
        }
    }

    /// Attach a bearer token (`Authorization: Bearer <token>` on every call).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Bound every call (connect+read) by one timeout. The default is no
    /// timeout; on expiry the call fails like any other network-level
    /// failure (status 0).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the async client.
    pub fn build(self) -> ObotResult<ObotClient> {
        let base = ensure_api_base(&self.base_url);
        let transport = HttpTransport::with_config(
            base,
            TransportConfig {
                token: self.token,
                timeout: self.timeout,
            },
        )?;
        Ok(ObotClient::with_transport(Arc::new(transport)))
    }

    /// Build the blocking client (drives the async core on a private
    /// current-thread runtime).
    #[cfg(feature = "blocking")]
    pub fn build_blocking(self) -> ObotResult<crate::blocking::ObotClient> {
        crate::blocking::ObotClient::from_async(self.build()?)
    }
}

/// Append `/api` to the deployment root unless it's already there, and
/// normalize to one trailing slash.
fn ensure_api_base(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.ends_with("/api") {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/api/")
    }
}
