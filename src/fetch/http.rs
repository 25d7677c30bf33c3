//! HTTP fetcher backed by reqwest.

use super::{FetchError, Fetcher};
use tracing::{debug, trace, warn};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("reelsync/", env!("CARGO_PKG_VERSION"));

/// Single-attempt HTTP GET client.
///
/// Uses reqwest's default redirect policy and timeouts.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default user agent.
    pub fn new() -> Self {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a fetcher that identifies itself with `user_agent`.
    ///
    /// An unusable user agent (e.g. one containing a newline) is logged and
    /// replaced by [`DEFAULT_USER_AGENT`].
    pub fn with_user_agent(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|e| {
                warn!(user_agent, error = %e, "Ignoring invalid user agent");
                reqwest::Client::builder()
                    .user_agent(DEFAULT_USER_AGENT)
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new())
            });

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        trace!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "Request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to read response body: {e}")))?;

        debug!(url, bytes = body.len(), "Fetched");
        Ok(body.to_vec())
    }
}
