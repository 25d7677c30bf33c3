//! In-memory fetcher with canned responses.
//!
//! Unknown URLs fail with a network error, the same way an unreachable host
//! would.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{FetchError, Fetcher};

/// Response served for a URL.
#[derive(Debug, Clone)]
pub enum CannedResponse {
    Body(Vec<u8>),
    Status(u16),
    Network(String),
}

/// Fetcher that serves responses from a map.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, CannedResponse>,
    requests: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    #[must_use]
    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .insert(url.to_string(), CannedResponse::Body(body.into()));
        self
    }

    /// Answer `url` with a non-success HTTP status.
    #[must_use]
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), CannedResponse::Status(status));
        self
    }

    /// Fail `url` as if the connection could not be made.
    #[must_use]
    pub fn with_network_error(mut self, url: &str, reason: &str) -> Self {
        self.responses
            .insert(url.to_string(), CannedResponse::Network(reason.to_string()));
        self
    }

    /// Total number of fetches attempted.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// URLs requested so far, in completion order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        match self.responses.get(url) {
            Some(CannedResponse::Body(body)) => Ok(body.clone()),
            Some(CannedResponse::Status(status)) => Err(FetchError::Status(*status)),
            Some(CannedResponse::Network(reason)) => Err(FetchError::Network(reason.clone())),
            None => Err(FetchError::Network(format!("no route to {url}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_responses() {
        let fetcher = MemoryFetcher::new()
            .with_body("https://example.com/a", b"hello".to_vec())
            .with_status("https://example.com/b", 500)
            .with_network_error("https://example.com/d", "dns failure");

        assert_eq!(fetcher.fetch("https://example.com/a").await.unwrap(), b"hello");
        assert_eq!(
            fetcher.fetch("https://example.com/b").await.unwrap_err(),
            FetchError::Status(500)
        );
        assert!(matches!(
            fetcher.fetch("https://example.com/c").await,
            Err(FetchError::Network(_))
        ));

        assert_eq!(
            fetcher.fetch("https://example.com/d").await.unwrap_err(),
            FetchError::Network("dns failure".into())
        );

        assert_eq!(fetcher.request_count(), 4);
        assert_eq!(fetcher.requested_urls()[1], "https://example.com/b");
    }
}
