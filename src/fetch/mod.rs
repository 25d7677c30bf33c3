//! Remote fetching.
//!
//! A [`Fetcher`] performs a single GET and hands back the body bytes. There
//! is no retry, caching or backoff: a failed request is reported once and the
//! caller decides what to do with it.
//!
//! # Implementations
//!
//! - [`HttpFetcher`] - reqwest-backed client used by the CLI
//! - [`MemoryFetcher`] - canned responses keyed by URL, for offline runs and tests

pub mod http;
pub mod memory;

use thiserror::Error;

pub use http::HttpFetcher;
pub use memory::{CannedResponse, MemoryFetcher};

/// Errors from a single fetch.
///
/// Callers treat both variants alike; the split only matters for logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),
}

/// Trait for anything that can GET a URL.
///
/// Async methods return `Send` futures so a coordinator built on a fetcher can
/// run inside `tokio::spawn`.
pub trait Fetcher: Send + Sync {
    /// Fetch the body at `url`.
    fn fetch(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, FetchError>> + Send;
}
