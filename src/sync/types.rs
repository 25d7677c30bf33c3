//! Sync types: errors, phases, persistence modes and outcomes.

use std::fmt;

use thiserror::Error;

use crate::codec::DecodeError;
use crate::fetch::FetchError;
use crate::model::Movie;
use crate::storage::StoreError;

/// Terminal failure of one sync operation.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to decode {url}: {source}")]
    DecodeFailed {
        url: String,
        #[source]
        source: DecodeError,
    },

    /// A write to the local store failed.
    #[error(transparent)]
    StoreFailed(#[from] StoreError),

    /// Reading the local store back failed.
    #[error("Failed to read stored movies: {0}")]
    ReadFailed(#[source] StoreError),

    #[error("Another sync is already running")]
    Busy,

    #[error("Not a movie URL: {payload:?}")]
    InvalidLocator { payload: String },
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Shown to the user when movies cannot be loaded, remotely or from the store.
pub const LOAD_ADVISORY: &str = "Failed to load the movies. Please try again.";

/// Shown to the user when the local store rejects a write.
pub const SAVE_ADVISORY: &str = "Failed to save the movie data on the device.";

impl SyncError {
    /// Generic user-facing message for this failure.
    #[must_use]
    pub const fn advisory(&self) -> &'static str {
        match self {
            Self::FetchFailed { .. } | Self::DecodeFailed { .. } | Self::ReadFailed(_) => {
                LOAD_ADVISORY
            }
            Self::StoreFailed(_) => SAVE_ADVISORY,
            Self::Busy => "A sync is already in progress.",
            Self::InvalidLocator { .. } => "The scanned code does not point to a movie.",
        }
    }
}

/// Where a sync operation currently is.
///
/// Single-record operations reuse the collection phases for their one
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    FetchingCollection,
    DecodingCollection,
    FetchingImages,
    Persisting,
    ReadingBack,
    Done,
    Failed,
}

impl SyncPhase {
    /// Get the string representation for logs and JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FetchingCollection => "fetching_collection",
            Self::DecodingCollection => "decoding_collection",
            Self::FetchingImages => "fetching_images",
            Self::Persisting => "persisting",
            Self::ReadingBack => "reading_back",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// True for `Done` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which fetched records a collection sync writes to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistMode {
    /// Bulk load: every record
    #[default]
    All,
    /// Add flow: only the first record of the document
    FirstOnly,
}

/// Result of adding one movie from a scanned locator.
#[derive(Debug, Clone)]
pub struct AddOutcome {
    /// The movie as fetched, with its image if one could be loaded
    pub added: Movie,
    /// The whole stored collection after the add, newest release first
    pub movies: Vec<Movie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_strings() {
        assert_eq!(SyncPhase::default(), SyncPhase::Idle);
        assert_eq!(SyncPhase::FetchingImages.to_string(), "fetching_images");
        assert!(SyncPhase::Failed.is_terminal());
        assert!(!SyncPhase::Persisting.is_terminal());
    }

    #[test]
    fn test_error_messages() {
        let err = SyncError::FetchFailed {
            url: "https://example.com/movies.json".into(),
            source: FetchError::Status(500),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch https://example.com/movies.json: HTTP status 500"
        );

        let err = SyncError::InvalidLocator { payload: "hello".into() };
        assert_eq!(err.to_string(), "Not a movie URL: \"hello\"");
    }

    #[test]
    fn test_advisories() {
        let fetch = SyncError::FetchFailed {
            url: String::new(),
            source: FetchError::Network("timeout".into()),
        };
        let decode = SyncError::DecodeFailed {
            url: String::new(),
            source: DecodeError::MissingOrInvalidField { field: "title" },
        };
        let write = SyncError::StoreFailed(StoreError::Unavailable("disk full".into()));
        let read = SyncError::ReadFailed(StoreError::Unavailable("file is not a database".into()));

        assert_eq!(fetch.advisory(), LOAD_ADVISORY);
        assert_eq!(decode.advisory(), LOAD_ADVISORY);
        assert_eq!(write.advisory(), SAVE_ADVISORY);
        assert_eq!(read.advisory(), LOAD_ADVISORY);
    }
}
