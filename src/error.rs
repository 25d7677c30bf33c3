//! Error types for reelsync.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=store, 3=not_found, 4=validation, etc.)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

use crate::storage::StoreError;
use crate::sync::SyncError;

/// Result type alias for reelsync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Store (exit 2)
    StoreUnavailable,
    StoreBusy,

    // Not Found (exit 3)
    MovieNotFound,

    // Validation (exit 4)
    InvalidArgument,
    InvalidLocator,

    // Sync (exit 6)
    FetchFailed,
    DecodeFailed,
    SyncBusy,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::StoreBusy => "STORE_BUSY",
            Self::MovieNotFound => "MOVIE_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InvalidLocator => "INVALID_LOCATOR",
            Self::FetchFailed => "FETCH_FAILED",
            Self::DecodeFailed => "DECODE_FAILED",
            Self::SyncBusy => "SYNC_BUSY",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::StoreUnavailable | Self::StoreBusy => 2,
            Self::MovieNotFound => 3,
            Self::InvalidArgument | Self::InvalidLocator => 4,
            Self::FetchFailed | Self::DecodeFailed | Self::SyncBusy => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether running the same command again may succeed.
    ///
    /// True for network-side failures, a busy coordinator and a database
    /// locked by another process. A corrupt or unwritable store is not
    /// retryable. Nothing is retried automatically; this only informs the
    /// caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::SyncBusy | Self::StoreBusy)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in reelsync operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Movie not found: {title}")]
    MovieNotFound { title: String },

    /// The store could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::MovieNotFound { .. } => ErrorCode::MovieNotFound,
            Self::Store(e)
            | Self::Sync(SyncError::StoreFailed(e) | SyncError::ReadFailed(e)) => {
                if e.is_busy() {
                    ErrorCode::StoreBusy
                } else {
                    ErrorCode::StoreUnavailable
                }
            }
            Self::Sync(SyncError::FetchFailed { .. }) => ErrorCode::FetchFailed,
            Self::Sync(SyncError::DecodeFailed { .. }) => ErrorCode::DecodeFailed,
            Self::Sync(SyncError::Busy) => ErrorCode::SyncBusy,
            Self::Sync(SyncError::InvalidLocator { .. }) => ErrorCode::InvalidLocator,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Generic message for end users, if this error has one.
    #[must_use]
    pub const fn advisory(&self) -> Option<&'static str> {
        match self {
            Self::Sync(e) => Some(e.advisory()),
            Self::Store(_) => Some(crate::sync::LOAD_ADVISORY),
            _ => None,
        }
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MovieNotFound { title } => Some(format!(
                "No stored movie titled '{title}'. Use `reelsync list` to see stored movies."
            )),

            Self::Sync(SyncError::FetchFailed { .. } | SyncError::DecodeFailed { .. }) => Some(
                "Check the endpoint and your connection, then run `reelsync sync` again.\n  \
                 Movies already stored are still available: reelsync list"
                    .to_string(),
            ),

            Self::Sync(SyncError::Busy) => {
                Some("Wait for the running sync to finish, then retry.".to_string())
            }

            Self::Sync(SyncError::InvalidLocator { .. }) => Some(
                "Scan a QR code that encodes an http(s) URL to a single movie JSON document."
                    .to_string(),
            ),

            Self::Store(StoreError::Busy(_))
            | Self::Sync(
                SyncError::StoreFailed(StoreError::Busy(_)) | SyncError::ReadFailed(StoreError::Busy(_)),
            ) => Some("Another process holds the database; retry when it finishes.".to_string()),

            Self::Store(_) | Self::Sync(SyncError::StoreFailed(_) | SyncError::ReadFailed(_)) => {
                Some(
                    "Check that the database path points to a writable reelsync database \
                     (--db or REELSYNC_DB)."
                        .to_string(),
                )
            }

            Self::Config(_) => Some(
                "Fix or remove ~/.reelsync/config.json; environment variables override it."
                    .to_string(),
            ),

            Self::Io(_) | Self::Json(_) | Self::InvalidArgument(_) | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }
        if let Some(advisory) = self.advisory() {
            obj["error"]["advisory"] = serde_json::Value::String(advisory.to_string());
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeError;
    use crate::fetch::FetchError;

    #[test]
    fn test_sync_errors_map_to_codes() {
        let err = Error::from(SyncError::FetchFailed {
            url: "https://movies.test/movies.json".into(),
            source: FetchError::Status(500),
        });
        assert_eq!(err.error_code(), ErrorCode::FetchFailed);
        assert_eq!(err.exit_code(), 6);
        assert!(err.error_code().is_retryable());

        let err = Error::from(SyncError::StoreFailed(StoreError::Unavailable("x".into())));
        assert_eq!(err.error_code(), ErrorCode::StoreUnavailable);
        assert_eq!(err.exit_code(), 2);

        let err = Error::from(SyncError::InvalidLocator { payload: "x".into() });
        assert_eq!(err.exit_code(), 4);
        assert!(!err.error_code().is_retryable());
    }

    #[test]
    fn test_structured_json() {
        let err = Error::from(SyncError::DecodeFailed {
            url: "https://movies.test/movies.json".into(),
            source: DecodeError::InvalidCollection {
                reason: "expected an array, found an object".into(),
            },
        });
        let json = err.to_structured_json();

        assert_eq!(json["error"]["code"], "DECODE_FAILED");
        assert_eq!(json["error"]["exit_code"], 6);
        assert_eq!(json["error"]["retryable"], false);
        assert_eq!(
            json["error"]["advisory"],
            "Failed to load the movies. Please try again."
        );
        assert!(json["error"]["hint"].as_str().unwrap().contains("reelsync list"));
    }

    #[test]
    fn test_store_open_failure_is_a_load_failure() {
        let err = Error::from(StoreError::Unavailable("file is not a database".into()));
        let json = err.to_structured_json();

        assert_eq!(json["error"]["code"], "STORE_UNAVAILABLE");
        assert_eq!(json["error"]["retryable"], false);
        assert_eq!(json["error"]["exit_code"], 2);
        assert_eq!(json["error"]["advisory"], crate::sync::LOAD_ADVISORY);

        let err = Error::from(SyncError::ReadFailed(StoreError::Unavailable("x".into())));
        assert_eq!(err.advisory(), Some(crate::sync::LOAD_ADVISORY));

        let err = Error::from(SyncError::StoreFailed(StoreError::Unavailable("x".into())));
        assert_eq!(err.advisory(), Some(crate::sync::SAVE_ADVISORY));
    }

    #[test]
    fn test_locked_store_is_retryable() {
        let err = Error::from(SyncError::StoreFailed(StoreError::Busy("database is locked".into())));

        assert_eq!(err.error_code(), ErrorCode::StoreBusy);
        assert_eq!(err.exit_code(), 2);
        assert!(err.error_code().is_retryable());
        assert!(err.hint().unwrap().contains("retry"));
    }

    #[test]
    fn test_not_found_hint() {
        let err = Error::MovieNotFound { title: "Heat".into() };
        assert_eq!(err.exit_code(), 3);
        assert!(err.hint().unwrap().contains("'Heat'"));
        assert!(err.advisory().is_none());
    }
}
