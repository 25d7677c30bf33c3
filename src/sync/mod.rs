//! Remote-collection sync.
//!
//! This module moves movies from a remote JSON endpoint into the local store:
//!
//! - **Bulk load**: collection document → every movie stored → read back
//! - **Add**: scanned URL → one movie document → stored → read back
//! - **Posters**: fetched concurrently per movie, best effort
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  CLI Commands    │
//! │ (sync/add/list)  │
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌─────────────────┐      ┌───────────┐
//! │ SyncCoordinator │ ───▶ │  Fetcher  │  HTTP GET, one attempt
//! └────────┬────────┘      └───────────┘
//!          │
//!     ┌────┴────┐
//!     ▼         ▼
//! ┌───────┐ ┌──────────────┐
//! │ codec │ │SqliteStorage │
//! └───────┘ └──────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use reelsync::fetch::HttpFetcher;
//! use reelsync::storage::SqliteStorage;
//! use reelsync::sync::SyncCoordinator;
//!
//! let store = SqliteStorage::open(&db_path)?;
//! let coordinator = SyncCoordinator::new(store, HttpFetcher::new());
//!
//! let movies = coordinator.sync_all("https://api.androidhive.info/json/movies.json").await?;
//! let outcome = coordinator.add_single(&scanned_payload).await?;
//! ```

mod coordinator;
mod types;

pub use coordinator::{POSTER_CONCURRENCY, SyncCoordinator};
pub use types::{
    AddOutcome, LOAD_ADVISORY, PersistMode, SAVE_ADVISORY, SyncError, SyncPhase, SyncResult,
};
