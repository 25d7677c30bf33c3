//! SQLite storage layer for reelsync.
//!
//! This module provides the local movie store using SQLite with:
//! - WAL mode for concurrent reads
//! - Single-statement upserts keyed by title
//! - Release-year ordered reads for display
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStorage, StoreError, StoreResult};
