//! Database schema definitions.
//!
//! The local store keeps one table keyed by movie title. The layout mirrors
//! the remote document field names so rows stay easy to inspect with the
//! `sqlite3` shell.

use rusqlite::{Connection, Result};

/// Current schema version, recorded in `schema_version`.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Name of the movie table.
pub const MOVIES_TABLE: &str = "movies";

/// The complete SQL schema for the reelsync database.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- Movies: one row per title, last write wins
CREATE TABLE IF NOT EXISTS movies (
    title TEXT PRIMARY KEY NOT NULL,
    rating REAL NOT NULL,
    releaseYear INTEGER NOT NULL,
    genre TEXT NOT NULL,
    image BLOB
);

CREATE INDEX IF NOT EXISTS idx_movies_release_year ON movies(releaseYear DESC);
";

/// Apply pragmas and the schema to a connection.
///
/// Safe to call on every open.
///
/// # Errors
///
/// Returns an error if a pragma or DDL statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // WAL is ignored for in-memory databases, which report "memory"
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            CURRENT_SCHEMA_VERSION,
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}
