//! SQLite storage implementation.
//!
//! The local store owns every movie row for the lifetime of the database
//! file. Writes go through single-statement upserts keyed by title, so
//! concurrent writers on one title resolve to whichever commits last.

use crate::codec::{from_row, to_row};
use crate::model::{Movie, MovieRow};
use crate::storage::schema::apply_schema;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Storage faults.
///
/// Lock contention from another connection is `Busy`; every other failure
/// collapses to `Unavailable`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Local store is locked by another process: {0}")]
    Busy(String),

    #[error("Local store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// True if the same operation may succeed once the lock is released.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => Self::Busy(e.to_string()),
            _ => Self::Unavailable(e.to_string()),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Unavailable(e.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

const UPSERT_SQL: &str = "INSERT INTO movies (title, rating, releaseYear, genre, image)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(title) DO UPDATE SET
        rating = excluded.rating,
        releaseYear = excluded.releaseYear,
        genre = excluded.genre,
        image = excluded.image";

/// How long a write waits on another connection's lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "SELECT title, rating, releaseYear, genre, image FROM movies";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates parent directories and applies the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.busy_timeout(BUSY_TIMEOUT)?;

        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened movie store");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Insert a movie, or replace rating, release year, genre and image of
    /// the row with the same title.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn upsert(&mut self, movie: &Movie) -> StoreResult<()> {
        let row = to_row(movie);
        self.conn.execute(
            UPSERT_SQL,
            rusqlite::params![row.title, row.rating, row.release_year, row.genre, row.image],
        )?;
        debug!(title = %movie.title, "Upserted movie");
        Ok(())
    }

    /// Upsert several movies in one transaction.
    ///
    /// Later entries win over earlier ones with the same title.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; nothing is written in that case.
    pub fn upsert_many(&mut self, movies: &[Movie]) -> StoreResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        {
            let mut stmt = tx.prepare_cached(UPSERT_SQL)?;
            for movie in movies {
                let row = to_row(movie);
                stmt.execute(rusqlite::params![
                    row.title,
                    row.rating,
                    row.release_year,
                    row.genre,
                    row.image
                ])?;
            }
        }

        tx.commit()?;
        debug!(count = movies.len(), "Upserted movies");
        Ok(movies.len())
    }

    /// Read every movie, newest release first.
    ///
    /// Ties keep storage (insertion) order. An empty table yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn read_all(&self) -> StoreResult<Vec<Movie>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY releaseYear DESC, rowid ASC"))?;

        let movies = stmt
            .query_map([], map_row)?
            .map(|row| row.map(from_row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    /// Get a movie by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, title: &str) -> StoreResult<Option<Movie>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE title = ?1"))?;

        let row = stmt.query_row([title], map_row).optional()?;
        Ok(row.map(from_row))
    }

    /// Number of stored movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Remove every movie. Maintenance only.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_all(&mut self) -> StoreResult<usize> {
        let removed = self.conn.execute("DELETE FROM movies", [])?;
        debug!(removed, "Deleted all movies");
        Ok(removed)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<MovieRow> {
    Ok(MovieRow {
        title: row.get(0)?,
        rating: row.get(1)?,
        release_year: row.get(2)?,
        genre: row.get(3)?,
        image: row.get(4)?,
    })
}
