//! Command implementations.

pub mod add;
pub mod completions;
pub mod config;
pub mod list;
pub mod reset;
pub mod show;
pub mod sync;
pub mod version;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::fetch::HttpFetcher;
use crate::model::{ImageSource, Movie};
use crate::storage::SqliteStorage;
use crate::sync::SyncCoordinator;
use colored::Colorize;

/// Open the store and wire it to an HTTP fetcher.
pub(crate) fn open_coordinator(settings: &Settings) -> Result<SyncCoordinator<HttpFetcher>> {
    let storage = SqliteStorage::open(&settings.db_path)?;
    Ok(SyncCoordinator::new(
        storage,
        HttpFetcher::with_user_agent(&settings.user_agent),
    ))
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}

/// Print movies as aligned rows, newest release first.
pub(crate) fn print_movies(movies: &[Movie]) {
    let width = movies
        .iter()
        .map(|m| m.title.chars().count())
        .max()
        .unwrap_or(0);

    for movie in movies {
        let poster = match movie.image_or_placeholder() {
            ImageSource::Bytes(_) => "●".green(),
            ImageSource::Placeholder(_) => "○".dimmed(),
        };
        println!(
            "{poster} {}  {}  {:>4.1}  {}",
            format!("{:<width$}", movie.title).bold(),
            movie.release_year,
            movie.rating,
            movie.genre.join(", ").dimmed(),
        );
    }
}
