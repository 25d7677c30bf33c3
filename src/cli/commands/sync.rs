//! Sync command implementation.
//!
//! Fetches the remote catalog, replaces stored records that share a title,
//! and prints the stored collection. On failure nothing already stored is
//! removed.

use crate::config::Settings;
use crate::error::Result;
use crate::model::MovieDetails;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct SyncOutput<'a> {
    endpoint: &'a str,
    count: usize,
    with_images: usize,
    movies: Vec<MovieDetails>,
}

/// Execute the sync command.
///
/// # Errors
///
/// Returns the sync failure; its advisory is printed by the caller.
pub fn execute(settings: &Settings, json: bool) -> Result<()> {
    let coordinator = super::open_coordinator(settings)?;
    let rt = super::runtime()?;

    info!(endpoint = %settings.endpoint, db = %settings.db_path.display(), "Syncing catalog");

    let movies = match rt.block_on(coordinator.sync_all(&settings.endpoint)) {
        Ok(movies) => movies,
        Err(e) => {
            if let Ok(stored) = coordinator.load_local() {
                warn!(stored = stored.len(), "Sync failed; stored movies are unchanged");
            }
            return Err(e.into());
        }
    };

    let with_images = movies.iter().filter(|m| m.image.is_some()).count();

    if json {
        let output = SyncOutput {
            endpoint: &settings.endpoint,
            count: movies.len(),
            with_images,
            movies: movies.iter().map(MovieDetails::from).collect(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if movies.is_empty() {
        println!("Catalog is empty; no movies stored.");
    } else {
        println!(
            "Synced {} movies from {} ({with_images} with posters)",
            movies.len(),
            settings.endpoint
        );
        println!();
        super::print_movies(&movies);
    }

    Ok(())
}
