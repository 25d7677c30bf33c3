//! List command implementation.

use crate::config::Settings;
use crate::error::Result;
use crate::model::MovieDetails;
use serde::Serialize;

#[derive(Serialize)]
struct ListOutput {
    count: usize,
    movies: Vec<MovieDetails>,
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or read.
pub fn execute(settings: &Settings, json: bool) -> Result<()> {
    let movies = super::open_coordinator(settings)?.load_local()?;

    if crate::is_csv() {
        println!("title,rating,releaseYear,genre,hasImage");
        for m in &movies {
            println!(
                "{},{},{},{},{}",
                crate::csv_escape(&m.title),
                m.rating,
                m.release_year,
                crate::csv_escape(&m.genre.join(",")),
                m.image.is_some()
            );
        }
    } else if json {
        let output = ListOutput {
            count: movies.len(),
            movies: movies.iter().map(MovieDetails::from).collect(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if movies.is_empty() {
        println!("No movies stored. Run `reelsync sync` to load the catalog.");
    } else {
        println!("Movies ({} stored):", movies.len());
        println!();
        super::print_movies(&movies);
    }

    Ok(())
}
