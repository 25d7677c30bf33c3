//! Show command implementation (the details view).

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::model::MovieDetails;
use colored::Colorize;

/// Execute the show command.
///
/// # Errors
///
/// Returns `MovieNotFound` if no stored movie has this exact title.
pub fn execute(title: &str, settings: &Settings, json: bool) -> Result<()> {
    let coordinator = super::open_coordinator(settings)?;
    let movie = coordinator.load_one(title)?.ok_or_else(|| Error::MovieNotFound {
        title: title.to_string(),
    })?;

    if json {
        println!("{}", serde_json::to_string(&MovieDetails::from(&movie))?);
        return Ok(());
    }

    println!("{}", movie.title.bold());
    println!("  Rating:   {:.1}", movie.rating);
    println!("  Released: {}", movie.release_year);
    println!("  Genre:    {}", movie.genre.join(", "));
    println!("  Poster:   {}", movie.image_or_placeholder().describe().dimmed());

    Ok(())
}
