//! Add command implementation (scanned QR payload).

use crate::config::Settings;
use crate::error::Result;
use crate::model::MovieDetails;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct AddOutput {
    added: MovieDetails,
    count: usize,
}

/// Execute the add command.
///
/// # Errors
///
/// Returns `InvalidLocator` for payloads that are not http(s) URLs, or the
/// fetch/decode/store failure of the add.
pub fn execute(payload: &str, settings: &Settings, json: bool) -> Result<()> {
    let coordinator = super::open_coordinator(settings)?;
    let rt = super::runtime()?;

    let outcome = rt.block_on(coordinator.add_single(payload))?;

    if json {
        let output = AddOutput {
            added: MovieDetails::from(&outcome.added),
            count: outcome.movies.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Added".green().bold(),
        outcome.added.title,
        outcome.added.release_year
    );
    println!();
    super::print_movies(&outcome.movies);

    Ok(())
}
