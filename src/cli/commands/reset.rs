//! Reset command implementation.

use crate::config::Settings;
use crate::error::{Error, Result};
use serde::Serialize;

#[derive(Serialize)]
struct ResetOutput {
    deleted: usize,
}

/// Execute the reset command.
///
/// # Errors
///
/// Returns `InvalidArgument` without `--yes`, or a store error.
pub fn execute(yes: bool, settings: &Settings, json: bool) -> Result<()> {
    if !yes {
        return Err(Error::InvalidArgument(
            "reset deletes every stored movie; pass --yes to confirm".to_string(),
        ));
    }

    let coordinator = super::open_coordinator(settings)?;
    let deleted = coordinator.reset()?;

    if json {
        println!("{}", serde_json::to_string(&ResetOutput { deleted })?);
    } else {
        println!("Deleted {deleted} movies.");
    }

    Ok(())
}
