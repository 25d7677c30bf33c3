//! Config command implementations.

use crate::cli::ConfigCommands;
use crate::config::{self, ReelsyncConfig, Settings};
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ConfigShowOutput<'a> {
    config_path: String,
    saved: &'a ReelsyncConfig,
    effective: &'a Settings,
}

/// Execute config commands.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
pub fn execute(
    command: &ConfigCommands,
    db_path: Option<&Path>,
    endpoint: Option<&str>,
    json: bool,
) -> Result<()> {
    match command {
        ConfigCommands::Show => show(db_path, endpoint, json),
        ConfigCommands::Set {
            endpoint,
            db_path,
            user_agent,
        } => set(
            ReelsyncConfig {
                endpoint: endpoint.clone(),
                db_path: db_path.clone(),
                user_agent: user_agent.clone(),
            },
            json,
        ),
        ConfigCommands::Reset => reset(json),
    }
}

fn show(db_path: Option<&Path>, endpoint: Option<&str>, json: bool) -> Result<()> {
    let path = config::config_path()?;
    let saved = config::load_config_from(&path)?;
    let effective = Settings::resolve(db_path, endpoint)?;

    if json {
        let output = ConfigShowOutput {
            config_path: path.display().to_string(),
            saved: &saved,
            effective: &effective,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Config file: {}", path.display());
    println!();
    println!("  Database:   {}", effective.db_path.display());
    println!("  Endpoint:   {}", effective.endpoint);
    println!("  User agent: {}", effective.user_agent);
    Ok(())
}

fn set(update: ReelsyncConfig, json: bool) -> Result<()> {
    if update == ReelsyncConfig::default() {
        return Err(Error::InvalidArgument(
            "nothing to set; pass --collection-endpoint, --db-path or --user-agent".to_string(),
        ));
    }

    let saved = config::update_config(update)?;

    if json {
        println!("{}", serde_json::to_string(&saved)?);
    } else {
        println!("Saved {}", config::config_path()?.display());
    }
    Ok(())
}

fn reset(json: bool) -> Result<()> {
    let removed = config::reset_config()?;

    if json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else if removed {
        println!("Config file removed.");
    } else {
        println!("No config file to remove.");
    }
    Ok(())
}
