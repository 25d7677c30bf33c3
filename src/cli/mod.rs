//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// reelsync - keep a local movie collection in sync with a remote catalog
#[derive(Parser, Debug)]
#[command(name = "reelsync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.reelsync/data/reelsync.db)
    #[arg(long, global = true, env = "REELSYNC_DB")]
    pub db: Option<PathBuf>,

    /// Collection endpoint URL
    #[arg(long, global = true, env = "REELSYNC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace the local collection with the remote catalog
    Sync,

    /// Add one movie from a scanned QR payload (a movie JSON URL)
    Add {
        /// Scanned payload; must be an http(s) URL
        payload: String,
    },

    /// List stored movies, newest release first
    List,

    /// Show the details of one stored movie
    Show {
        /// Movie title (exact match)
        title: String,
    },

    /// Delete every stored movie
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings and where they come from
    Show,

    /// Save settings to the config file
    Set {
        /// Collection endpoint URL
        #[arg(long = "collection-endpoint")]
        endpoint: Option<String>,

        /// Database path
        #[arg(long = "db-path")]
        db_path: Option<PathBuf>,

        /// HTTP user agent
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Remove the config file
    Reset,
}
