//! reelsync CLI entry point.

use clap::Parser;
use colored::Colorize;
use reelsync::cli::commands;
use reelsync::cli::{Cli, Commands, OutputFormat};
use reelsync::config::Settings;
use reelsync::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.format == OutputFormat::Csv {
        reelsync::CSV_OUTPUT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR --format json OR non-TTY stdout
    let json = cli.json
        || cli.format == OutputFormat::Json
        || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                report(&e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Print an error for a human: advisory first, then cause and hint.
fn report(e: &Error) {
    match e.advisory() {
        Some(advisory) => {
            eprintln!("{} {advisory}", "Error:".red().bold());
            eprintln!("  Cause: {e}");
        }
        None => eprintln!("{} {e}", "Error:".red().bold()),
    }
    if let Some(hint) = e.hint() {
        eprintln!("  Hint: {hint}");
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info,hyper=info,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let settings = || Settings::resolve(cli.db.as_deref(), cli.endpoint.as_deref());

    match &cli.command {
        Commands::Sync => commands::sync::execute(&settings()?, json),
        Commands::Add { payload } => commands::add::execute(payload, &settings()?, json),
        Commands::List => commands::list::execute(&settings()?, json),
        Commands::Show { title } => commands::show::execute(title, &settings()?, json),
        Commands::Reset { yes } => commands::reset::execute(*yes, &settings()?, json),
        Commands::Config { command } => {
            commands::config::execute(command, cli.db.as_deref(), cli.endpoint.as_deref(), json)
        }
        Commands::Version => commands::version::execute(json),
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
