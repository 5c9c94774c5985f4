//! # regatta CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use regatta_cli::render::{run_render, RenderArgs};
use regatta_cli::rules::{run_rules, RulesArgs};
use regatta_cli::validate::{run_validate, ValidateArgs};
use regatta_cli::EXIT_UNREADABLE;

/// Regatta document tool.
///
/// Browse the racing rule catalog, validate document files, and render the
/// Notice of Race and Sailing Instructions as Markdown.
#[derive(Parser, Debug)]
#[command(name = "regatta", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List catalog rules in rulebook order.
    Rules(RulesArgs),

    /// Validate a document file.
    Validate(ValidateArgs),

    /// Render a document file as Markdown.
    Render(RenderArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so rendered Markdown on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Rules(args) => run_rules(&args, &mut stdout),
        Commands::Validate(args) => run_validate(&args, &mut stdout),
        Commands::Render(args) => run_render(&args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_UNREADABLE)
        }
    }
}
