//! # tcn CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tcn_cli::credential::{run_credential, CredentialCommand, LedgerOptions};
use tcn_cli::gen_args::{run_gen_args, GenArgsArgs};

/// Talent Credentials Network operator CLI.
///
/// Issues, verifies, updates, lists and deletes talent credentials held in a
/// ledger snapshot file.
#[derive(Parser, Debug)]
#[command(name = "tcn", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    ledger: LedgerOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Credential(CredentialCommand),

    /// Generate bulk academic creation arguments as JSON.
    GenArgs(GenArgsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Credential(command) => {
            run_credential(command, &cli.ledger, &mut std::io::stdout().lock())
        }
        Commands::GenArgs(args) => run_gen_args(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
