//! # chitty CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chitty_cli::identifier::{
    run_classify, run_gate, run_parse, ClassifyArgs, GateArgs, ParseArgs,
};
use chitty_cli::intake::{run_intake, IntakeArgs};
use chitty_cli::issuance::{run_mint, MintArgs};
use chitty_cli::scan::{run_scan, ScanArgs};

/// ChittySchema CLI
///
/// Validates ChittyIDs, applies the pipeline gate, and files evidence under
/// identifiers issued by the ChittyID service.
#[derive(Parser, Debug)]
#[command(name = "chitty", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a token as official, legacy_prohibited, or malformed.
    Classify(ClassifyArgs),

    /// Parse an official ChittyID into its segments.
    Parse(ParseArgs),

    /// Evaluate the pipeline gate for a token (or its absence).
    Gate(GateArgs),

    /// Request a new ChittyID from the issuance service.
    Mint(MintArgs),

    /// Mint a ChittyID for an evidence file and print its record.
    Intake(IntakeArgs),

    /// File every evidence document under a directory, recursively.
    Scan(ScanArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Classify(args) => run_classify(&args),
        Commands::Parse(args) => run_parse(&args),
        Commands::Gate(args) => run_gate(&args),
        Commands::Mint(args) => run_mint(&args),
        Commands::Intake(args) => run_intake(&args),
        Commands::Scan(args) => run_scan(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
