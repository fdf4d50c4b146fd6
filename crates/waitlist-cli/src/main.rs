//! # waitlist CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use waitlist_cli::lookup::{run_lookup, LookupArgs};
use waitlist_cli::steps::run_steps;
use waitlist_cli::submit::{run_submit, SubmitArgs};
use waitlist_cli::{ApiClient, DEFAULT_API_URL};

/// OPTI-AVIS waitlist client.
#[derive(Parser, Debug)]
#[command(name = "waitlist", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the waitlist API.
    #[arg(long, env = "WAITLIST_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the signup form's steps, fields and options.
    Steps,

    /// Walk a JSON draft through the signup form and submit it.
    Submit(SubmitArgs),

    /// Look up a registration by its identifier.
    Lookup(LookupArgs),
}

async fn dispatch(cli: Cli) -> anyhow::Result<u8> {
    match cli.command {
        Commands::Steps => run_steps(),
        Commands::Submit(args) => run_submit(&args, &ApiClient::new(&cli.api_url)?).await,
        Commands::Lookup(args) => run_lookup(&args, &ApiClient::new(&cli.api_url)?).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
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

    tracing::debug!(api_url = %cli.api_url, "waitlist CLI starting");

    match dispatch(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
