//! docpub CLI - documentation publisher.
//!
//! Provides commands for:
//! - `publish`: Reconcile the documentation tree against the wiki
//! - `find`: Look up a single page by title
//! - `validate`: Verify a page's stored content hash against its live content

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FindArgs, PublishArgs, ValidateArgs};
use output::Output;

/// docpub - documentation publisher.
#[derive(Parser)]
#[command(name = "docpub", version, about)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover the documentation tree and publish it.
    Publish(PublishArgs),
    /// Look up a single page by title.
    Find(FindArgs),
    /// Validate a page's stored content hash against its live content.
    Validate(ValidateArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Publish(args) => args.execute(),
        Commands::Find(args) => args.execute(),
        Commands::Validate(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
