//! Skywalker CLI
//!
//! Command-line interface for the Skywalker concurrent directory walker.

use anyhow::Result;
use clap::Parser;
use skywalker::cli::{walk, Cli};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for walk output
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    walk::execute(&cli)
}
