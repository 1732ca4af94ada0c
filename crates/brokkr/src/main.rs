//! Brokkr CLI - drives the packaging pipeline as the host would
//!
//! This is the main entry point for the brokkr command-line interface.

mod cli;
mod commands;
mod output;
mod service;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    // Run command
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Config(args) => commands::config::run(args),
        Commands::Version(args) => commands::version::run(args),
    };

    // Surface build-blocking errors verbatim
    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
