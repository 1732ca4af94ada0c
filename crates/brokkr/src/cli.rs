//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Brokkr - telemetry extension injection for serverless packaging
#[derive(Parser, Debug)]
#[command(name = "brokkr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the packaging pipeline against a service descriptor
    Run(RunArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the service descriptor
    #[arg(short, long, default_value = "brokkr-service.yaml")]
    pub service_file: Utf8PathBuf,

    /// Deploy region, overriding the provider block
    #[arg(long)]
    pub region: Option<String>,

    /// Stop after the preflight checks
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Service descriptor supplying explicit overrides
    #[arg(short, long)]
    pub service_file: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
