//! `brokkr config show` - print the resolved configuration

use crate::cli::{ConfigCommands, ConfigShowArgs};
use crate::output;
use crate::service::ServiceDescriptor;
use anyhow::Result;
use brokkr_core::{Config, ConfigOverrides};

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show(args) => show(args),
    }
}

fn show(args: ConfigShowArgs) -> Result<()> {
    let explicit = match &args.service_file {
        Some(path) => ServiceDescriptor::load(path)?.brokkr.unwrap_or_default(),
        None => ConfigOverrides::default(),
    };
    let config = Config::resolve(ConfigOverrides::from_env()?, explicit);

    output::header("Resolved configuration");
    output::kv("memory-check", &config.memory_check.to_string());
    output::kv("memory-check-size", &format!("{}MB", config.memory_check_size));
    output::kv("mark-check", &config.mark_check.to_string());
    output::kv("mark-path", &config.mark_path);
    output::kv("layer-check", &config.layer_check.to_string());
    output::kv("arn-url-prefix", &config.arn_url_prefix);
    output::kv(
        "arn-version",
        config.arn_version.as_deref().unwrap_or("latest"),
    );
    output::kv("max-layers", &config.max_layers.to_string());
    output::kv("http-timeout-secs", &config.http_timeout_secs.to_string());
    Ok(())
}
