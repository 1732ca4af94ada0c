//! `brokkr run` - drive the packaging pipeline against a service descriptor

use crate::cli::RunArgs;
use crate::output;
use crate::service::ServiceDescriptor;
use anyhow::Result;
use brokkr_core::Error;
use brokkr_plugin::{Pipeline, ProbeLocations, ProbeOptions};

pub async fn run(args: RunArgs) -> Result<()> {
    let descriptor = ServiceDescriptor::load(&args.service_file)?;
    let mut pipeline =
        Pipeline::with_overrides(descriptor.brokkr.clone().unwrap_or_default())?;

    if !pipeline.is_enabled() {
        output::warning(&format!(
            "platform {} is not supported, nothing to do",
            brokkr_core::platform::current()
        ));
        return Ok(());
    }

    let provider = descriptor.provider.clone().ok_or(Error::NoProviderBlock)?;
    let locations = ProbeLocations {
        service_dir: args
            .service_file
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .map(|dir| dir.to_path_buf()),
        package_path: descriptor.package.as_ref().and_then(|p| p.path.clone()),
        service_name: descriptor.service.clone(),
    };
    let options = ProbeOptions {
        region: args.region.clone(),
    };

    pipeline
        .resolve_provider(&provider, &options, &locations)
        .await?;
    pipeline.preflight()?;

    if args.dry_run {
        output::success("preflight checks passed (dry run)");
        return Ok(());
    }

    let mut functions = descriptor.functions.clone();
    let summary = pipeline.process_functions(&mut functions)?;
    for name in &summary.added {
        output::info(&format!("{name}: extension added"));
    }
    for name in &summary.skipped {
        output::info(&format!("{name}: extension already present, skipped"));
    }
    pipeline.validate_packaging()?;

    output::success(&format!(
        "pipeline complete: {} function(s) updated, {} skipped",
        summary.added.len(),
        summary.skipped.len()
    ));
    Ok(())
}
