//! Provider/resource probing
//!
//! Consolidates everything later stages need into one [`ProviderState`]
//! snapshot: the build archive location, the effective region, the fetched
//! extension identifier and the mark-binary availability. Steps 1-3 are
//! each fatal for the deployment-mutation phase; the binary probe never
//! fails, it only reports a boolean.

use brokkr_core::types::{ExtensionArn, ProviderBlock, ProviderState};
use brokkr_core::{Config, Error, Result};
use camino::Utf8PathBuf;
use std::time::Duration;
use tracing::debug;

/// Region the host framework falls back to regardless of any locally
/// configured profile; replicated here to avoid surprising divergence.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Packaging directory used when the service descriptor does not override it
pub const DEFAULT_PACKAGE_DIR: &str = ".serverless";

/// Location hints for resolving the build archive
#[derive(Debug, Clone, Default)]
pub struct ProbeLocations {
    /// Directory of the service; current directory when absent
    pub service_dir: Option<Utf8PathBuf>,
    /// Packaging directory override relative to the service directory
    pub package_path: Option<String>,
    /// Name of the service, required to locate the archive
    pub service_name: Option<String>,
}

/// Caller-supplied options that take precedence over the provider block
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    pub region: Option<String>,
}

/// Run the composite probe and assemble the provider snapshot
pub async fn probe(
    config: &Config,
    provider: &ProviderBlock,
    options: &ProbeOptions,
    locations: &ProbeLocations,
) -> Result<ProviderState> {
    let zip_path = resolve_archive_path(locations)?;
    if !zip_path.exists() {
        return Err(Error::archive_not_found(zip_path));
    }

    let region = effective_region(options, provider);
    let extension_arn = fetch_extension_arn(
        &config.arn_url_prefix,
        &region,
        config.arn_version.as_deref(),
        Duration::from_secs(config.http_timeout_secs),
    )
    .await?;

    Ok(ProviderState {
        memory_size: provider.memory_size_mb(),
        is_mark_available: binary_available(&config.mark_path),
        region,
        extension_arn,
        zip_path,
    })
}

/// Absolute path of the build archive:
/// `service_dir / (package_path | ".serverless") / "{service_name}.zip"`
pub fn resolve_archive_path(locations: &ProbeLocations) -> Result<Utf8PathBuf> {
    let service_name = locations
        .service_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or(Error::MissingServiceName)?;

    let service_dir = match &locations.service_dir {
        Some(dir) => dir.clone(),
        None => {
            let cwd = std::env::current_dir()?;
            Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
                Error::Io(std::io::Error::other(format!(
                    "current directory is not valid UTF-8: {}",
                    path.display()
                )))
            })?
        }
    };

    let package_dir = locations
        .package_path
        .as_deref()
        .unwrap_or(DEFAULT_PACKAGE_DIR);

    Ok(service_dir
        .join(package_dir)
        .join(format!("{service_name}.zip")))
}

/// Effective region: caller option, else the provider block, else the
/// hardcoded fallback
pub fn effective_region(options: &ProbeOptions, provider: &ProviderBlock) -> String {
    options
        .region
        .clone()
        .or_else(|| provider.region.clone())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

/// Fetch the extension identifier for a region.
///
/// `GET {url_prefix}/{region}/extension.arn` returns the latest versioned
/// identifier as plain text. A pinned version is applied by rewriting the
/// trailing version segment of the fetched identifier; no second request
/// is made. Not retried: non-2xx, transport errors and timeouts all abort
/// with the region and the reason in the message.
pub async fn fetch_extension_arn(
    url_prefix: &str,
    region: &str,
    pinned_version: Option<&str>,
    timeout: Duration,
) -> Result<ExtensionArn> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::arn_fetch(region, e.to_string()))?;

    let url = format!("{url_prefix}/{region}/extension.arn");
    debug!("fetching extension identifier from {url}");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::arn_fetch(region, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::arn_fetch(region, format!("HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::arn_fetch(region, e.to_string()))?;
    let latest = ExtensionArn::new(body.trim());

    Ok(match pinned_version {
        None | Some("latest") => latest,
        Some(version) => latest.with_version(version),
    })
}

/// Whether the named binary resolves on PATH; never errors
pub fn binary_available(name: &str) -> bool {
    which::which(name).is_ok()
}
