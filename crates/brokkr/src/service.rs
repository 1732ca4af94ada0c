//! Service descriptor loading
//!
//! The descriptor plays the role of the host framework's service model: the
//! service name, the provider block, the packaging location and the
//! function map the pipeline mutates, plus an optional `brokkr` section of
//! explicit configuration overrides (the highest precedence tier).

use anyhow::{Context, Result};
use brokkr_core::types::{FunctionMap, ProviderBlock};
use brokkr_core::ConfigOverrides;
use camino::Utf8Path;
use serde::Deserialize;
use std::fs;

/// A parsed service descriptor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServiceDescriptor {
    pub service: Option<String>,
    pub provider: Option<ProviderBlock>,
    pub package: Option<PackageBlock>,
    pub functions: FunctionMap,
    pub brokkr: Option<ConfigOverrides>,
}

/// Packaging location override
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PackageBlock {
    pub path: Option<String>,
}

impl ServiceDescriptor {
    /// Load and parse a descriptor from disk
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read service descriptor at {path}"))?;
        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse service descriptor at {path}"))
    }
}
