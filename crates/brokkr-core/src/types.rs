//! Shared types for the packaging pipeline

use camino::Utf8PathBuf;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Memory size the host framework assigns when the provider block is silent
pub const DEFAULT_MEMORY_SIZE_MB: i64 = 1024;

/// Versioned identifier of the telemetry extension layer.
///
/// Shape: `prefix:region:account:kind:name[:version]` where the trailing
/// segment, when present, is all digits. Equality for "already attached"
/// purposes is version-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionArn(String);

impl ExtensionArn {
    pub fn new(arn: impl Into<String>) -> Self {
        Self(arn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier with its trailing `:version` segment removed
    pub fn versionless(&self) -> &str {
        versionless(&self.0)
    }

    /// Rewrite the trailing version segment to a pinned version
    pub fn with_version(&self, version: &str) -> Self {
        Self(format!("{}:{}", self.versionless(), version))
    }

    /// Version-agnostic comparison against another identifier string
    pub fn matches(&self, other: &str) -> bool {
        self.versionless() == versionless(other)
    }
}

impl fmt::Display for ExtensionArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip the trailing colon-delimited segment when it is a version number.
///
/// An identifier without a version segment is returned unchanged rather
/// than losing its name segment.
pub fn versionless(arn: &str) -> &str {
    match arn.rsplit_once(':') {
        Some((base, version))
            if !version.is_empty() && version.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => arn,
    }
}

/// Short-lived provider snapshot, created once per deployment run and read
/// by all later stages
#[derive(Debug, Clone)]
pub struct ProviderState {
    pub region: String,
    pub memory_size: i64,
    pub is_mark_available: bool,
    pub extension_arn: ExtensionArn,
    pub zip_path: Utf8PathBuf,
}

/// The host framework's resolved provider block, as declared in the
/// service descriptor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProviderBlock {
    pub region: Option<String>,
    pub memory_size: Option<MemoryValue>,
}

impl ProviderBlock {
    /// Declared memory size coerced to an integer, falling back to the
    /// host framework's 1024MB default when absent or non-numeric
    pub fn memory_size_mb(&self) -> i64 {
        match &self.memory_size {
            Some(MemoryValue::Number(n)) => *n,
            Some(MemoryValue::Text(s)) => {
                s.trim().parse::<i64>().unwrap_or(DEFAULT_MEMORY_SIZE_MB)
            }
            None => DEFAULT_MEMORY_SIZE_MB,
        }
    }
}

/// Memory size as declared: descriptors carry it as a number or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MemoryValue {
    Number(i64),
    Text(String),
}

/// One deployable unit owned by the host framework's service model.
///
/// The plugin mutates `layers` in place during the apply pass; all other
/// fields pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FunctionDefinition {
    pub handler: Option<String>,
    pub memory_size: Option<i64>,
    pub layers: Option<Vec<String>>,
}

impl FunctionDefinition {
    /// Number of currently attached layers/extensions
    pub fn layer_count(&self) -> usize {
        self.layers.as_ref().map_or(0, Vec::len)
    }
}

/// Function definitions keyed by function name
pub type FunctionMap = BTreeMap<String, FunctionDefinition>;
