//! Configuration resolution with fixed precedence
//!
//! Merges three configuration sources (low to high):
//! 1. Built-in defaults
//! 2. Environment variables (`BROKKR_*` prefix)
//! 3. Explicit caller overrides (service descriptor)
//!
//! A field defined in a later tier replaces the earlier value; a field left
//! undefined in a later tier never erases one. The result is a snapshot that
//! is not mutated after resolution.

pub mod env;

use crate::error::Result;
use serde::Deserialize;

/// Default URL prefix for resolving the telemetry extension identifier
pub const DEFAULT_ARN_URL_PREFIX: &str = "https://dl.brokkr.dev/telemetry";

/// Platform ceiling on attached layers/extensions per function
pub const DEFAULT_MAX_LAYERS: usize = 15;

/// Resolved plugin configuration, created once per plugin instantiation
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Enforce (vs. warn) the provider memory floor
    pub memory_check: bool,
    /// Minimum provider memory in MB
    pub memory_check_size: i64,
    /// Enforce (vs. warn) mark-binary presence
    pub mark_check: bool,
    /// Name or path of the mark binary
    pub mark_path: String,
    /// Enforce (vs. warn) the post-build layer audit
    pub layer_check: bool,
    /// Base URL for extension identifier resolution
    pub arn_url_prefix: String,
    /// Pinned extension version; `None` (or `"latest"`) means latest
    pub arn_version: Option<String>,
    /// Ceiling on layers/extensions per function
    pub max_layers: usize,
    /// Timeout applied to the extension identifier fetch
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_check: true,
            memory_check_size: 256,
            mark_check: true,
            mark_path: "chalk".to_string(),
            layer_check: false,
            arn_url_prefix: DEFAULT_ARN_URL_PREFIX.to_string(),
            arn_version: None,
            max_layers: DEFAULT_MAX_LAYERS,
            http_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Merge defaults < env < explicit, later defined fields winning
    pub fn resolve(env_tier: ConfigOverrides, explicit: ConfigOverrides) -> Self {
        let mut config = Self::default();
        config.apply(env_tier);
        config.apply(explicit);
        config
    }

    /// Safe all-disabled configuration used on unsupported platforms
    pub fn disabled() -> Self {
        Self {
            memory_check: false,
            mark_check: false,
            layer_check: false,
            ..Self::default()
        }
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(v) = overrides.memory_check {
            self.memory_check = v;
        }
        if let Some(v) = overrides.memory_check_size {
            self.memory_check_size = v;
        }
        if let Some(v) = overrides.mark_check {
            self.mark_check = v;
        }
        if let Some(v) = overrides.mark_path {
            self.mark_path = v;
        }
        if let Some(v) = overrides.layer_check {
            self.layer_check = v;
        }
        if let Some(v) = overrides.arn_url_prefix {
            self.arn_url_prefix = v;
        }
        if let Some(v) = overrides.arn_version {
            self.arn_version = Some(v);
        }
        if let Some(v) = overrides.max_layers {
            self.max_layers = v;
        }
        if let Some(v) = overrides.http_timeout_secs {
            self.http_timeout_secs = v;
        }
    }
}

/// One contributing tier of configuration; undefined fields fall through
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConfigOverrides {
    pub memory_check: Option<bool>,
    pub memory_check_size: Option<i64>,
    pub mark_check: Option<bool>,
    pub mark_path: Option<String>,
    pub layer_check: Option<bool>,
    pub arn_url_prefix: Option<String>,
    pub arn_version: Option<String>,
    pub max_layers: Option<usize>,
    pub http_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Build the environment tier from `BROKKR_*` variables.
    ///
    /// Parse errors propagate unmodified so the plugin refuses to
    /// initialize on malformed input.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            memory_check: env::parse_bool("BROKKR_MEMORY_CHECK"),
            memory_check_size: env::parse_integer("BROKKR_MEMORY_CHECK_SIZE_MB")?,
            mark_check: env::parse_bool("BROKKR_MARK_CHECK_ENABLED"),
            mark_path: env::parse_string("BROKKR_MARK_PATH"),
            layer_check: env::parse_bool("BROKKR_LAYER_CHECK"),
            arn_url_prefix: env::parse_string("BROKKR_ARN_URL_PREFIX"),
            arn_version: env::parse_positive_integer("BROKKR_ARN_VERSION")?
                .map(|v| v.to_string()),
            max_layers: None,
            http_timeout_secs: env::parse_positive_integer("BROKKR_HTTP_TIMEOUT_SECS")?
                .map(|v| v as u64),
        })
    }
}
