//! Error types for brokkr-core

use thiserror::Error;

/// Result type alias using brokkr-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the packaging pipeline.
///
/// Configuration errors are fatal at construction time; missing-prerequisite
/// errors are fatal inside the stage that needed them; policy violations are
/// fatal only when the corresponding enforcement flag is set. Messages carry
/// the concrete names, numbers and paths involved since they are surfaced to
/// the end user verbatim.
#[derive(Error, Debug)]
pub enum Error {
    /// Environment variable is set but malformed
    #[error("Received invalid {name} value of: {value}. Must be {expected}.")]
    InvalidEnvVar {
        name: String,
        value: String,
        expected: String,
    },

    /// No provider block in the service descriptor
    #[error("No provider configuration found in service descriptor")]
    NoProviderBlock,

    /// Service name is required to locate the package archive
    #[error("No service name is provided which is required to locate the package archive")]
    MissingServiceName,

    /// Build archive does not exist on disk
    #[error("Could not locate {path}")]
    ArchiveNotFound { path: String },

    /// Extension identifier fetch failed (transport error, timeout or non-2xx)
    #[error("Failed to fetch telemetry extension ARN for region {region}: {reason}")]
    ArnFetch { region: String, reason: String },

    /// A stage ran before the provider snapshot was resolved
    #[error("Provider configuration not initialized")]
    ProviderNotResolved,

    /// Enforced policy check failed
    #[error("{message}")]
    CheckFailed { message: String },

    /// One or more functions are already at the layer ceiling
    #[error("Cannot add telemetry extension: {violations}")]
    LayerLimitExceeded { violations: String },

    /// Generated packaging template missing from disk
    #[error("Packaging template not found at {path}")]
    TemplateNotFound { path: String },

    /// Generated packaging template is not valid JSON
    #[error("Invalid JSON in packaging template: {reason}")]
    TemplateMalformed { reason: String },

    /// Deployed functions are missing the expected extension
    #[error("Layer check failed: {detail}")]
    ExtensionMissing { detail: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid environment variable error
    pub fn invalid_env_var(
        name: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create an archive not found error
    pub fn archive_not_found(path: impl Into<String>) -> Self {
        Self::ArchiveNotFound { path: path.into() }
    }

    /// Create an ARN fetch error
    pub fn arn_fetch(region: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArnFetch {
            region: region.into(),
            reason: reason.into(),
        }
    }

    /// Create a failed check error
    pub fn check_failed(message: impl Into<String>) -> Self {
        Self::CheckFailed {
            message: message.into(),
        }
    }

    /// Create a layer ceiling violation error
    pub fn layer_limit_exceeded(violations: impl Into<String>) -> Self {
        Self::LayerLimitExceeded {
            violations: violations.into(),
        }
    }

    /// Create a template not found error
    pub fn template_not_found(path: impl Into<String>) -> Self {
        Self::TemplateNotFound { path: path.into() }
    }

    /// Create a malformed template error
    pub fn template_malformed(reason: impl Into<String>) -> Self {
        Self::TemplateMalformed {
            reason: reason.into(),
        }
    }

    /// Create a missing extension error
    pub fn extension_missing(detail: impl Into<String>) -> Self {
        Self::ExtensionMissing {
            detail: detail.into(),
        }
    }
}
