//! Pipeline stage sequencing
//!
//! Replaces the host framework's string-keyed lifecycle hooks with an
//! explicit ordered sequence the host invokes directly:
//!
//! 1. [`Pipeline::resolve_provider`] once provider configuration exists
//! 2. [`Pipeline::preflight`] before artifacts are compiled
//! 3. [`Pipeline::process_functions`] when the function map is ready
//! 4. [`Pipeline::validate_packaging`] after final packaging
//!
//! State flows forward through the pipeline value rather than through
//! implicitly mutated fields scattered across hook callbacks; each stage's
//! dependencies are visible in its signature.

use crate::checks::{enforce_check, CheckMessages};
use crate::extension::{attach_extension, MutationSummary};
use crate::marker::inject_marks;
use crate::provider::{probe, ProbeLocations, ProbeOptions};
use crate::template::{validate_packaging, TEMPLATE_FILENAME};
use brokkr_core::types::{ExtensionArn, FunctionMap, ProviderBlock, ProviderState};
use brokkr_core::{platform, Config, ConfigOverrides, Error, Result};
use camino::Utf8PathBuf;
use tracing::{debug, info, warn};

/// The deployment plugin: resolved configuration plus the state threaded
/// between stages of one deployment run.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
    enabled: bool,
    provider: Option<ProviderState>,
    attached_arn: Option<ExtensionArn>,
}

impl Pipeline {
    /// Construct with environment overrides only
    pub fn new() -> Result<Self> {
        Self::with_overrides(ConfigOverrides::default())
    }

    /// Construct with environment plus explicit caller overrides.
    ///
    /// On an unsupported platform this succeeds but registers nothing: every
    /// stage becomes a no-op and the configuration is the safe all-disabled
    /// set. Malformed environment values fail here, before any stage runs.
    pub fn with_overrides(explicit: ConfigOverrides) -> Result<Self> {
        if !platform::is_supported() {
            warn!(
                "plugin is not supported on {}. Only UNIX-like platforms ({}) are supported. Skipping plugin initialization.",
                platform::current(),
                platform::SUPPORTED_PLATFORMS.join(", ")
            );
            return Ok(Self {
                config: Config::disabled(),
                enabled: false,
                provider: None,
                attached_arn: None,
            });
        }

        let config = Config::resolve(ConfigOverrides::from_env()?, explicit);
        debug!("config initialized: {config:?}");
        Ok(Self {
            config,
            enabled: true,
            provider: None,
            attached_arn: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// False when the platform gate turned the plugin into a no-op
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The provider snapshot, if stage 1 has run
    pub fn provider_state(&self) -> Option<&ProviderState> {
        self.provider.as_ref()
    }

    /// Stage 1: probe the deploy target and cache the snapshot.
    ///
    /// Idempotent: a second call before the run ends is a no-op returning
    /// the cached state.
    pub async fn resolve_provider(
        &mut self,
        provider: &ProviderBlock,
        options: &ProbeOptions,
        locations: &ProbeLocations,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.provider.is_some() {
            debug!("provider already resolved, reusing cached state");
            return Ok(());
        }

        let state = probe(&self.config, provider, options, locations).await?;
        info!(
            "provider config: region={}, memorySize={}MB, markAvailable={}, archive={}",
            state.region, state.memory_size, state.is_mark_available, state.zip_path
        );
        self.provider = Some(state);
        Ok(())
    }

    /// Stage 2: enforceable preflight checks against the snapshot
    pub fn preflight(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let state = self.require_provider()?;

        enforce_check(
            state.memory_size >= self.config.memory_check_size,
            self.config.memory_check,
            memory_check_messages(state.memory_size, self.config.memory_check_size),
        )?;
        enforce_check(
            state.is_mark_available,
            self.config.mark_check,
            mark_check_messages(&self.config.mark_path),
        )?;
        Ok(())
    }

    /// Stage 3: attach the extension to every function, then inject marks
    /// into the build archive (best-effort).
    pub fn process_functions(&mut self, functions: &mut FunctionMap) -> Result<MutationSummary> {
        if !self.enabled {
            return Ok(MutationSummary::default());
        }
        let state = self.require_provider()?.clone();

        info!("processing packaged functions");
        if functions.is_empty() {
            warn!("no functions found in service - no extensions added");
            return Ok(MutationSummary::default());
        }

        info!(
            "validating {} function(s) compatibility, adding {} to all functions",
            functions.len(),
            state.extension_arn
        );
        let summary =
            attach_extension(functions, &state.extension_arn, self.config.max_layers)?;
        self.attached_arn = Some(state.extension_arn.clone());

        if !summary.added.is_empty() {
            info!(
                "successfully added telemetry extension to {} function(s)",
                summary.added.len()
            );
        }
        if !summary.skipped.is_empty() {
            info!(
                "skipped adding telemetry extension to {} function(s) as extension is already present",
                summary.skipped.len()
            );
        }

        if !state.is_mark_available {
            warn!("mark binary not available, skipping mark injection");
            return Ok(summary);
        }
        info!("injecting marks into {}", state.zip_path);
        if inject_marks(&self.config.mark_path, &state.zip_path) {
            info!("successfully injected marks into package");
        } else {
            warn!("failed to inject marks into package");
        }
        Ok(summary)
    }

    /// Stage 4: audit the generated template against the identifier
    /// captured in stage 3.
    pub fn validate_packaging(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let template_path = self.template_path()?;
        validate_packaging(
            &template_path,
            self.attached_arn.as_ref(),
            self.config.layer_check,
        )
    }

    fn require_provider(&self) -> Result<&ProviderState> {
        self.provider.as_ref().ok_or(Error::ProviderNotResolved)
    }

    fn template_path(&self) -> Result<Utf8PathBuf> {
        let state = self.require_provider()?;
        let packaging_dir = state
            .zip_path
            .parent()
            .ok_or_else(|| Error::template_not_found(state.zip_path.as_str()))?;
        Ok(packaging_dir.join(TEMPLATE_FILENAME))
    }
}

/// Messages for the provider memory floor check
fn memory_check_messages(memory_size: i64, floor: i64) -> CheckMessages {
    CheckMessages {
        checking: "checking provider memory size",
        error: format!(
            "memory check failed: memorySize ({memory_size}MB) is less than minimum required ({floor}MB)"
        ),
        warn: format!(
            "memory size ({memory_size}MB) is below recommended minimum ({floor}MB). Set memory-check: true to enforce this requirement"
        ),
        success: Some(format!("memory check passed: {memory_size}MB >= {floor}MB")),
    }
}

/// Messages for the mark-binary presence check
fn mark_check_messages(mark_path: &str) -> CheckMessages {
    CheckMessages {
        checking: "checking for mark binary",
        error: format!(
            "mark check failed: mark binary ({mark_path}) not found in PATH. Please add and try again."
        ),
        warn: format!("mark binary ({mark_path}) not found in PATH. Continuing without marks"),
        success: Some("mark binary found and will be used to add tamper-evidence marks".to_string()),
    }
}
