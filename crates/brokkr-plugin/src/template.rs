//! Post-build template audit
//!
//! Re-parses the generated infrastructure template and cross-checks that
//! every deployed function resource carries the exact versioned extension
//! identifier the mutation phase attached. No version stripping here: the
//! deployed artifact must match what was written.

use brokkr_core::types::ExtensionArn;
use brokkr_core::{Error, Result};
use camino::Utf8Path;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use tracing::{info, warn};

/// Filename of the generated template inside the packaging directory
pub const TEMPLATE_FILENAME: &str = "cloudformation-template-update-stack.json";

/// Resource type identifying a deployed cloud function
const FUNCTION_RESOURCE_TYPE: &str = "AWS::Lambda::Function";

#[derive(Debug, Deserialize)]
struct Template {
    #[serde(rename = "Resources", default)]
    resources: BTreeMap<String, Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(rename = "Properties", default)]
    properties: ResourceProperties,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceProperties {
    #[serde(rename = "Layers", default)]
    layers: Vec<Value>,
}

/// Per-function audit of the generated template
#[derive(Debug, Clone, Default)]
pub struct LayerAudit {
    pub total_functions: usize,
    pub with_extension: Vec<String>,
    pub missing_extension: Vec<String>,
}

impl LayerAudit {
    /// Multi-line status report naming every function in both buckets
    pub fn status_report(&self) -> String {
        let mut lines = vec!["Layer check status:".to_string()];
        lines.push(format!(
            "  functions with telemetry extension ({}/{}):",
            self.with_extension.len(),
            self.total_functions
        ));
        lines.extend(self.with_extension.iter().map(|f| format!("    - {f}")));
        lines.push(format!(
            "  functions MISSING telemetry extension ({}/{}):",
            self.missing_extension.len(),
            self.total_functions
        ));
        lines.extend(self.missing_extension.iter().map(|f| format!("    - {f}")));
        lines.join("\n")
    }
}

/// Parse the template and bucket every function resource by whether its
/// layer list contains the exact expected identifier.
pub fn audit_template(path: &Utf8Path, expected: &ExtensionArn) -> Result<LayerAudit> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::template_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })?;
    let template: Template =
        serde_json::from_str(&content).map_err(|e| Error::template_malformed(e.to_string()))?;

    let mut audit = LayerAudit::default();
    for (name, resource) in &template.resources {
        if resource.kind != FUNCTION_RESOURCE_TYPE {
            continue;
        }
        audit.total_functions += 1;
        let has_extension = resource
            .properties
            .layers
            .iter()
            .any(|layer| layer.as_str() == Some(expected.as_str()));
        if has_extension {
            audit.with_extension.push(name.clone());
        } else {
            audit.missing_extension.push(name.clone());
        }
    }
    Ok(audit)
}

/// Validate post-build state against the identifier captured during
/// mutation.
///
/// Under enforcement every failure (missing identifier, unreadable or
/// malformed template, functions without the extension) aborts the build
/// with a self-describing error; without it the same conditions degrade to
/// warnings or logged skips.
pub fn validate_packaging(
    template_path: &Utf8Path,
    expected: Option<&ExtensionArn>,
    enforce: bool,
) -> Result<()> {
    let Some(expected) = expected else {
        if enforce {
            return Err(Error::extension_missing(
                "no telemetry extension ARN available",
            ));
        }
        info!("layer check skipped: no telemetry extension ARN available");
        return Ok(());
    };

    let audit = match audit_template(template_path, expected) {
        Ok(audit) => audit,
        Err(e) if enforce => return Err(e),
        Err(e) => {
            warn!("layer check skipped: {e}");
            return Ok(());
        }
    };

    if audit.total_functions == 0 {
        info!("layer check: no function resources found in packaging template");
        return Ok(());
    }
    info!(
        "layer check: found {} function resource(s) in packaging template",
        audit.total_functions
    );

    if audit.missing_extension.is_empty() {
        info!(
            "layer check passed: all {} function(s) have the telemetry extension",
            audit.total_functions
        );
        return Ok(());
    }

    warn!("{}", audit.status_report());
    if enforce {
        return Err(Error::extension_missing(format!(
            "{} function(s) missing telemetry extension: {}",
            audit.missing_extension.len(),
            audit.missing_extension.join(", ")
        )));
    }
    warn!(
        "{} function(s) missing telemetry extension. Set layer-check: true to enforce this requirement",
        audit.missing_extension.len()
    );
    Ok(())
}
