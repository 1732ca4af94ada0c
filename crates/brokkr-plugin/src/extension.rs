//! Extension attachment
//!
//! Two passes over the function map: a read-only validation pass that
//! aggregates every layer-ceiling violation, then an apply pass that runs
//! only when validation found nothing. A multi-function deployment never
//! ends up with some functions mutated and others rejected.

use brokkr_core::types::{versionless, ExtensionArn, FunctionMap};
use brokkr_core::{Error, Result};
use tracing::info;

/// Per-function outcome of the apply pass
#[derive(Debug, Clone, Default)]
pub struct MutationSummary {
    /// Functions the identifier was appended to
    pub added: Vec<String>,
    /// Functions that already carried an equivalent identifier
    pub skipped: Vec<String>,
}

impl MutationSummary {
    pub fn total(&self) -> usize {
        self.added.len() + self.skipped.len()
    }
}

/// Attach the extension identifier to every function in the map.
///
/// A function already carrying a version-agnostic equivalent of the
/// identifier is left untouched and counted as skipped; every other
/// function gets the full versioned identifier appended. Functions with no
/// layer list are treated as having an empty one.
pub fn attach_extension(
    functions: &mut FunctionMap,
    arn: &ExtensionArn,
    max_layers: usize,
) -> Result<MutationSummary> {
    let violations: Vec<String> = functions
        .iter()
        .filter(|(_, function)| function.layer_count() >= max_layers)
        .map(|(name, function)| {
            format!(
                "function {name} has {} layers/extensions (max: {max_layers})",
                function.layer_count()
            )
        })
        .collect();
    if !violations.is_empty() {
        return Err(Error::layer_limit_exceeded(violations.join(", ")));
    }

    let target = arn.versionless();
    let mut summary = MutationSummary::default();
    for (name, function) in functions.iter_mut() {
        let layers = function.layers.get_or_insert_with(Vec::new);
        if layers.iter().any(|layer| versionless(layer) == target) {
            info!("skipped function {name}: telemetry extension already present");
            summary.skipped.push(name.clone());
        } else {
            layers.push(arn.as_str().to_string());
            info!(
                "added {arn} extension to function: {name} ({}/{max_layers} layers/extensions)",
                layers.len()
            );
            summary.added.push(name.clone());
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokkr_core::types::FunctionDefinition;

    const DUST_V7: &str = "arn:aws:lambda:us-east-1:123456789012:layer:dust:7";
    const DUST_V99: &str = "arn:aws:lambda:us-east-1:123456789012:layer:dust:99";
    const OTHER_V1: &str = "arn:aws:lambda:us-east-1:123456789012:layer:other:1";

    fn function_with_layers(layers: &[&str]) -> FunctionDefinition {
        FunctionDefinition {
            layers: Some(layers.iter().map(|l| l.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_appends_to_function_with_unrelated_layer() {
        let mut functions = FunctionMap::new();
        functions.insert("api".to_string(), function_with_layers(&[OTHER_V1]));

        let summary =
            attach_extension(&mut functions, &ExtensionArn::new(DUST_V7), 15).unwrap();

        let layers = functions["api"].layers.as_ref().unwrap();
        assert_eq!(layers.len(), 2);
        assert!(layers.contains(&OTHER_V1.to_string()));
        assert!(layers.contains(&DUST_V7.to_string()));
        assert_eq!(summary.added, vec!["api".to_string()]);
        assert!(summary.skipped.is_empty());
    }

    #[test]
    fn test_skips_function_with_other_version_of_same_extension() {
        let mut functions = FunctionMap::new();
        functions.insert("api".to_string(), function_with_layers(&[DUST_V7]));

        let summary =
            attach_extension(&mut functions, &ExtensionArn::new(DUST_V99), 15).unwrap();

        // Untouched: still one entry, still version 7
        assert_eq!(
            functions["api"].layers.as_ref().unwrap(),
            &vec![DUST_V7.to_string()]
        );
        assert!(summary.added.is_empty());
        assert_eq!(summary.skipped, vec!["api".to_string()]);
    }

    #[test]
    fn test_ceiling_violation_aggregates_and_mutates_nothing() {
        let mut functions = FunctionMap::new();
        functions.insert(
            "crowded".to_string(),
            function_with_layers(&[OTHER_V1, OTHER_V1, OTHER_V1]),
        );
        functions.insert("roomy".to_string(), function_with_layers(&[OTHER_V1]));

        let err =
            attach_extension(&mut functions, &ExtensionArn::new(DUST_V7), 3).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("crowded"));
        assert!(message.contains('3'));

        // Atomicity: neither function was modified, including the one
        // under the limit
        assert_eq!(functions["crowded"].layer_count(), 3);
        assert_eq!(
            functions["roomy"].layers.as_ref().unwrap(),
            &vec![OTHER_V1.to_string()]
        );
    }

    #[test]
    fn test_ceiling_violation_lists_every_offender() {
        let mut functions = FunctionMap::new();
        functions.insert(
            "first".to_string(),
            function_with_layers(&[OTHER_V1, OTHER_V1]),
        );
        functions.insert(
            "second".to_string(),
            function_with_layers(&[OTHER_V1, OTHER_V1]),
        );

        let err =
            attach_extension(&mut functions, &ExtensionArn::new(DUST_V7), 2).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("first"));
        assert!(message.contains("second"));
    }

    #[test]
    fn test_reapply_is_idempotent() {
        let mut functions = FunctionMap::new();
        functions.insert("api".to_string(), FunctionDefinition::default());
        functions.insert("worker".to_string(), function_with_layers(&[OTHER_V1]));

        let arn = ExtensionArn::new(DUST_V7);
        let first = attach_extension(&mut functions, &arn, 15).unwrap();
        assert_eq!(first.added.len(), 2);
        assert!(first.skipped.is_empty());

        let second = attach_extension(&mut functions, &arn, 15).unwrap();
        assert!(second.added.is_empty());
        assert_eq!(second.skipped.len(), 2);

        for function in functions.values() {
            let copies = function
                .layers
                .as_ref()
                .unwrap()
                .iter()
                .filter(|layer| versionless(layer) == arn.versionless())
                .count();
            assert_eq!(copies, 1);
        }
    }

    #[test]
    fn test_empty_map_is_a_noop() {
        let mut functions = FunctionMap::new();
        let summary =
            attach_extension(&mut functions, &ExtensionArn::new(DUST_V7), 15).unwrap();
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn test_missing_layer_list_is_auto_initialized() {
        let mut functions = FunctionMap::new();
        functions.insert("bare".to_string(), FunctionDefinition::default());

        attach_extension(&mut functions, &ExtensionArn::new(DUST_V7), 15).unwrap();
        assert_eq!(
            functions["bare"].layers.as_ref().unwrap(),
            &vec![DUST_V7.to_string()]
        );
    }
}
