//! Enforce-or-warn policy checks
//!
//! The memory floor, the mark-binary presence and the post-build layer
//! audit all share one shape: a predicate, an enforcement flag, and three
//! message templates. When enforcement is on a failed predicate aborts the
//! build; when it is off the same failure degrades to a warning.

use brokkr_core::{Error, Result};
use tracing::{error, info, warn};

/// Message templates for one enforceable check
#[derive(Debug, Clone)]
pub struct CheckMessages {
    /// What is being checked, logged before evaluation
    pub checking: &'static str,
    /// Build-failing message when the predicate fails under enforcement
    pub error: String,
    /// Message when the predicate fails without enforcement
    pub warn: String,
    /// Message when the predicate holds under enforcement
    pub success: Option<String>,
}

/// Evaluate a policy predicate under an enforcement flag
pub fn enforce_check(predicate: bool, enforce: bool, msg: CheckMessages) -> Result<()> {
    if enforce {
        info!("{}...", msg.checking);
    } else {
        info!("skipping {}", msg.checking);
    }

    if predicate {
        if enforce {
            if let Some(success) = msg.success {
                info!("{success}");
            }
        }
        Ok(())
    } else if enforce {
        error!("{}", msg.error);
        Err(Error::check_failed(msg.error))
    } else {
        warn!("{}", msg.warn);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages() -> CheckMessages {
        CheckMessages {
            checking: "checking the predicate",
            error: "the check failed".to_string(),
            warn: "the check would have failed".to_string(),
            success: Some("the check passed".to_string()),
        }
    }

    #[test]
    fn test_passing_predicate_is_ok_regardless_of_enforcement() {
        assert!(enforce_check(true, true, messages()).is_ok());
        assert!(enforce_check(true, false, messages()).is_ok());
    }

    #[test]
    fn test_failing_predicate_errors_only_under_enforcement() {
        let err = enforce_check(false, true, messages()).unwrap_err();
        assert_eq!(err.to_string(), "the check failed");

        assert!(enforce_check(false, false, messages()).is_ok());
    }
}
