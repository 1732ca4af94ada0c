//! Typed environment variable parsing
//!
//! Each parser returns `None` when the variable is entirely unset and an
//! [`Error::InvalidEnvVar`] naming the variable and the offending value when
//! it is set but malformed. Reads are pure; nothing is cached.

use crate::error::{Error, Result};
use std::env;

/// Largest integer magnitude that survives a round-trip through `f64`.
/// Values beyond it are rejected rather than silently losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Raw string passthrough, `None` if unset
pub fn parse_string(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Case-insensitive comparison against the literal `"true"`.
///
/// Any other set value (including `"false"`, `"yes"`, `"1"`, `""`) yields
/// `Some(false)`; only an unset variable yields `None`. Never errors.
pub fn parse_bool(name: &str) -> Option<bool> {
    parse_string(name).map(|val| val.eq_ignore_ascii_case("true"))
}

/// Integer parse with surrounding whitespace tolerated and decimal
/// truncation allowed (`"12.5"` parses as `12`).
pub fn parse_integer(name: &str) -> Result<Option<i64>> {
    let Some(raw) = parse_string(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    let parsed = trimmed.parse::<i64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.abs() <= MAX_SAFE_INTEGER)
            .map(|f| f.trunc() as i64)
    });
    match parsed {
        Some(value) => Ok(Some(value)),
        None => Err(Error::invalid_env_var(name, raw, "a safe integer")),
    }
}

/// Same as [`parse_integer`] but additionally rejects values ≤ 0
pub fn parse_positive_integer(name: &str) -> Result<Option<i64>> {
    match parse_integer(name)? {
        Some(value) if value <= 0 => Err(Error::invalid_env_var(
            name,
            value.to_string(),
            "a positive integer",
        )),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VAR: &str = "BROKKR_TEST_ENV_VALUE";

    fn with_var<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        match value {
            Some(v) => env::set_var(VAR, v),
            None => env::remove_var(VAR),
        }
        let result = f();
        env::remove_var(VAR);
        result
    }

    #[test]
    #[serial]
    fn test_parse_string_unset() {
        with_var(None, || assert_eq!(parse_string(VAR), None));
    }

    #[test]
    #[serial]
    fn test_parse_string_passthrough() {
        with_var(Some("  raw value "), || {
            assert_eq!(parse_string(VAR).as_deref(), Some("  raw value "));
        });
    }

    #[test]
    #[serial]
    fn test_parse_bool_true_case_insensitive() {
        for value in ["true", "TRUE", "True", "tRuE"] {
            with_var(Some(value), || assert_eq!(parse_bool(VAR), Some(true)));
        }
    }

    #[test]
    #[serial]
    fn test_parse_bool_anything_else_is_false() {
        for value in ["false", "yes", "1", "", "truthy"] {
            with_var(Some(value), || assert_eq!(parse_bool(VAR), Some(false)));
        }
    }

    #[test]
    #[serial]
    fn test_parse_bool_unset() {
        with_var(None, || assert_eq!(parse_bool(VAR), None));
    }

    #[test]
    #[serial]
    fn test_parse_integer_plain() {
        with_var(Some("512"), || {
            assert_eq!(parse_integer(VAR).unwrap(), Some(512));
        });
    }

    #[test]
    #[serial]
    fn test_parse_integer_whitespace_and_truncation() {
        with_var(Some("  12.5  "), || {
            assert_eq!(parse_integer(VAR).unwrap(), Some(12));
        });
        with_var(Some("-3.9"), || {
            assert_eq!(parse_integer(VAR).unwrap(), Some(-3));
        });
    }

    #[test]
    #[serial]
    fn test_parse_integer_malformed_names_variable_and_value() {
        with_var(Some("not-a-number"), || {
            let err = parse_integer(VAR).unwrap_err();
            let message = err.to_string();
            assert!(message.contains(VAR));
            assert!(message.contains("not-a-number"));
        });
    }

    #[test]
    #[serial]
    fn test_parse_integer_rejects_unsafe_magnitude() {
        with_var(Some("1e300"), || {
            assert!(parse_integer(VAR).is_err());
        });
        with_var(Some("NaN"), || {
            assert!(parse_integer(VAR).is_err());
        });
    }

    #[test]
    #[serial]
    fn test_parse_positive_integer_rejects_zero_and_negative() {
        with_var(Some("0"), || {
            assert!(parse_positive_integer(VAR).is_err());
        });
        with_var(Some("-5"), || {
            assert!(parse_positive_integer(VAR).is_err());
        });
        with_var(Some("7"), || {
            assert_eq!(parse_positive_integer(VAR).unwrap(), Some(7));
        });
    }

    #[test]
    #[serial]
    fn test_parse_positive_integer_unset() {
        with_var(None, || {
            assert_eq!(parse_positive_integer(VAR).unwrap(), None);
        });
    }
}
