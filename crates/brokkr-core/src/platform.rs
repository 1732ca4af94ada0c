//! Platform gate
//!
//! The mark binary and the packaging conventions this plugin relies on are
//! only exercised on UNIX-like hosts, so anything else short-circuits the
//! whole plugin into a no-op instead of failing the build.

/// Platforms the plugin operates on, matched against `std::env::consts::OS`
pub const SUPPORTED_PLATFORMS: &[&str] = &["linux", "macos"];

/// Identifier of the current platform
pub fn current() -> &'static str {
    std::env::consts::OS
}

/// Whether the current platform is in the supported set
pub fn is_supported() -> bool {
    SUPPORTED_PLATFORMS.contains(&current())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_matches_os_constant() {
        assert_eq!(current(), std::env::consts::OS);
    }

    #[test]
    fn test_supported_set_is_unix_like() {
        assert!(SUPPORTED_PLATFORMS.contains(&"linux"));
        assert!(SUPPORTED_PLATFORMS.contains(&"macos"));
        assert!(!SUPPORTED_PLATFORMS.contains(&"windows"));
    }

    #[test]
    fn test_is_supported_agrees_with_membership() {
        assert_eq!(is_supported(), SUPPORTED_PLATFORMS.contains(&current()));
    }
}
