//! Tamper-evidence mark injection
//!
//! Best-effort: a failed injection reduces functionality but never fails
//! the build, so this reports a boolean instead of an error.

use camino::Utf8Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Run `<mark_path> insert --inject-binary-into-zip <archive>` synchronously
/// with captured output; true on zero exit.
pub fn inject_marks(mark_path: &str, archive: &Utf8Path) -> bool {
    debug!("running {mark_path} insert --inject-binary-into-zip {archive}");
    let output = Command::new(mark_path)
        .args(["insert", "--inject-binary-into-zip"])
        .arg(archive.as_str())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            warn!(
                "mark injection into {archive} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Err(e) => {
            warn!("mark injection into {archive} could not run {mark_path}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_missing_binary_reports_false_without_panicking() {
        let archive = Utf8PathBuf::from("/tmp/does-not-matter.zip");
        assert!(!inject_marks("brokkr-no-such-mark-binary", &archive));
    }

    #[test]
    fn test_nonzero_exit_reports_false() {
        // `false` exists on every UNIX-like platform the plugin supports
        let archive = Utf8PathBuf::from("/tmp/does-not-matter.zip");
        assert!(!inject_marks("false", &archive));
    }
}
