//! Home-based storage paths under `~/.quotabar/`:
//! - `config.yaml` - Monitor configuration
//! - `logs/events.jsonl` - Structured action log
//!
//! `QUOTABAR_HOME` replaces `~/.quotabar` entirely.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const QUOTABAR_DIR: &str = ".quotabar";
pub const HOME_ENV: &str = "QUOTABAR_HOME";

/// Returns the quotabar home directory, creating it if needed.
///
/// # Errors
///
/// Returns an error if:
/// - Home directory cannot be determined
/// - Directory creation fails
pub fn quotabar_home_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .context("Could not determine home directory for quotabar storage")?
            .join(QUOTABAR_DIR),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create quotabar directory: {}", dir.display()))?;
    Ok(dir)
}

/// `~/.quotabar/config.yaml`. The file itself is optional.
pub fn config_path() -> Result<PathBuf> {
    Ok(quotabar_home_dir()?.join("config.yaml"))
}

/// Returns the logs directory: `~/.quotabar/logs/`
///
/// Creates the directory if it doesn't exist.
pub fn logs_dir() -> Result<PathBuf> {
    let dir = quotabar_home_dir()?.join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn test_home_override() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("qb");
        std::env::set_var(HOME_ENV, &home);

        assert_eq!(quotabar_home_dir().unwrap(), home);
        assert!(home.is_dir());
        assert_eq!(config_path().unwrap(), home.join("config.yaml"));
        let logs = logs_dir().unwrap();
        assert_eq!(logs, home.join("logs"));
        assert!(logs.is_dir());

        std::env::remove_var(HOME_ENV);
    }

    #[test]
    #[serial]
    fn test_default_home() {
        std::env::remove_var(HOME_ENV);
        if dirs::home_dir().is_none() {
            return;
        }
        assert!(quotabar_home_dir().unwrap().ends_with(QUOTABAR_DIR));
    }
}
