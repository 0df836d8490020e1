use crate::ports::Timings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_USAGE_URL: &str = "https://api.github.com/copilot_internal/user";
pub const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/quotabar/quotabar/releases/latest";
pub const DEFAULT_UPDATE_COMMAND: &str = "cargo install quotabar --force";

/// Monitor configuration, read from `~/.quotabar/config.yaml`.
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Seconds between automatic usage refreshes. Default: 900
    pub refresh_interval_secs: u64,
    /// Seconds between checks of the installed binary's version. Default: 30
    pub bundle_check_interval_secs: u64,
    /// Seconds the "copied" confirmation stays visible. Default: 2
    pub copied_confirmation_secs: u64,
    pub usage_url: String,
    pub releases_url: String,
    /// Token file; unset means the Copilot config directory.
    pub token_path: Option<PathBuf>,
    /// Command copied to the clipboard from the update banner
    pub update_command: String,
    pub sign_in: SignInConfig,
    /// Show the percentage next to the indicator
    pub show_percentage: bool,
    /// Write the structured action log to `~/.quotabar/logs/events.jsonl`
    pub event_log: bool,
}

/// External command run by the sign-in flow.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignInConfig {
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl Default for SignInConfig {
    fn default() -> Self {
        Self {
            command: Some("gh".to_string()),
            args: vec![
                "auth".to_string(),
                "login".to_string(),
                "--web".to_string(),
            ],
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 15 * 60,
            bundle_check_interval_secs: 30,
            copied_confirmation_secs: 2,
            usage_url: DEFAULT_USAGE_URL.to_string(),
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            token_path: None,
            update_command: DEFAULT_UPDATE_COMMAND.to_string(),
            sign_in: SignInConfig::default(),
            show_percentage: true,
            event_log: true,
        }
    }
}

impl MonitorConfig {
    /// Loads the config from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).context("Invalid YAML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("refresh_interval_secs", self.refresh_interval_secs),
            ("bundle_check_interval_secs", self.bundle_check_interval_secs),
            ("copied_confirmation_secs", self.copied_confirmation_secs),
        ] {
            if secs == 0 {
                anyhow::bail!("{} must be at least 1", name);
            }
        }
        if self.usage_url.trim().is_empty() {
            anyhow::bail!("usage_url must not be empty");
        }
        if self.sign_in.command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            anyhow::bail!("sign_in.command must not be empty; omit it to disable sign-in");
        }
        Ok(())
    }

    pub fn timings(&self) -> Timings {
        Timings {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            bundle_check_interval: Duration::from_secs(self.bundle_check_interval_secs),
            copied_confirmation: Duration::from_secs(self.copied_confirmation_secs),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
