//! Version port backed by the GitHub release feed, the installed binary,
//! and the system clipboard.

use crate::api_client::{http_agent, USER_AGENT};
use crate::errors::VersionError;
use crate::ports::VersionSource;
use crate::version::{ReleaseInfo, SemVer};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Clipboard writers tried in order, with the arguments that make them read stdin.
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

pub struct ReleaseVersionSource {
    agent: ureq::Agent,
    releases_url: String,
    update_command: String,
    /// Binary whose `--version` is read; defaults to the running executable.
    executable: Option<PathBuf>,
}

impl ReleaseVersionSource {
    pub fn new(releases_url: impl Into<String>, update_command: impl Into<String>) -> Self {
        Self {
            agent: http_agent(),
            releases_url: releases_url.into(),
            update_command: update_command.into(),
            executable: None,
        }
    }

    pub fn with_executable(mut self, path: PathBuf) -> Self {
        self.executable = Some(path);
        self
    }

    fn executable(&self) -> Option<PathBuf> {
        match &self.executable {
            Some(path) => Some(path.clone()),
            None => std::env::current_exe().ok().map(installed_path),
        }
    }
}

#[async_trait]
impl VersionSource for ReleaseVersionSource {
    fn current_version(&self) -> String {
        CURRENT_VERSION.to_string()
    }

    async fn fetch_latest_release(&self) -> Result<ReleaseInfo, VersionError> {
        let agent = self.agent.clone();
        let url = self.releases_url.clone();
        let result = tokio::task::spawn_blocking(move || request_latest_release(&agent, &url))
            .await
            .map_err(|e| VersionError::FetchFailed(e.to_string()))?;
        result.map_err(|e| VersionError::FetchFailed(format!("{:#}", e)))
    }

    async fn on_disk_version(&self) -> Option<String> {
        let exe = self.executable()?;
        tokio::task::spawn_blocking(move || read_binary_version(&exe))
            .await
            .ok()
            .flatten()
    }

    async fn copy_update_command(&self) {
        let command = self.update_command.clone();
        match tokio::task::spawn_blocking(move || copy_to_clipboard(&command)).await {
            Ok(Ok(tool)) => tracing::debug!(tool, "Copied update command"),
            Ok(Err(e)) => tracing::warn!("Could not copy update command: {:#}", e),
            Err(e) => tracing::warn!("Clipboard task failed: {}", e),
        }
    }
}

fn request_latest_release(agent: &ureq::Agent, url: &str) -> Result<ReleaseInfo> {
    let mut request = agent
        .get(url)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "application/vnd.github+json");

    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        request = request.header("Authorization", &format!("Bearer {}", token));
    }

    let body = request
        .call()
        .context("Failed to fetch latest release from GitHub")?
        .body_mut()
        .read_to_string()
        .context("Failed to read release response")?;

    serde_json::from_str(&body).context("Failed to parse release response")
}

/// After an in-place upgrade Linux reports the running image as
/// `<path> (deleted)`; the installed binary is at `<path>`.
pub fn installed_path(exe: PathBuf) -> PathBuf {
    match exe.to_str().and_then(|s| s.strip_suffix(" (deleted)")) {
        Some(stripped) => PathBuf::from(stripped),
        None => exe,
    }
}

fn read_binary_version(exe: &Path) -> Option<String> {
    let output = Command::new(exe)
        .arg("--version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();
    match output {
        Ok(output) if output.status.success() => {
            parse_version_output(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(output) => {
            tracing::debug!(status = %output.status, "Installed binary rejected --version");
            None
        }
        Err(e) => {
            tracing::debug!(exe = %exe.display(), "Could not run installed binary: {}", e);
            None
        }
    }
}

/// Takes the last token of `quotabar 1.4.0`-style output, if it is a version.
pub fn parse_version_output(output: &str) -> Option<String> {
    let token = output.split_whitespace().last()?;
    SemVer::parse(token)?;
    Some(token.trim_start_matches(['v', 'V']).to_string())
}

/// Pipes `text` into the first clipboard tool found on `PATH` and returns its name.
pub fn copy_to_clipboard(text: &str) -> Result<&'static str> {
    let &(tool, args) = CLIPBOARD_TOOLS
        .iter()
        .find(|(tool, _)| which::which(tool).is_ok())
        .context("No clipboard tool found (tried pbcopy, wl-copy, xclip, xsel, clip)")?;

    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to start {}", tool))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write to {}", tool))?;
    }

    let status = child.wait().with_context(|| format!("{} did not finish", tool))?;
    if !status.success() {
        anyhow::bail!("{} exited with {}", tool, status);
    }
    Ok(tool)
}

#[cfg(test)]
#[path = "tests/update_tests.rs"]
mod tests;
