//! Copilot OAuth token lookup.
//!
//! The token lives in `~/.config/github-copilot/apps.json` (or the legacy
//! `hosts.json` beside it): a JSON object whose entries each carry an
//! `oauth_token`.

use crate::errors::CredentialError;
use crate::ports::CredentialSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_ENV: &str = "COPILOT_CONFIG_DIR";
const TOKEN_FILES: [&str; 2] = ["apps.json", "hosts.json"];

#[derive(Deserialize)]
struct CopilotApp {
    #[serde(default)]
    oauth_token: Option<String>,
}

/// Reads the token from an explicit file, or from the Copilot config directory.
pub struct FileCredentialSource {
    path: Option<PathBuf>,
}

impl FileCredentialSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Files to try, in order.
    fn candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.path {
            return vec![path.clone()];
        }
        match copilot_config_dir() {
            Some(dir) => TOKEN_FILES.iter().map(|f| dir.join(f)).collect(),
            None => vec![],
        }
    }
}

/// `$COPILOT_CONFIG_DIR`, else `~/.config/github-copilot`.
pub fn copilot_config_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config").join("github-copilot")))
}

#[async_trait]
impl CredentialSource for FileCredentialSource {
    async fn read_token(&self) -> Result<String, CredentialError> {
        for path in self.candidates() {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    tracing::debug!(path = %path.display(), "Reading Copilot token");
                    return parse_token(&content, &path);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(CredentialError::TokenParseError(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }
        Err(CredentialError::TokenFileMissing)
    }
}

/// Returns the first non-empty `oauth_token`, by entry key order.
pub fn parse_token(content: &str, path: &Path) -> Result<String, CredentialError> {
    let apps: BTreeMap<String, CopilotApp> = serde_json::from_str(content)
        .map_err(|e| CredentialError::TokenParseError(format!("{}: {}", path.display(), e)))?;

    apps.into_values()
        .filter_map(|app| app.oauth_token)
        .find(|token| !token.trim().is_empty())
        .ok_or_else(|| {
            CredentialError::TokenParseError(format!("no oauth_token in {}", path.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    const APPS_JSON: &str = r#"{
        "github.com:Iv1.b507a08c87ecfe98": {
            "user": "testuser",
            "oauth_token": "gho_apps_token",
            "githubAppId": "Iv1.b507a08c87ecfe98"
        }
    }"#;

    #[tokio::test]
    async fn test_reads_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        std::fs::write(&path, APPS_JSON).unwrap();

        let source = FileCredentialSource::new(Some(path));
        assert_eq!(source.read_token().await.unwrap(), "gho_apps_token");
    }

    #[tokio::test]
    async fn test_missing_explicit_path() {
        let dir = tempdir().unwrap();
        let source = FileCredentialSource::new(Some(dir.path().join("nope.json")));
        assert_eq!(
            source.read_token().await,
            Err(CredentialError::TokenFileMissing)
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_config_dir_env_and_hosts_fallback() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("hosts.json"),
            r#"{"github.com": {"user": "u", "oauth_token": "gho_hosts"}}"#,
        )
        .unwrap();
        std::env::set_var(CONFIG_DIR_ENV, dir.path());

        let source = FileCredentialSource::new(None);
        assert_eq!(source.read_token().await.unwrap(), "gho_hosts");

        // apps.json wins once present
        std::fs::write(dir.path().join("apps.json"), APPS_JSON).unwrap();
        assert_eq!(source.read_token().await.unwrap(), "gho_apps_token");

        std::env::remove_var(CONFIG_DIR_ENV);
    }

    #[tokio::test]
    #[serial]
    async fn test_empty_config_dir_is_missing() {
        let dir = tempdir().unwrap();
        std::env::set_var(CONFIG_DIR_ENV, dir.path());

        let source = FileCredentialSource::new(None);
        assert_eq!(
            source.read_token().await,
            Err(CredentialError::TokenFileMissing)
        );

        std::env::remove_var(CONFIG_DIR_ENV);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse_token("{not json", Path::new("apps.json")).unwrap_err();
        assert!(matches!(err, CredentialError::TokenParseError(_)));
    }

    #[test]
    fn test_entries_without_token_are_parse_error() {
        let err = parse_token(r#"{"a": {"user": "x"}, "b": {"oauth_token": ""}}"#, Path::new("f"))
            .unwrap_err();
        assert_eq!(
            err,
            CredentialError::TokenParseError("no oauth_token in f".to_string())
        );
    }

    #[test]
    fn test_skips_entries_without_token() {
        let token = parse_token(
            r#"{"a": {"user": "x"}, "b": {"oauth_token": "gho_b"}}"#,
            Path::new("f"),
        )
        .unwrap();
        assert_eq!(token, "gho_b");
    }

    #[test]
    fn test_empty_object_is_parse_error() {
        assert!(parse_token("{}", Path::new("f")).is_err());
    }
}
