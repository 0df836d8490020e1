//! Failure taxonomy for the usage, version, and sign-in effects.
//!
//! These errors travel inside actions, so they are `Clone` and compare by
//! value. The `Display` text is what the UI shows in its error line.

use thiserror::Error;

/// Reading the OAuth token from disk failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("GitHub Copilot token file not found. Sign in to create it.")]
    TokenFileMissing,
    #[error("Could not read the GitHub Copilot token: {0}")]
    TokenParseError(String),
}

/// The usage API call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("GitHub rejected the Copilot token. Sign in again.")]
    AuthenticationFailed,
    #[error("GitHub API request failed: {0}")]
    ApiError(String),
}

/// Any failure of the usage reconciliation effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl UsageError {
    /// Whether this failure should send the user through sign-in recovery.
    pub fn requires_auth(&self) -> bool {
        match self {
            UsageError::Credential(_) => true,
            UsageError::Fetch(FetchError::AuthenticationFailed) => true,
            UsageError::Fetch(FetchError::ApiError(_)) => false,
        }
    }
}

/// Fetching the latest release failed. Never surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("failed to fetch latest release: {0}")]
    FetchFailed(String),
}

/// The external sign-in flow did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignInError {
    #[error("no sign-in command is configured")]
    NotConfigured,
    #[error("sign-in failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_routing() {
        assert!(UsageError::from(CredentialError::TokenFileMissing).requires_auth());
        assert!(UsageError::from(CredentialError::TokenParseError("bad".into())).requires_auth());
        assert!(UsageError::from(FetchError::AuthenticationFailed).requires_auth());
        assert!(!UsageError::from(FetchError::ApiError("500".into())).requires_auth());
    }

    #[test]
    fn test_usage_error_display_is_transparent() {
        let err = UsageError::from(CredentialError::TokenFileMissing);
        assert_eq!(
            err.to_string(),
            "GitHub Copilot token file not found. Sign in to create it."
        );
    }
}
