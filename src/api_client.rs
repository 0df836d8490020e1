//! HTTP client for the Copilot usage endpoint.

use crate::errors::FetchError;
use crate::ports::UsageApi;
use crate::quota::UsageResponse;
use async_trait::async_trait;
use std::time::Duration;

const API_TIMEOUT: Duration = Duration::from_secs(15);
pub const USER_AGENT: &str = concat!("quotabar/", env!("CARGO_PKG_VERSION"));

/// Builds the blocking agent shared by the HTTP adapters.
pub fn http_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(API_TIMEOUT))
        .build()
        .into()
}

pub struct HttpUsageApi {
    agent: ureq::Agent,
    url: String,
}

impl HttpUsageApi {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            agent: http_agent(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl UsageApi for HttpUsageApi {
    async fn fetch_usage(&self, token: &str) -> Result<UsageResponse, FetchError> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        let token = token.to_string();

        tokio::task::spawn_blocking(move || fetch_usage_blocking(&agent, &url, &token))
            .await
            .map_err(|e| FetchError::ApiError(format!("usage request task failed: {}", e)))?
    }
}

fn fetch_usage_blocking(
    agent: &ureq::Agent,
    url: &str,
    token: &str,
) -> Result<UsageResponse, FetchError> {
    let body = agent
        .get(url)
        .header("Authorization", &format!("Bearer {}", token))
        .header("Accept", "application/json")
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(classify_error)?
        .body_mut()
        .read_to_string()
        .map_err(|e| FetchError::ApiError(format!("failed to read usage response: {}", e)))?;

    parse_usage(&body)
}

/// 401 and 403 mean the token is no good; everything else is transient.
pub fn classify_error(err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(401 | 403) => FetchError::AuthenticationFailed,
        ureq::Error::StatusCode(code) => FetchError::ApiError(format!("HTTP {}", code)),
        other => FetchError::ApiError(other.to_string()),
    }
}

pub fn parse_usage(body: &str) -> Result<UsageResponse, FetchError> {
    serde_json::from_str(body)
        .map_err(|e| FetchError::ApiError(format!("unexpected usage response: {}", e)))
}
