//! Boundaries between the reconciliation engine and the outside world.
//!
//! The engine never touches the filesystem, network, clipboard, or process
//! table directly; it goes through these traits so tests can swap in mocks.

use crate::errors::{CredentialError, FetchError, SignInError, VersionError};
use crate::quota::UsageResponse;
use crate::version::ReleaseInfo;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local};
use std::sync::Arc;
use std::time::Duration;

/// Reads the OAuth token used for the usage API.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn read_token(&self) -> Result<String, CredentialError>;
}

/// Fetches quota data for a token.
#[async_trait]
pub trait UsageApi: Send + Sync {
    async fn fetch_usage(&self, token: &str) -> Result<UsageResponse, FetchError>;
}

/// Version information about the running process and the installed binary.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Version embedded in the running process.
    fn current_version(&self) -> String;
    async fn fetch_latest_release(&self) -> Result<ReleaseInfo, VersionError>;
    /// Version of the binary currently installed on disk, which an external
    /// updater may have replaced since this process started.
    async fn on_disk_version(&self) -> Option<String>;
    /// Puts the update command on the clipboard.
    async fn copy_update_command(&self);
}

pub trait ProcessControl: Send + Sync {
    fn terminate(&self);
    /// Replaces the running process with the installed binary.
    fn relaunch(&self);
}

/// The external sign-in flow driving auth recovery.
#[async_trait]
pub trait SignInFlow: Send + Sync {
    async fn sign_in(&self) -> Result<(), SignInError>;
}

/// Wall clock used for `last_updated` and pace calculation.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Periods for the engine's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub refresh_interval: Duration,
    pub bundle_check_interval: Duration,
    pub copied_confirmation: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(15 * 60),
            bundle_check_interval: Duration::from_secs(30),
            copied_confirmation: Duration::from_secs(2),
        }
    }
}

/// Everything the engine depends on, bundled for injection.
#[derive(Clone)]
pub struct Dependencies {
    pub credentials: Arc<dyn CredentialSource>,
    pub api: Arc<dyn UsageApi>,
    pub versions: Arc<dyn VersionSource>,
    pub process: Arc<dyn ProcessControl>,
    pub sign_in: Arc<dyn SignInFlow>,
    pub clock: Arc<dyn Clock>,
    pub timings: Timings,
}
