//! State owned by the monitor reducer.

use crate::pace::PaceReserve;
use crate::quota::QuotaSnapshot;
use chrono::{DateTime, FixedOffset};

/// Progress of the sign-in recovery flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Idle,
    InProgress,
    Success,
    Failure,
}

/// Nested state of the auth recovery sub-machine.
///
/// Exists only while the monitor needs the user to sign in again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    pub phase: AuthPhase,
    /// Message from the last failed sign-in attempt
    pub error: Option<String>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Aggregate state of the usage monitor.
///
/// Mutated only by [`super::reduce`]; everything else reads snapshots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonitorState {
    pub usage: Option<QuotaSnapshot>,
    pub login: Option<String>,
    pub plan: Option<String>,
    /// Reset date as reported by the API (`YYYY-MM-DD`)
    pub reset_date: Option<String>,
    pub last_updated: Option<DateTime<FixedOffset>>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub needs_auth: bool,
    pub auth: Option<AuthState>,
    pub pace_reserve: Option<PaceReserve>,
    pub current_version: Option<String>,
    pub available_update: Option<String>,
    pub show_copied_confirmation: bool,
    /// Generation of the newest usage fetch; older completions are stale.
    pub usage_generation: u64,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_version(version: impl Into<String>) -> Self {
        Self {
            current_version: Some(version.into()),
            ..Self::default()
        }
    }
}
