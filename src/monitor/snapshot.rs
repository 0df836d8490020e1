//! Read-only snapshot of monitor state for the rendering layer.
//!
//! Renderers never mutate this; they receive a new snapshot via the watch
//! channel after every processed action.

use super::state::{AuthState, MonitorState};
use crate::pace::PaceReserve;
use crate::quota::QuotaSnapshot;
use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateSnapshot {
    pub usage: Option<QuotaSnapshot>,
    pub login: Option<String>,
    pub plan: Option<String>,
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
}

impl From<&MonitorState> for StateSnapshot {
    fn from(state: &MonitorState) -> Self {
        Self {
            usage: state.usage.clone(),
            login: state.login.clone(),
            plan: state.plan.clone(),
            reset_date: state.reset_date.clone(),
            last_updated: state.last_updated,
            error: state.error.clone(),
            is_loading: state.is_loading,
            needs_auth: state.needs_auth,
            auth: state.auth.clone(),
            pace_reserve: state.pace_reserve,
            current_version: state.current_version.clone(),
            available_update: state.available_update.clone(),
            show_copied_confirmation: state.show_copied_confirmation,
        }
    }
}
