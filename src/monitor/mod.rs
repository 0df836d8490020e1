//! The monitor reducer: the only place monitor state changes.
//!
//! `reduce` applies one action to the state synchronously and returns the
//! effects the store must run. Effects report back by enqueuing further
//! actions, so every mutation happens here, one action at a time.

mod actions;
mod auth;
mod effects;
mod snapshot;
mod state;

pub use actions::{Action, AuthAction, AuthDelegate};
pub use effects::{Effect, Schedule, TimerId};
pub use snapshot::StateSnapshot;
pub use state::{AuthPhase, AuthState, MonitorState};

use crate::errors::UsageError;
use crate::pace::PaceReserve;
use crate::ports::Dependencies;
use crate::quota::UsageResponse;
use crate::version;

pub fn reduce(state: &mut MonitorState, action: Action, deps: &Dependencies) -> Vec<Effect> {
    match action {
        Action::AppLaunched => {
            state.current_version = Some(deps.versions.current_version());
            let mut effects = start_usage_refresh(state, deps);
            effects.push(Effect::CheckLatestRelease);
            effects.push(Effect::ArmTimer {
                id: TimerId::BundleVersionCheck,
                schedule: Schedule::Every(deps.timings.bundle_check_interval),
                action: Action::BundleVersionCheckTicked,
            });
            effects
        }

        Action::Appeared => start_usage_refresh(state, deps),

        Action::RefreshTapped | Action::RetryTapped | Action::RefreshTimerTicked => {
            vec![begin_fetch(state)]
        }

        Action::UsageResponse { generation, result } => {
            if generation != state.usage_generation {
                tracing::debug!(
                    generation,
                    current = state.usage_generation,
                    "Discarding superseded usage response"
                );
                return vec![];
            }
            match result {
                Ok(response) => apply_usage(state, response, deps),
                Err(error) => apply_usage_failure(state, error),
            }
            vec![]
        }

        Action::VersionCheckResponse(Ok(release)) => {
            let newer = state
                .current_version
                .as_deref()
                .and_then(|current| version::newer_release(current, &release));
            if let Some(latest) = newer {
                tracing::info!(latest = %latest, "Update available");
                state.available_update = Some(latest);
            }
            vec![]
        }

        Action::VersionCheckResponse(Err(e)) => {
            tracing::debug!("Version check failed: {}", e);
            vec![]
        }

        Action::UpdateBannerTapped => {
            state.show_copied_confirmation = true;
            vec![
                Effect::CopyUpdateCommand,
                Effect::ArmTimer {
                    id: TimerId::CopiedConfirmation,
                    schedule: Schedule::Once(deps.timings.copied_confirmation),
                    action: Action::CopiedConfirmationDismissed,
                },
            ]
        }

        Action::CopiedConfirmationDismissed => {
            state.show_copied_confirmation = false;
            vec![]
        }

        Action::BundleVersionCheckTicked => vec![Effect::ReadBundleVersion],

        Action::BundleVersionLoaded(on_disk) => {
            match (state.current_version.as_deref(), on_disk.as_deref()) {
                (Some(running), Some(installed)) if running != installed => {
                    tracing::info!(running, installed, "Installed version changed, relaunching");
                    vec![Effect::Relaunch]
                }
                _ => vec![],
            }
        }

        Action::QuitTapped => vec![
            Effect::CancelTimer(TimerId::UsageRefresh),
            Effect::CancelTimer(TimerId::BundleVersionCheck),
            Effect::CancelTimer(TimerId::CopiedConfirmation),
            Effect::Terminate,
        ],

        Action::Auth(AuthAction::Delegate(AuthDelegate::Authenticated)) => {
            state.auth = None;
            state.needs_auth = false;
            vec![begin_fetch(state)]
        }

        Action::Auth(auth_action) => match state.auth.as_mut() {
            Some(auth_state) => auth::reduce(auth_state, auth_action),
            None => {
                tracing::debug!("Ignoring auth action without an active sign-in flow");
                vec![]
            }
        },
    }
}

/// Fetches now and (re)arms the recurring refresh timer.
fn start_usage_refresh(state: &mut MonitorState, deps: &Dependencies) -> Vec<Effect> {
    vec![
        begin_fetch(state),
        Effect::ArmTimer {
            id: TimerId::UsageRefresh,
            schedule: Schedule::Every(deps.timings.refresh_interval),
            action: Action::RefreshTimerTicked,
        },
    ]
}

/// Marks loading and issues a fetch that supersedes any earlier one.
fn begin_fetch(state: &mut MonitorState) -> Effect {
    state.is_loading = true;
    state.usage_generation += 1;
    Effect::FetchUsage {
        generation: state.usage_generation,
    }
}

fn apply_usage(state: &mut MonitorState, response: UsageResponse, deps: &Dependencies) {
    let now = deps.clock.now();
    let usage = response.premium_interactions().cloned();

    state.pace_reserve = response.reset_date.as_deref().and_then(|reset_date| {
        let percent_used = usage.as_ref().map_or(0.0, |u| u.percent_used());
        PaceReserve::calculate(percent_used, reset_date, &now)
    });
    state.usage = usage;
    state.login = response.login;
    state.plan = response.plan;
    state.reset_date = response.reset_date;
    state.last_updated = Some(now);
    state.error = None;
    state.needs_auth = false;
    state.auth = None;
    state.is_loading = false;
}

fn apply_usage_failure(state: &mut MonitorState, error: UsageError) {
    state.is_loading = false;
    state.error = Some(error.to_string());
    if error.requires_auth() {
        state.needs_auth = true;
        state.auth = Some(AuthState::new());
    } else {
        state.needs_auth = false;
        state.auth = None;
    }
}
