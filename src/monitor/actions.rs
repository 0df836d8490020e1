//! Actions fed to the monitor reducer.
//!
//! External triggers (launch, UI, timers) and effect completions all arrive
//! as actions and are applied one at a time in arrival order.

use crate::errors::{SignInError, UsageError, VersionError};
use crate::quota::UsageResponse;
use crate::version::ReleaseInfo;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Lifecycle
    /// Process started: records the running version, fetches usage, checks
    /// for a newer release, and starts both recurring timers.
    AppLaunched,
    /// The UI became visible: fetches usage and restarts the refresh timer.
    Appeared,

    // User actions
    RefreshTapped,
    RetryTapped,
    UpdateBannerTapped,
    QuitTapped,

    // Timers
    RefreshTimerTicked,
    BundleVersionCheckTicked,
    CopiedConfirmationDismissed,

    // Effect completions
    UsageResponse {
        generation: u64,
        result: Result<UsageResponse, UsageError>,
    },
    VersionCheckResponse(Result<ReleaseInfo, VersionError>),
    BundleVersionLoaded(Option<String>),

    /// Actions of the auth recovery sub-machine
    Auth(AuthAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    SignInTapped,
    SignInResponse(Result<(), SignInError>),
    Delegate(AuthDelegate),
}

/// Completion events the auth sub-machine reports to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDelegate {
    Authenticated,
}

impl Action {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AppLaunched => "AppLaunched",
            Action::Appeared => "Appeared",
            Action::RefreshTapped => "RefreshTapped",
            Action::RetryTapped => "RetryTapped",
            Action::UpdateBannerTapped => "UpdateBannerTapped",
            Action::QuitTapped => "QuitTapped",
            Action::RefreshTimerTicked => "RefreshTimerTicked",
            Action::BundleVersionCheckTicked => "BundleVersionCheckTicked",
            Action::CopiedConfirmationDismissed => "CopiedConfirmationDismissed",
            Action::UsageResponse { result: Ok(_), .. } => "UsageResponse.success",
            Action::UsageResponse { result: Err(_), .. } => "UsageResponse.failure",
            Action::VersionCheckResponse(Ok(_)) => "VersionCheckResponse.success",
            Action::VersionCheckResponse(Err(_)) => "VersionCheckResponse.failure",
            Action::BundleVersionLoaded(_) => "BundleVersionLoaded",
            Action::Auth(AuthAction::SignInTapped) => "Auth.SignInTapped",
            Action::Auth(AuthAction::SignInResponse(_)) => "Auth.SignInResponse",
            Action::Auth(AuthAction::Delegate(_)) => "Auth.Delegate.Authenticated",
        }
    }
}
