//! Effects requested by the reducer and carried out by the store.

use super::actions::Action;
use std::time::Duration;

/// Named timers. Arming a name cancels whatever was armed under it before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    UsageRefresh,
    BundleVersionCheck,
    CopiedConfirmation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Fires once after the delay.
    Once(Duration),
    /// Fires every period, first one full period after arming.
    Every(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the token and fetch usage; the completion is tagged with
    /// `generation` and supersedes any fetch still in flight.
    FetchUsage { generation: u64 },
    CheckLatestRelease,
    CopyUpdateCommand,
    ReadBundleVersion,
    Relaunch,
    Terminate,
    RunSignIn,
    ArmTimer {
        id: TimerId,
        schedule: Schedule,
        action: Action,
    },
    CancelTimer(TimerId),
    /// Enqueue an action behind the one being processed.
    Send(Action),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::FetchUsage { .. } => "FetchUsage",
            Effect::CheckLatestRelease => "CheckLatestRelease",
            Effect::CopyUpdateCommand => "CopyUpdateCommand",
            Effect::ReadBundleVersion => "ReadBundleVersion",
            Effect::Relaunch => "Relaunch",
            Effect::Terminate => "Terminate",
            Effect::RunSignIn => "RunSignIn",
            Effect::ArmTimer { .. } => "ArmTimer",
            Effect::CancelTimer(_) => "CancelTimer",
            Effect::Send(_) => "Send",
        }
    }
}
