//! One-line text rendering of a monitor snapshot.

use crate::monitor::{AuthPhase, StateSnapshot};
use crate::pace::PaceReserve;
use crate::quota::{QuotaSnapshot, UsageLevel};

const BAR_WIDTH: usize = 12;

/// Fixed-width usage bar. Over the limit the bar is full and an overshoot
/// of up to one more bar width is drawn with `!`.
pub fn usage_bar(usage: &QuotaSnapshot) -> String {
    let cells = |fraction: f64| ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);

    if usage.is_over_limit() {
        let overshoot = cells(usage.overage_fraction().min(1.0));
        return format!("[{}{}]", "#".repeat(BAR_WIDTH), "!".repeat(overshoot));
    }
    let filled = cells(usage.normal_fraction());
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn level_label(level: UsageLevel) -> &'static str {
    match level {
        UsageLevel::Normal => "ok",
        UsageLevel::Elevated => "elevated",
        UsageLevel::High => "high",
        UsageLevel::OverLimit => "over limit",
    }
}

pub fn pace_label(pace: &PaceReserve) -> String {
    if pace.is_under_pace() {
        format!("{:.1}% in reserve", pace.absolute_reserve())
    } else {
        format!("{:.1}% over pace", pace.absolute_reserve())
    }
}

/// Renders `snapshot`; `show_percentage` adds the used percentage after the bar.
pub fn format_status(snapshot: &StateSnapshot, show_percentage: bool) -> String {
    let mut parts = Vec::new();

    match &snapshot.usage {
        Some(usage) if usage.unlimited => parts.push("unlimited".to_string()),
        Some(usage) => {
            let mut usage_part = usage_bar(usage);
            if show_percentage {
                usage_part.push_str(&format!(" {:.0}%", usage.percent_used()));
            }
            if usage.is_over_limit() {
                usage_part.push_str(&format!(" (+{} over)", usage.overage_amount()));
            } else {
                usage_part.push_str(&format!(" {}/{}", usage.used(), usage.entitlement));
            }
            usage_part.push_str(&format!(" {}", level_label(usage.level())));
            parts.push(usage_part);
        }
        None if snapshot.is_loading => parts.push("loading...".to_string()),
        None => parts.push("no usage data".to_string()),
    }

    if let Some(pace) = &snapshot.pace_reserve {
        parts.push(pace_label(pace));
    }
    if let Some(reset_date) = &snapshot.reset_date {
        parts.push(format!("resets {}", reset_date));
    }

    if snapshot.needs_auth {
        let auth = match snapshot.auth.as_ref().map(|a| &a.phase) {
            Some(AuthPhase::InProgress) => "signing in...".to_string(),
            Some(AuthPhase::Failure) => snapshot
                .auth
                .as_ref()
                .and_then(|a| a.error.clone())
                .unwrap_or_else(|| "sign-in failed".to_string()),
            _ => "sign in required".to_string(),
        };
        parts.push(auth);
    }
    if let Some(error) = &snapshot.error {
        parts.push(format!("error: {}", error));
    }

    if snapshot.show_copied_confirmation {
        parts.push("update command copied".to_string());
    } else if let Some(latest) = &snapshot.available_update {
        parts.push(format!("update {} available", latest));
    }

    parts.join(" | ")
}
