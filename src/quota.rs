//! Quota data returned by the Copilot user endpoint.
//!
//! `QuotaSnapshot` mirrors the `premium_interactions` block of the API
//! payload and derives the figures the indicator draws: units used, the
//! normal fill fraction, and the overage overshoot.

use serde::{Deserialize, Serialize};

/// Top-level payload of `GET /copilot_internal/user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageResponse {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default, rename = "copilot_plan")]
    pub plan: Option<String>,
    /// Reset date in `YYYY-MM-DD` form.
    #[serde(default, rename = "quota_reset_date")]
    pub reset_date: Option<String>,
    #[serde(default)]
    pub quota_snapshots: Option<QuotaSnapshots>,
}

impl UsageResponse {
    /// The premium-interactions snapshot, if the account reports one.
    pub fn premium_interactions(&self) -> Option<&QuotaSnapshot> {
        self.quota_snapshots
            .as_ref()
            .and_then(|s| s.premium_interactions.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotaSnapshots {
    #[serde(default)]
    pub premium_interactions: Option<QuotaSnapshot>,
}

/// Quota figures for one metered resource in the current period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    /// Units granted per period.
    pub entitlement: i64,
    #[serde(default)]
    pub overage_count: i64,
    #[serde(default)]
    pub overage_permitted: bool,
    /// Percentage of the entitlement still available, as reported by the API.
    pub percent_remaining: f64,
    #[serde(default)]
    pub quota_remaining: f64,
    /// Units left; negative once the account is over its entitlement.
    pub remaining: i64,
    #[serde(default)]
    pub unlimited: bool,
}

/// Coarse usage level used to pick the indicator colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    /// Less than 60% of the entitlement used
    Normal,
    /// 60% up to 85%
    Elevated,
    /// 85% and above, still within the entitlement
    High,
    /// Consumption beyond the entitlement
    OverLimit,
}

impl QuotaSnapshot {
    pub fn used(&self) -> i64 {
        self.entitlement - self.remaining
    }

    /// Percentage of the entitlement consumed. Zero when there is no entitlement.
    pub fn percent_used(&self) -> f64 {
        if self.entitlement <= 0 {
            return 0.0;
        }
        100.0 - self.percent_remaining
    }

    pub fn is_over_limit(&self) -> bool {
        self.remaining < 0
    }

    pub fn overage_amount(&self) -> i64 {
        (-self.remaining).max(0)
    }

    /// Used fraction of the entitlement, capped at 1.0.
    pub fn normal_fraction(&self) -> f64 {
        if self.entitlement <= 0 {
            return 0.0;
        }
        let fraction = self.used() as f64 / self.entitlement as f64;
        fraction.clamp(0.0, 1.0)
    }

    /// Overshoot beyond the entitlement as a fraction of it (0.54 = 54% over).
    pub fn overage_fraction(&self) -> f64 {
        if self.entitlement <= 0 || !self.is_over_limit() {
            return 0.0;
        }
        self.overage_amount() as f64 / self.entitlement as f64
    }

    pub fn level(&self) -> UsageLevel {
        if self.is_over_limit() {
            return UsageLevel::OverLimit;
        }
        let fraction = self.normal_fraction();
        if fraction < 0.6 {
            UsageLevel::Normal
        } else if fraction < 0.85 {
            UsageLevel::Elevated
        } else {
            UsageLevel::High
        }
    }
}

#[cfg(test)]
#[path = "tests/quota_tests.rs"]
mod tests;
