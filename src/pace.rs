//! Pace reserve: how far quota consumption is ahead of or behind the calendar.
//!
//! The quota period runs from one month before the reset date up to the
//! reset date, both at local midnight in the timezone of `now`. The reserve
//! is the percentage of the period already elapsed minus the percentage of
//! quota already used, so a positive reserve means usage is under pace.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, TimeZone};

/// Wire format of the API's `quota_reset_date`.
pub const RESET_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaceReserve {
    /// Share of the quota period already elapsed, 0-100
    pub percent_time_elapsed: f64,
    /// `percent_time_elapsed - percent_used`
    pub reserve: f64,
}

impl PaceReserve {
    pub fn new(percent_time_elapsed: f64, reserve: f64) -> Self {
        Self {
            percent_time_elapsed,
            reserve,
        }
    }

    pub fn is_under_pace(&self) -> bool {
        self.reserve >= 0.0
    }

    pub fn absolute_reserve(&self) -> f64 {
        self.reserve.abs()
    }

    /// Computes the pace reserve for `percent_used` at `now`.
    ///
    /// Returns `None` when `reset_date` is not a `YYYY-MM-DD` date or when
    /// local midnight does not exist for one of the period boundaries.
    pub fn calculate<Tz: TimeZone>(
        percent_used: f64,
        reset_date: &str,
        now: &DateTime<Tz>,
    ) -> Option<Self> {
        let reset_day = NaiveDate::parse_from_str(reset_date.trim(), RESET_DATE_FORMAT).ok()?;
        let start_day = period_start(reset_day)?;

        let tz = now.timezone();
        let reset_at = local_midnight(&tz, reset_day)?;
        let start_at = local_midnight(&tz, start_day)?;

        let total_ms = reset_at.signed_duration_since(start_at.clone()).num_milliseconds();
        let elapsed_ms = now.clone().signed_duration_since(start_at).num_milliseconds();

        let percent_time_elapsed = if total_ms <= 0 {
            0.0
        } else {
            (elapsed_ms as f64 / total_ms as f64 * 100.0).clamp(0.0, 100.0)
        };

        Some(Self::new(
            percent_time_elapsed,
            percent_time_elapsed - percent_used,
        ))
    }
}

/// First day of the period ending on `reset_day`: the same day-of-month one
/// month earlier, clamped to the last day of a shorter month (Mar 31 -> Feb 28).
pub fn period_start(reset_day: NaiveDate) -> Option<NaiveDate> {
    reset_day.checked_sub_months(Months::new(1))
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
}

#[cfg(test)]
#[path = "tests/pace_tests.rs"]
mod tests;
