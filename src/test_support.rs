//! Mock ports and fixtures shared by the unit tests.

use crate::errors::{CredentialError, FetchError, SignInError, VersionError};
use crate::ports::{
    Clock, CredentialSource, Dependencies, ProcessControl, SignInFlow, Timings, UsageApi,
    VersionSource,
};
use crate::quota::UsageResponse;
use crate::version::ReleaseInfo;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub mod fixtures {
    use super::*;
    use crate::quota::{QuotaSnapshot, QuotaSnapshots};
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    fn snapshot(remaining: i64, percent_remaining: f64) -> QuotaSnapshot {
        QuotaSnapshot {
            entitlement: 300,
            overage_count: (-remaining).max(0),
            overage_permitted: remaining < 0,
            percent_remaining,
            quota_remaining: remaining as f64,
            remaining,
            unlimited: false,
        }
    }

    /// 15% used
    pub fn low_usage() -> QuotaSnapshot {
        snapshot(255, 85.0)
    }

    /// 65% used
    pub fn medium_usage() -> QuotaSnapshot {
        snapshot(105, 35.0)
    }

    /// 90% used
    pub fn high_usage() -> QuotaSnapshot {
        snapshot(30, 10.0)
    }

    /// 154.099% used, 162 units over
    pub fn over_limit() -> QuotaSnapshot {
        snapshot(-162, -54.099)
    }

    pub fn response(reset_date: Option<&str>, usage: QuotaSnapshot) -> UsageResponse {
        UsageResponse {
            login: Some("testuser".to_string()),
            plan: Some("enterprise".to_string()),
            reset_date: reset_date.map(String::from),
            quota_snapshots: Some(QuotaSnapshots {
                premium_interactions: Some(usage),
            }),
        }
    }

    pub fn release(tag: &str) -> ReleaseInfo {
        ReleaseInfo {
            tag: tag.to_string(),
            url: format!("https://github.com/example/quotabar/releases/tag/{}", tag),
        }
    }

    /// 1970-01-12, long before any reset date used in tests.
    pub fn fixed_date() -> DateTime<FixedOffset> {
        utc().timestamp_opt(1_000_000, 0).unwrap()
    }

    /// Midnight UTC on `date` (`YYYY-MM-DD`).
    pub fn date(date: &str) -> DateTime<FixedOffset> {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        utc()
            .from_local_datetime(&day.and_time(NaiveTime::MIN))
            .unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }
}

pub struct MockCredentials {
    pub token: Mutex<Result<String, CredentialError>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl CredentialSource for MockCredentials {
    async fn read_token(&self) -> Result<String, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token.lock().unwrap().clone()
    }
}

/// Usage API returning scripted replies in order, then `fallback` forever.
pub struct MockApi {
    pub script: Mutex<VecDeque<(Duration, Result<UsageResponse, FetchError>)>>,
    pub fallback: Mutex<Result<UsageResponse, FetchError>>,
    pub calls: AtomicUsize,
}

impl MockApi {
    pub fn push(&self, delay: Duration, result: Result<UsageResponse, FetchError>) {
        self.script.lock().unwrap().push_back((delay, result));
    }
}

#[async_trait]
impl UsageApi for MockApi {
    async fn fetch_usage(&self, _token: &str) -> Result<UsageResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => self.fallback.lock().unwrap().clone(),
        }
    }
}

pub struct MockVersions {
    pub current: String,
    pub latest: Mutex<Result<ReleaseInfo, VersionError>>,
    pub on_disk: Mutex<Option<String>>,
    pub release_calls: AtomicUsize,
    /// Completed copies; each takes `copy_delay`.
    pub copy_calls: AtomicUsize,
    pub copy_delay: Mutex<Duration>,
}

#[async_trait]
impl VersionSource for MockVersions {
    fn current_version(&self) -> String {
        self.current.clone()
    }

    async fn fetch_latest_release(&self) -> Result<ReleaseInfo, VersionError> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        self.latest.lock().unwrap().clone()
    }

    async fn on_disk_version(&self) -> Option<String> {
        self.on_disk.lock().unwrap().clone()
    }

    async fn copy_update_command(&self) {
        let delay = *self.copy_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        self.copy_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockProcess {
    pub terminate_calls: AtomicUsize,
    pub relaunch_calls: AtomicUsize,
}

impl ProcessControl for MockProcess {
    fn terminate(&self) {
        self.terminate_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn relaunch(&self) {
        self.relaunch_calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockSignIn {
    pub result: Mutex<Result<(), SignInError>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl SignInFlow for MockSignIn {
    async fn sign_in(&self) -> Result<(), SignInError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.lock().unwrap().clone()
    }
}

pub struct FixedClock(pub Mutex<DateTime<FixedOffset>>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.0.lock().unwrap()
    }
}

/// Handles to every mock behind a `Dependencies` value.
pub struct TestDeps {
    pub credentials: Arc<MockCredentials>,
    pub api: Arc<MockApi>,
    pub versions: Arc<MockVersions>,
    pub process: Arc<MockProcess>,
    pub sign_in: Arc<MockSignIn>,
    pub clock: Arc<FixedClock>,
}

impl Default for TestDeps {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDeps {
    /// Token present, API returning medium usage resetting 2026-03-01,
    /// running and installed version 1.4.0, latest release v1.4.0.
    pub fn new() -> Self {
        Self {
            credentials: Arc::new(MockCredentials {
                token: Mutex::new(Ok("mock-token".to_string())),
                calls: AtomicUsize::new(0),
            }),
            api: Arc::new(MockApi {
                script: Mutex::new(VecDeque::new()),
                fallback: Mutex::new(Ok(fixtures::response(
                    Some("2026-03-01"),
                    fixtures::medium_usage(),
                ))),
                calls: AtomicUsize::new(0),
            }),
            versions: Arc::new(MockVersions {
                current: "1.4.0".to_string(),
                latest: Mutex::new(Ok(fixtures::release("v1.4.0"))),
                on_disk: Mutex::new(Some("1.4.0".to_string())),
                release_calls: AtomicUsize::new(0),
                copy_calls: AtomicUsize::new(0),
                copy_delay: Mutex::new(Duration::ZERO),
            }),
            process: Arc::new(MockProcess::default()),
            sign_in: Arc::new(MockSignIn {
                result: Mutex::new(Ok(())),
                calls: AtomicUsize::new(0),
            }),
            clock: Arc::new(FixedClock(Mutex::new(fixtures::fixed_date()))),
        }
    }

    pub fn deps(&self) -> Dependencies {
        Dependencies {
            credentials: self.credentials.clone(),
            api: self.api.clone(),
            versions: self.versions.clone(),
            process: self.process.clone(),
            sign_in: self.sign_in.clone(),
            clock: self.clock.clone(),
            timings: Timings::default(),
        }
    }

    pub fn set_token(&self, token: Result<String, CredentialError>) {
        *self.credentials.token.lock().unwrap() = token;
    }

    pub fn set_usage(&self, result: Result<UsageResponse, FetchError>) {
        *self.api.fallback.lock().unwrap() = result;
    }

    pub fn set_now(&self, now: DateTime<FixedOffset>) {
        *self.clock.0.lock().unwrap() = now;
    }

    pub fn set_on_disk(&self, version: Option<&str>) {
        *self.versions.on_disk.lock().unwrap() = version.map(String::from);
    }

    pub fn set_copy_delay(&self, delay: Duration) {
        *self.versions.copy_delay.lock().unwrap() = delay;
    }

    pub fn set_latest(&self, result: Result<ReleaseInfo, VersionError>) {
        *self.versions.latest.lock().unwrap() = result;
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}
