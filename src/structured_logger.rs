//! Structured JSONL event log for reconstructing what the monitor did.
//!
//! Every processed action, the effects it produced, and a short summary of
//! the resulting state are written as one JSON object per line with:
//! - Monotonic sequence numbers for ordering
//! - ISO 8601 timestamps with microsecond precision
//! - A session ID per process launch for correlation

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::monitor::{Action, Effect, StateSnapshot};

pub const EVENT_LOG_FILE: &str = "events.jsonl";

pub struct StructuredLogger {
    session_id: String,
    seq: AtomicU64,
    log_file: Mutex<File>,
    log_path: PathBuf,
}

/// A single log entry in JSONL format.
#[derive(Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number (unique across the session)
    pub seq: u64,
    /// ISO 8601 timestamp with microseconds
    pub ts: String,
    pub session_id: String,
    /// Component that emitted the log
    pub component: String,
    /// Structured event data
    pub event: Value,
}

impl StructuredLogger {
    /// Creates a logger appending to `<logs_dir>/events.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs directory cannot be created or the log
    /// file cannot be opened.
    pub fn new(session_id: &str, logs_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(logs_dir)?;
        let log_path = logs_dir.join(EVENT_LOG_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            session_id: session_id.to_string(),
            seq: AtomicU64::new(0),
            log_file: Mutex::new(file),
            log_path,
        })
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Logs a structured event. Thread-safe; write failures are dropped.
    pub fn log(&self, component: &str, event: impl Serialize) {
        let entry = LogEntry {
            seq: self.next_seq(),
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            session_id: self.session_id.clone(),
            component: component.to_string(),
            event: serde_json::to_value(event).unwrap_or(Value::Null),
        };

        if let Ok(mut file) = self.log_file.lock() {
            if let Ok(line) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }
    }

    /// Logs an action as the store dequeues it.
    pub fn log_action(&self, action_seq: u64, action: &Action) {
        let mut event = serde_json::json!({
            "type": "Action",
            "action_seq": action_seq,
            "action": action.name(),
        });
        match action {
            Action::UsageResponse { generation, result } => {
                event["generation"] = (*generation).into();
                if let Err(e) = result {
                    event["error"] = e.to_string().into();
                }
            }
            Action::BundleVersionLoaded(version) => {
                event["version"] = version.clone().into();
            }
            _ => {}
        }
        self.log("Monitor", event);
    }

    /// Logs an effect the reducer requested.
    pub fn log_effect(&self, action_seq: u64, effect: &Effect) {
        let mut event = serde_json::json!({
            "type": "Effect",
            "action_seq": action_seq,
            "effect": effect.name(),
        });
        match effect {
            Effect::FetchUsage { generation } => {
                event["generation"] = (*generation).into();
            }
            Effect::ArmTimer { id, schedule, .. } => {
                event["timer"] = format!("{:?}", id).into();
                event["schedule"] = format!("{:?}", schedule).into();
            }
            Effect::CancelTimer(id) => {
                event["timer"] = format!("{:?}", id).into();
            }
            Effect::Send(action) => {
                event["action"] = action.name().into();
            }
            _ => {}
        }
        self.log("Monitor", event);
    }

    /// Logs the user-visible outcome of an action.
    pub fn log_snapshot(&self, action_seq: u64, snapshot: &StateSnapshot) {
        self.log(
            "Monitor",
            serde_json::json!({
                "type": "Snapshot",
                "action_seq": action_seq,
                "percent_used": snapshot.usage.as_ref().map(|u| u.percent_used()),
                "reserve": snapshot.pace_reserve.map(|p| p.reserve),
                "is_loading": snapshot.is_loading,
                "needs_auth": snapshot.needs_auth,
                "error": snapshot.error,
                "available_update": snapshot.available_update,
            }),
        );
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[cfg(test)]
#[path = "tests/structured_logger_tests.rs"]
mod tests;
