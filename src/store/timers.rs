//! Named, cancellable timers that feed actions back into the store.

use crate::monitor::{Action, Schedule, TimerId};
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Default)]
pub struct TimerRegistry {
    timers: HashMap<TimerId, JoinHandle<()>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `id`, replacing any timer already running under that name.
    pub fn arm(
        &mut self,
        id: TimerId,
        schedule: Schedule,
        action: Action,
        tx: UnboundedSender<Action>,
    ) {
        self.cancel(id);

        let handle = match schedule {
            Schedule::Once(delay) => tokio::spawn(async move {
                time::sleep(delay).await;
                let _ = tx.send(action);
            }),
            Schedule::Every(period) => tokio::spawn(async move {
                let mut interval = time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    if tx.send(action.clone()).is_err() {
                        break;
                    }
                }
            }),
        };

        tracing::debug!(timer = ?id, ?schedule, "Timer armed");
        self.timers.insert(id, handle);
    }

    /// Returns true if a timer was running under `id`.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.remove(&id) {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                was_running
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.get(&id).is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
