//! Runtime that owns the monitor state and runs the reducer's effects.
//!
//! Actions are applied strictly one at a time. Effects run as spawned tasks
//! and report back by enqueuing actions, so effect completions are applied
//! in the order they arrive. After every action a snapshot is broadcast on
//! a watch channel.

mod timers;

pub use timers::TimerRegistry;

use crate::errors::UsageError;
use crate::monitor::{self, Action, AuthAction, Effect, MonitorState, StateSnapshot};
use crate::ports::Dependencies;
use crate::quota::UsageResponse;
use crate::structured_logger::StructuredLogger;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Cloneable sender for feeding actions into a running store.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<Action>,
}

impl StoreHandle {
    /// Returns false once the store is gone.
    pub fn send(&self, action: Action) -> bool {
        self.tx.send(action).is_ok()
    }
}

pub struct Store {
    state: MonitorState,
    deps: Dependencies,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Action>,
    snapshot_tx: watch::Sender<StateSnapshot>,
    timers: TimerRegistry,
    /// The usage fetch in flight, aborted when a newer one starts
    usage_fetch: Option<JoinHandle<()>>,
    logger: Option<Arc<StructuredLogger>>,
    seq: u64,
    terminated: bool,
}

impl Store {
    /// Creates a store and the receiver renderers watch for snapshots.
    pub fn new(
        initial_state: MonitorState,
        deps: Dependencies,
    ) -> (Self, watch::Receiver<StateSnapshot>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(StateSnapshot::from(&initial_state));

        let store = Self {
            state: initial_state,
            deps,
            tx,
            rx,
            snapshot_tx,
            timers: TimerRegistry::new(),
            usage_fetch: None,
            logger: None,
            seq: 0,
            terminated: false,
        };

        (store, snapshot_rx)
    }

    pub fn with_logger(mut self, logger: Arc<StructuredLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Applies one action now and starts the effects it produced.
    pub fn send(&mut self, action: Action) {
        if self.terminated {
            tracing::debug!(action = action.name(), "Store terminated, dropping action");
            return;
        }
        self.seq += 1;
        tracing::debug!(seq = self.seq, action = action.name(), "Applying action");
        if let Some(logger) = &self.logger {
            logger.log_action(self.seq, &action);
        }

        let effects = monitor::reduce(&mut self.state, action, &self.deps);

        let snapshot = StateSnapshot::from(&self.state);
        if let Some(logger) = &self.logger {
            for effect in &effects {
                logger.log_effect(self.seq, effect);
            }
            logger.log_snapshot(self.seq, &snapshot);
        }
        let _ = self.snapshot_tx.send(snapshot);

        for effect in effects {
            self.execute(effect);
        }
    }

    /// Waits for the next queued action, applies it, and returns it.
    pub async fn next(&mut self) -> Option<Action> {
        let action = self.rx.recv().await?;
        self.send(action.clone());
        Some(action)
    }

    /// Processes queued actions until the store is terminated.
    pub async fn run(&mut self) {
        while !self.terminated {
            if self.next().await.is_none() {
                break;
            }
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::FetchUsage { generation } => {
                if let Some(previous) = self.usage_fetch.take() {
                    previous.abort();
                }
                let deps = self.deps.clone();
                let tx = self.tx.clone();
                self.usage_fetch = Some(tokio::spawn(async move {
                    let result = fetch_usage(&deps).await;
                    let _ = tx.send(Action::UsageResponse { generation, result });
                }));
            }

            Effect::CheckLatestRelease => {
                let versions = self.deps.versions.clone();
                self.spawn(async move {
                    Action::VersionCheckResponse(versions.fetch_latest_release().await)
                });
            }

            Effect::ReadBundleVersion => {
                let versions = self.deps.versions.clone();
                self.spawn(
                    async move { Action::BundleVersionLoaded(versions.on_disk_version().await) },
                );
            }

            Effect::RunSignIn => {
                let sign_in = self.deps.sign_in.clone();
                self.spawn(async move {
                    Action::Auth(AuthAction::SignInResponse(sign_in.sign_in().await))
                });
            }

            // No completion action; the confirmation timer runs independently.
            Effect::CopyUpdateCommand => {
                let versions = self.deps.versions.clone();
                tokio::spawn(async move { versions.copy_update_command().await });
            }

            Effect::Relaunch => self.deps.process.relaunch(),

            Effect::Terminate => {
                self.timers.cancel_all();
                if let Some(fetch) = self.usage_fetch.take() {
                    fetch.abort();
                }
                self.terminated = true;
                self.deps.process.terminate();
            }

            Effect::ArmTimer {
                id,
                schedule,
                action,
            } => self.timers.arm(id, schedule, action, self.tx.clone()),

            Effect::CancelTimer(id) => {
                self.timers.cancel(id);
            }

            Effect::Send(action) => {
                let _ = self.tx.send(action);
            }
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = Action> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }
}

async fn fetch_usage(deps: &Dependencies) -> Result<UsageResponse, UsageError> {
    let token = deps.credentials.read_token().await?;
    Ok(deps.api.fetch_usage(&token).await?)
}
