//! Session liveness heartbeat.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{info, trace, warn};

use faktura_core::types::id::{AccountId, SessionId};

use crate::store::SessionStore;

/// Periodically renews liveness for one admitted session.
///
/// A missed tick is not fatal: the session self-heals on the next
/// successful tick, or is eventually reaped if ticks stop entirely.
#[derive(Clone)]
pub struct HeartbeatEmitter {
    /// Session persistence.
    store: Arc<dyn SessionStore>,
    /// The session whose liveness is renewed.
    session_id: SessionId,
    /// The account holding the session.
    account_id: AccountId,
    /// Tick interval.
    interval: Duration,
}

impl std::fmt::Debug for HeartbeatEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatEmitter")
            .field("session_id", &self.session_id)
            .field("interval", &self.interval)
            .finish()
    }
}

impl HeartbeatEmitter {
    /// Creates a new heartbeat emitter.
    pub fn new(
        store: Arc<dyn SessionStore>,
        session_id: SessionId,
        account_id: AccountId,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            session_id,
            account_id,
            interval,
        }
    }

    /// Runs the heartbeat loop until the token is cancelled.
    pub async fn run(&self, cancel: watch::Receiver<bool>) {
        info!(
            session_id = %self.session_id,
            interval_seconds = self.interval.as_secs(),
            "Heartbeat started"
        );

        let mut interval = time::interval(self.interval);
        let mut cancel = cancel;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let result = self
                        .store
                        .update_activity(self.session_id, self.account_id, Utc::now())
                        .await;

                    match result {
                        Ok(()) => {
                            trace!(session_id = %self.session_id, "Heartbeat tick");
                        }
                        Err(e) => {
                            warn!(
                                session_id = %self.session_id,
                                error = %e,
                                "Heartbeat tick failed"
                            );
                        }
                    }
                }
                changed = cancel.changed() => {
                    // A dropped sender counts as cancellation.
                    if changed.is_err() || *cancel.borrow() {
                        info!(session_id = %self.session_id, "Heartbeat stopped");
                        break;
                    }
                }
            }
        }
    }

    /// Spawns the heartbeat loop on the current runtime and returns a
    /// handle owning its cancellation token.
    pub fn spawn(
        store: Arc<dyn SessionStore>,
        session_id: SessionId,
        account_id: AccountId,
        interval: Duration,
    ) -> HeartbeatHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let emitter = Self::new(store, session_id, account_id, interval);

        let task = tokio::spawn(async move {
            emitter.run(cancel_rx).await;
        });

        HeartbeatHandle { cancel_tx, task }
    }
}

/// Handle to a spawned heartbeat loop.
///
/// Owned by the lifecycle orchestrator for exactly one session; stopping it
/// ends the loop. A tick already dispatched before cancellation is not
/// aborted and may still land.
#[derive(Debug)]
pub struct HeartbeatHandle {
    /// Cancellation signal for the loop.
    cancel_tx: watch::Sender<bool>,
    /// The spawned loop task.
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    /// Signals the loop to stop at its next wakeup.
    pub fn stop(self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Whether the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
