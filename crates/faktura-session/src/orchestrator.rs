//! Per-process session lifecycle orchestration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use faktura_core::config::session::SessionConfig;
use faktura_core::error::AppError;
use faktura_core::events::AuthStateEvent;
use faktura_core::traits::IdentityProvider;
use faktura_core::types::id::{AccountId, SessionId};

use crate::admission::{AdmissionController, AdmissionDecision};
use crate::heartbeat::{HeartbeatEmitter, HeartbeatHandle};
use crate::store::SessionStore;

/// Lifecycle states of one client process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No authenticated session.
    Unauthenticated,
    /// A sign-in event is being resolved into a seat.
    Admitting,
    /// A seat is held and the heartbeat is running.
    Active,
}

/// The seat currently held by this process.
struct ActiveSession {
    /// The admitted session id, kept only in process memory.
    session_id: SessionId,
    /// The account holding the seat.
    account_id: AccountId,
    /// Running heartbeat for the session.
    heartbeat: HeartbeatHandle,
}

/// Binds identity-provider events to admission, heartbeat, and teardown.
///
/// One instance exists per client process and exclusively owns that
/// process's mutable session state (the cached session id and the heartbeat
/// handle), so lifetime and cancellation are explicit rather than ambient.
pub struct SessionLifecycleOrchestrator {
    /// Admission decisions.
    admission: Arc<AdmissionController>,
    /// Session persistence, for logout/teardown deletes.
    store: Arc<dyn SessionStore>,
    /// External identity provider, driven on forced sign-out.
    identity: Arc<dyn IdentityProvider>,
    /// Session configuration.
    config: SessionConfig,
    /// The seat held by this process, if any.
    active: Option<ActiveSession>,
    /// Current lifecycle state.
    state: SessionState,
}

impl std::fmt::Debug for SessionLifecycleOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycleOrchestrator")
            .field("state", &self.state)
            .field("session_id", &self.active.as_ref().map(|a| a.session_id))
            .finish()
    }
}

impl SessionLifecycleOrchestrator {
    /// Creates a new orchestrator in the `Unauthenticated` state.
    pub fn new(
        admission: Arc<AdmissionController>,
        store: Arc<dyn SessionStore>,
        identity: Arc<dyn IdentityProvider>,
        config: SessionConfig,
    ) -> Self {
        Self {
            admission,
            store,
            identity,
            config,
            active: None,
            state: SessionState::Unauthenticated,
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The session id held by this process, if a seat is active.
    pub fn current_session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|active| active.session_id)
    }

    /// Consumes identity-provider events until the channel closes.
    ///
    /// Event handling failures (rejected admissions, store outages) are
    /// logged here; callers that need the failure itself use
    /// [`handle_event`](Self::handle_event) directly.
    pub async fn run(mut self, mut events: mpsc::Receiver<AuthStateEvent>) {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle_event(event).await {
                warn!(error = %e, "Auth event handling failed");
            }
        }
    }

    /// Dispatches one identity-provider event.
    pub async fn handle_event(&mut self, event: AuthStateEvent) -> Result<(), AppError> {
        match event {
            AuthStateEvent::SignedIn {
                account_id,
                device_descriptor,
            } => self
                .on_signed_in(account_id, &device_descriptor)
                .await
                .map(|_| ()),
            AuthStateEvent::SignedOut => {
                self.on_signed_out().await;
                Ok(())
            }
            AuthStateEvent::Unloaded => {
                self.on_unloaded();
                Ok(())
            }
        }
    }

    /// Resolves a sign-in into a seat.
    ///
    /// On admission the session id is cached, the heartbeat starts, and the
    /// state becomes `Active`. On rejection — or any store failure during
    /// the admission sequence — the identity provider is signed out again
    /// and the error is surfaced to the caller.
    ///
    /// A sign-in arriving while a session is already active tears the old
    /// session down first, so one process never holds two seats.
    pub async fn on_signed_in(
        &mut self,
        account_id: AccountId,
        device_descriptor: &str,
    ) -> Result<SessionId, AppError> {
        if self.active.is_some() {
            self.on_signed_out().await;
        }

        self.state = SessionState::Admitting;

        let decision = self.admission.admit(account_id, device_descriptor).await;

        match decision {
            Ok(AdmissionDecision::Admitted { session_id }) => {
                let heartbeat = HeartbeatEmitter::spawn(
                    Arc::clone(&self.store),
                    session_id,
                    account_id,
                    self.config.heartbeat_interval(),
                );

                self.active = Some(ActiveSession {
                    session_id,
                    account_id,
                    heartbeat,
                });
                self.state = SessionState::Active;

                info!(
                    account_id = %account_id,
                    session_id = %session_id,
                    "Session active"
                );

                Ok(session_id)
            }
            Ok(AdmissionDecision::Rejected { reason }) => {
                self.force_sign_out().await;
                self.state = SessionState::Unauthenticated;
                Err(AppError::admission_rejected(reason))
            }
            Err(e) => {
                self.force_sign_out().await;
                self.state = SessionState::Unauthenticated;
                Err(e)
            }
        }
    }

    /// Handles an explicit sign-out: stops the heartbeat, removes the
    /// session record, and clears the cached state.
    ///
    /// A failed delete is logged and swallowed; the orphaned record is
    /// reaped once its liveness expires.
    pub async fn on_signed_out(&mut self) {
        if let Some(active) = self.active.take() {
            active.heartbeat.stop();

            if let Err(e) = self
                .store
                .delete(active.session_id, active.account_id)
                .await
            {
                warn!(
                    session_id = %active.session_id,
                    error = %e,
                    "Failed to delete session on sign-out"
                );
            } else {
                info!(session_id = %active.session_id, "Session signed out");
            }
        }

        self.state = SessionState::Unauthenticated;
    }

    /// Handles process teardown (page close, app shutdown).
    ///
    /// The delete is dispatched on a detached task and never awaited, so it
    /// can still land while the process is going away. If it is lost, the
    /// record is reaped once its liveness expires.
    pub fn on_unloaded(&mut self) {
        if let Some(active) = self.active.take() {
            active.heartbeat.stop();

            let store = Arc::clone(&self.store);
            let session_id = active.session_id;
            let account_id = active.account_id;

            tokio::spawn(async move {
                if let Err(e) = store.delete(session_id, account_id).await {
                    warn!(
                        session_id = %session_id,
                        error = %e,
                        "Best-effort teardown delete failed"
                    );
                }
            });

            info!(session_id = %session_id, "Session teardown dispatched");
        }

        self.state = SessionState::Unauthenticated;
    }

    /// Forces the identity provider to sign out after a denied admission.
    async fn force_sign_out(&self) {
        if let Err(e) = self.identity.sign_out().await {
            error!(error = %e, "Forced sign-out failed after admission denial");
        }
    }
}
