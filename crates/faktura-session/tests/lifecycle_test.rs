//! Orchestrator state machine and heartbeat scenarios.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use faktura_core::error::{AppError, ErrorKind};
use faktura_core::events::AuthStateEvent;
use faktura_core::types::id::{AccountId, SessionId};
use faktura_entity::session::SessionRecord;
use faktura_session::heartbeat::HeartbeatEmitter;
use faktura_session::orchestrator::{SessionLifecycleOrchestrator, SessionState};
use faktura_session::store::{MemorySessionStore, SessionStore};

use common::{OfflineStore, StubIdentityProvider, harness, idle_record, license};

fn orchestrator(
    h: &common::TestHarness,
    identity: Arc<StubIdentityProvider>,
) -> SessionLifecycleOrchestrator {
    SessionLifecycleOrchestrator::new(
        Arc::clone(&h.controller),
        h.store.clone(),
        identity,
        h.session_config.clone(),
    )
}

#[tokio::test]
async fn test_sign_in_activates_session() {
    let h = harness();
    let identity = Arc::new(StubIdentityProvider::default());
    let mut orch = orchestrator(&h, Arc::clone(&identity));
    let account_id = AccountId::new();

    assert_eq!(orch.state(), SessionState::Unauthenticated);

    let session_id = orch
        .on_signed_in(account_id, "Chrome on macOS")
        .await
        .expect("admission should succeed");

    assert_eq!(orch.state(), SessionState::Active);
    assert_eq!(orch.current_session(), Some(session_id));
    assert_eq!(h.store.count_active(account_id).await.unwrap(), 1);
    assert_eq!(identity.sign_out_count(), 0);
}

#[tokio::test]
async fn test_rejected_sign_in_forces_identity_sign_out() {
    let h = harness();
    let identity = Arc::new(StubIdentityProvider::default());
    let mut orch = orchestrator(&h, Arc::clone(&identity));
    let account_id = AccountId::new();
    h.licenses.upsert(license(account_id, Some(1))).await;

    // Another device already holds the only seat.
    h.controller
        .admit(account_id, "Device A")
        .await
        .expect("first admission");

    let err = orch
        .on_signed_in(account_id, "Device B")
        .await
        .expect_err("second sign-in must be rejected");

    assert_eq!(err.kind, ErrorKind::AdmissionRejected);
    assert!(err.message.contains("Maximum 1 simultaneous login(s)"));
    assert_eq!(identity.sign_out_count(), 1);
    assert_eq!(orch.state(), SessionState::Unauthenticated);
    assert_eq!(orch.current_session(), None);
    assert_eq!(h.store.count_active(account_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_sign_out_removes_the_session_record() {
    let h = harness();
    let identity = Arc::new(StubIdentityProvider::default());
    let mut orch = orchestrator(&h, Arc::clone(&identity));
    let account_id = AccountId::new();

    orch.on_signed_in(account_id, "Device A").await.unwrap();
    orch.handle_event(AuthStateEvent::SignedOut).await.unwrap();

    assert_eq!(orch.state(), SessionState::Unauthenticated);
    assert_eq!(orch.current_session(), None);
    assert_eq!(h.store.count_active(account_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_repeat_sign_in_replaces_previous_session() {
    let h = harness();
    let identity = Arc::new(StubIdentityProvider::default());
    let mut orch = orchestrator(&h, Arc::clone(&identity));
    let account_id = AccountId::new();

    let first = orch.on_signed_in(account_id, "Device A").await.unwrap();
    let second = orch.on_signed_in(account_id, "Device A").await.unwrap();

    assert_ne!(first, second);
    assert_eq!(orch.current_session(), Some(second));
    assert_eq!(h.store.count_active(account_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_unload_dispatches_best_effort_delete() {
    let h = harness();
    let identity = Arc::new(StubIdentityProvider::default());
    let mut orch = orchestrator(&h, Arc::clone(&identity));
    let account_id = AccountId::new();

    orch.on_signed_in(account_id, "Device A").await.unwrap();
    orch.handle_event(AuthStateEvent::Unloaded).await.unwrap();

    assert_eq!(orch.state(), SessionState::Unauthenticated);

    // The delete runs on a detached task; give it a few polls to land.
    let mut count = h.store.count_active(account_id).await.unwrap();
    for _ in 0..100 {
        if count == 0 {
            break;
        }
        tokio::task::yield_now().await;
        count = h.store.count_active(account_id).await.unwrap();
    }
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_event_loop_drives_the_state_machine() {
    let h = harness();
    let identity = Arc::new(StubIdentityProvider::default());
    let orch = orchestrator(&h, Arc::clone(&identity));
    let account_id = AccountId::new();

    let (tx, rx) = mpsc::channel(8);
    let runner = tokio::spawn(orch.run(rx));

    tx.send(AuthStateEvent::SignedIn {
        account_id,
        device_descriptor: "Edge on Windows".to_string(),
    })
    .await
    .unwrap();
    tx.send(AuthStateEvent::SignedOut).await.unwrap();
    drop(tx);

    runner.await.unwrap();
    assert_eq!(h.store.count_active(account_id).await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_refreshes_last_activity() {
    let store = Arc::new(MemorySessionStore::new());
    let account_id = AccountId::new();

    let record = idle_record(account_id, 10);
    let stale_activity = record.last_activity;
    store.insert(&record).await.unwrap();

    let handle = HeartbeatEmitter::spawn(
        store.clone(),
        record.session_id,
        account_id,
        Duration::from_secs(60),
    );

    // First tick fires immediately once the task is polled.
    tokio::task::yield_now().await;
    let after_first = store.sessions_for_account(account_id).await.unwrap()[0].last_activity;
    assert!(after_first > stale_activity);

    tokio::time::advance(Duration::from_secs(61)).await;
    tokio::task::yield_now().await;
    let after_second = store.sessions_for_account(account_id).await.unwrap()[0].last_activity;
    assert!(after_second >= after_first);

    handle.stop();
    tokio::task::yield_now().await;

    tokio::time::advance(Duration::from_secs(180)).await;
    tokio::task::yield_now().await;
    let after_stop = store.sessions_for_account(account_id).await.unwrap()[0].last_activity;
    assert_eq!(after_stop, after_second);
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_survives_store_failures() {
    let store: Arc<dyn SessionStore> = Arc::new(OfflineStore);
    let handle = HeartbeatEmitter::spawn(
        store,
        SessionId::new(),
        AccountId::new(),
        Duration::from_secs(60),
    );

    // Every tick fails; the loop logs and keeps going.
    tokio::time::advance(Duration::from_secs(181)).await;
    tokio::task::yield_now().await;

    assert!(!handle.is_finished());
    handle.stop();
}

/// Store that admits normally but loses its backend before deletes land.
#[derive(Debug)]
struct DeleteFailsStore {
    inner: MemorySessionStore,
}

#[async_trait]
impl SessionStore for DeleteFailsStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), AppError> {
        self.inner.insert(record).await
    }

    async fn update_activity(
        &self,
        session_id: SessionId,
        account_id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.inner.update_activity(session_id, account_id, at).await
    }

    async fn delete(
        &self,
        _session_id: SessionId,
        _account_id: AccountId,
    ) -> Result<(), AppError> {
        Err(AppError::store_unavailable("backing store offline"))
    }

    async fn count_active(&self, account_id: AccountId) -> Result<u32, AppError> {
        self.inner.count_active(account_id).await
    }

    async fn reap_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        self.inner.reap_older_than(cutoff).await
    }

    async fn sessions_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<SessionRecord>, AppError> {
        self.inner.sessions_for_account(account_id).await
    }
}

#[tokio::test]
async fn test_sign_out_swallows_delete_failures() {
    use faktura_core::config::license::LicenseConfig;
    use faktura_core::config::session::SessionConfig;
    use faktura_session::admission::AdmissionController;
    use faktura_session::license::{LicenseDirectory, LicenseRegistry, MemoryLicenseDirectory};
    use faktura_session::reaper::Reaper;

    let store: Arc<dyn SessionStore> = Arc::new(DeleteFailsStore {
        inner: MemorySessionStore::new(),
    });
    let identity = Arc::new(StubIdentityProvider::default());
    let registry = Arc::new(LicenseRegistry::new(
        Arc::new(MemoryLicenseDirectory::new()) as Arc<dyn LicenseDirectory>,
        LicenseConfig::default(),
    ));
    let reaper = Arc::new(Reaper::new(Arc::clone(&store), &SessionConfig::default()));
    let controller = Arc::new(AdmissionController::new(
        registry,
        reaper,
        Arc::clone(&store),
    ));
    let mut orch = SessionLifecycleOrchestrator::new(
        controller,
        store,
        identity,
        SessionConfig::default(),
    );

    orch.on_signed_in(AccountId::new(), "Device A").await.unwrap();
    orch.handle_event(AuthStateEvent::SignedOut)
        .await
        .expect("sign-out is fail-open on delete errors");
    assert_eq!(orch.state(), SessionState::Unauthenticated);
    assert_eq!(orch.current_session(), None);
}
