//! Shared fixtures for session subsystem tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use faktura_core::config::license::LicenseConfig;
use faktura_core::config::session::SessionConfig;
use faktura_core::error::AppError;
use faktura_core::traits::identity::{AuthenticatedIdentity, Credentials, IdentityProvider};
use faktura_core::types::id::{AccountId, SessionId};
use faktura_entity::license::LicenseRecord;
use faktura_entity::session::SessionRecord;
use faktura_session::admission::AdmissionController;
use faktura_session::license::{LicenseDirectory, LicenseRegistry, MemoryLicenseDirectory};
use faktura_session::reaper::Reaper;
use faktura_session::store::{MemorySessionStore, SessionStore};

/// Wired-up subsystem over in-memory backends.
pub struct TestHarness {
    pub store: Arc<MemorySessionStore>,
    pub licenses: Arc<MemoryLicenseDirectory>,
    pub reaper: Arc<Reaper>,
    pub controller: Arc<AdmissionController>,
    pub session_config: SessionConfig,
}

/// Builds the subsystem with default configuration (5 min staleness,
/// 60 s heartbeat, default seat cap of 3).
pub fn harness() -> TestHarness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .try_init();

    let session_config = SessionConfig::default();
    let store = Arc::new(MemorySessionStore::new());
    let licenses = Arc::new(MemoryLicenseDirectory::new());

    let dyn_store: Arc<dyn SessionStore> = store.clone();
    let registry = Arc::new(LicenseRegistry::new(
        licenses.clone() as Arc<dyn LicenseDirectory>,
        LicenseConfig::default(),
    ));
    let reaper = Arc::new(Reaper::new(Arc::clone(&dyn_store), &session_config));
    let controller = Arc::new(AdmissionController::new(
        registry,
        Arc::clone(&reaper),
        dyn_store,
    ));

    TestHarness {
        store,
        licenses,
        reaper,
        controller,
        session_config,
    }
}

/// A license expiring in a year with the given seat cap.
pub fn license(account_id: AccountId, cap: Option<i32>) -> LicenseRecord {
    LicenseRecord {
        account_id,
        expiry_date: Utc::now() + chrono::Duration::days(365),
        max_simultaneous_logins: cap,
        max_users: 25,
    }
}

/// A session record whose last heartbeat is `minutes` in the past.
pub fn idle_record(account_id: AccountId, minutes: i64) -> SessionRecord {
    let mut record = SessionRecord::new(account_id, "idle device");
    record.last_activity = Utc::now() - chrono::Duration::minutes(minutes);
    record
}

/// Identity provider stub counting forced sign-outs.
#[derive(Debug, Default)]
pub struct StubIdentityProvider {
    sign_outs: AtomicUsize,
}

impl StubIdentityProvider {
    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<AuthenticatedIdentity, AppError> {
        Ok(AuthenticatedIdentity {
            account_id: AccountId::new(),
        })
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Store stub whose every call fails, as if the backend were unreachable.
#[derive(Debug, Default)]
pub struct OfflineStore;

#[async_trait]
impl SessionStore for OfflineStore {
    async fn insert(&self, _record: &SessionRecord) -> Result<(), AppError> {
        Err(AppError::store_unavailable("backing store offline"))
    }

    async fn update_activity(
        &self,
        _session_id: SessionId,
        _account_id: AccountId,
        _at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        Err(AppError::store_unavailable("backing store offline"))
    }

    async fn delete(
        &self,
        _session_id: SessionId,
        _account_id: AccountId,
    ) -> Result<(), AppError> {
        Err(AppError::store_unavailable("backing store offline"))
    }

    async fn count_active(&self, _account_id: AccountId) -> Result<u32, AppError> {
        Err(AppError::store_unavailable("backing store offline"))
    }

    async fn reap_older_than(&self, _cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        Err(AppError::store_unavailable("backing store offline"))
    }

    async fn sessions_for_account(
        &self,
        _account_id: AccountId,
    ) -> Result<Vec<SessionRecord>, AppError> {
        Err(AppError::store_unavailable("backing store offline"))
    }
}
