//! In-memory session store using a Tokio mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use faktura_core::error::AppError;
use faktura_core::types::id::{AccountId, SessionId};
use faktura_entity::session::SessionRecord;

use super::backend::SessionStore;

/// In-memory session store using a Tokio mutex for thread safety.
///
/// Suitable for tests and single-process tools; production deployments use
/// the Postgres backend so that independent client processes share state.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    /// Protected record map, keyed by session id.
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl MemorySessionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), AppError> {
        let mut records = self.records.lock().await;

        if records.contains_key(&record.session_id) {
            return Err(AppError::conflict(format!(
                "Session {} already exists",
                record.session_id
            )));
        }

        records.insert(record.session_id, record.clone());
        Ok(())
    }

    async fn update_activity(
        &self,
        session_id: SessionId,
        account_id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut records = self.records.lock().await;

        if let Some(record) = records.get_mut(&session_id) {
            if record.account_id == account_id && at > record.last_activity {
                record.last_activity = at;
            }
        }

        Ok(())
    }

    async fn delete(&self, session_id: SessionId, account_id: AccountId) -> Result<(), AppError> {
        let mut records = self.records.lock().await;

        let matches = records
            .get(&session_id)
            .is_some_and(|record| record.account_id == account_id);
        if matches {
            records.remove(&session_id);
        }

        Ok(())
    }

    async fn count_active(&self, account_id: AccountId) -> Result<u32, AppError> {
        let records = self.records.lock().await;
        let count = records
            .values()
            .filter(|record| record.account_id == account_id)
            .count();
        Ok(count as u32)
    }

    async fn reap_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| record.last_activity >= cutoff);
        let removed = (before - records.len()) as u64;

        if removed > 0 {
            debug!(removed, "Removed stale session records");
        }

        Ok(removed)
    }

    async fn sessions_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<SessionRecord>, AppError> {
        let records = self.records.lock().await;
        let mut sessions: Vec<SessionRecord> = records
            .values()
            .filter(|record| record.account_id == account_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }
}
