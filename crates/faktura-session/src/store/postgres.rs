//! PostgreSQL session store wrapping the database repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use faktura_core::error::AppError;
use faktura_core::types::id::{AccountId, SessionId};
use faktura_database::repositories::SessionRepository;
use faktura_entity::session::SessionRecord;

use super::backend::SessionStore;

/// Session store backed by the shared PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    /// Session database repository.
    repo: Arc<SessionRepository>,
}

impl PgSessionStore {
    /// Creates a new Postgres-backed session store.
    pub fn new(repo: Arc<SessionRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), AppError> {
        self.repo.insert(record).await
    }

    async fn update_activity(
        &self,
        session_id: SessionId,
        account_id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.repo.update_activity(session_id, account_id, at).await
    }

    async fn delete(&self, session_id: SessionId, account_id: AccountId) -> Result<(), AppError> {
        self.repo.delete(session_id, account_id).await?;
        Ok(())
    }

    async fn count_active(&self, account_id: AccountId) -> Result<u32, AppError> {
        let count = self.repo.count_by_account(account_id).await?;
        Ok(count.max(0) as u32)
    }

    async fn reap_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        self.repo.reap_older_than(cutoff).await
    }

    async fn sessions_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<SessionRecord>, AppError> {
        self.repo.find_by_account(account_id).await
    }
}
