//! Session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use faktura_core::error::{AppError, ErrorKind};
use faktura_core::result::AppResult;
use faktura_core::types::id::{AccountId, SessionId};
use faktura_entity::session::SessionRecord;

/// Repository for session record CRUD and query operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by ID.
    pub async fn find_by_id(&self, session_id: SessionId) -> AppResult<Option<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>("SELECT * FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find session", e)
            })
    }

    /// Insert a new session record.
    ///
    /// Fails with `Conflict` when the `session_id` already exists.
    pub async fn insert(&self, record: &SessionRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (session_id, account_id, device_descriptor, last_activity, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.session_id)
        .bind(record.account_id)
        .bind(&record.device_descriptor)
        .bind(record.last_activity)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                AppError::conflict(format!("Session {} already exists", record.session_id))
            } else {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to insert session", e)
            }
        })?;
        Ok(())
    }

    /// Refresh the last-activity timestamp of a session.
    ///
    /// A missing record is a no-op, and a timestamp older than the stored
    /// value never rewinds it.
    pub async fn update_activity(
        &self,
        session_id: SessionId,
        account_id: AccountId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE sessions SET last_activity = GREATEST(last_activity, $3) \
             WHERE session_id = $1 AND account_id = $2",
        )
        .bind(session_id)
        .bind(account_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to update activity", e)
        })?;
        Ok(())
    }

    /// Delete a session record. Returns `true` if a row was removed.
    pub async fn delete(&self, session_id: SessionId, account_id: AccountId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_id = $1 AND account_id = $2")
            .bind(session_id)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to delete session", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Count every session record held by an account, stale or not.
    pub async fn count_by_account(&self, account_id: AccountId) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::StoreUnavailable,
                        "Failed to count sessions",
                        e,
                    )
                })?;
        Ok(count)
    }

    /// Delete every session record, for any account, whose last activity is
    /// older than `cutoff`. Returns how many were removed.
    pub async fn reap_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE last_activity < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to reap sessions", e)
            })?;
        Ok(result.rows_affected())
    }

    /// List an account's session records, newest first.
    pub async fn find_by_account(&self, account_id: AccountId) -> AppResult<Vec<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>(
            "SELECT * FROM sessions WHERE account_id = $1 ORDER BY created_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list sessions", e)
        })
    }
}
