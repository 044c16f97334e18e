//! Session store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use faktura_core::error::AppError;
use faktura_core::types::id::{AccountId, SessionId};
use faktura_entity::session::SessionRecord;

/// Persistence primitives over session records.
///
/// Implementations must be safe to share across tasks and handle concurrent
/// access; no locking discipline is imposed on callers.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Inserts a new session record.
    ///
    /// Fails with `Conflict` when the `session_id` already exists.
    async fn insert(&self, record: &SessionRecord) -> Result<(), AppError>;

    /// Refreshes `last_activity` for a session.
    ///
    /// A missing record is a no-op (not an error), and a timestamp older
    /// than the stored value never rewinds it.
    async fn update_activity(
        &self,
        session_id: SessionId,
        account_id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Removes a session record. Deleting an absent record is a no-op.
    async fn delete(&self, session_id: SessionId, account_id: AccountId) -> Result<(), AppError>;

    /// Counts every record held by the account, stale or not.
    ///
    /// Accuracy depends on the reaper having run first; the admission
    /// sequence always reaps before counting.
    async fn count_active(&self, account_id: AccountId) -> Result<u32, AppError>;

    /// Deletes every record, for any account, whose `last_activity` is
    /// older than `cutoff`. Returns how many were removed.
    async fn reap_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;

    /// Lists the account's session records, newest first.
    async fn sessions_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<SessionRecord>, AppError>;
}
