//! Session record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use faktura_core::types::id::{AccountId, SessionId};

/// One admitted login session.
///
/// Records are created only by a successful admission decision, refreshed
/// only by heartbeat ticks, and destroyed by logout, a best-effort teardown
/// delete, or the reaper once stale.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRecord {
    /// Unique session identifier, generated client-side.
    pub session_id: SessionId,
    /// The account holding the seat.
    pub account_id: AccountId,
    /// Free-text device/browser label.
    pub device_descriptor: String,
    /// Last heartbeat timestamp. Never moves backwards for a given session.
    pub last_activity: DateTime<Utc>,
    /// When the session was admitted.
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Create a fresh record for a newly admitted session.
    pub fn new(account_id: AccountId, device_descriptor: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::new(),
            account_id,
            device_descriptor: device_descriptor.into(),
            last_activity: now,
            created_at: now,
        }
    }

    /// Check whether the session's last heartbeat is older than the
    /// staleness window ending at `now`.
    pub fn is_stale_at(&self, now: DateTime<Utc>, threshold: chrono::Duration) -> bool {
        self.last_activity < now - threshold
    }

    /// Calculate how long the session has been idle (in seconds).
    pub fn idle_seconds(&self) -> i64 {
        (Utc::now() - self.last_activity).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_timestamps_match() {
        let record = SessionRecord::new(AccountId::new(), "Firefox on Linux");
        assert_eq!(record.created_at, record.last_activity);
        assert_eq!(record.device_descriptor, "Firefox on Linux");
    }

    #[test]
    fn test_staleness() {
        let now = Utc::now();
        let mut record = SessionRecord::new(AccountId::new(), "test");
        let threshold = chrono::Duration::minutes(5);

        record.last_activity = now - chrono::Duration::minutes(6);
        assert!(record.is_stale_at(now, threshold));

        record.last_activity = now - chrono::Duration::minutes(4);
        assert!(!record.is_stale_at(now, threshold));
    }
}
