//! License record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use faktura_core::types::id::AccountId;

/// An account's license record.
///
/// Owned and mutated by account-administration flows; the session subsystem
/// only reads it to resolve the seat cap and expiry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LicenseRecord {
    /// The licensed account.
    pub account_id: AccountId,
    /// When the license expires.
    pub expiry_date: DateTime<Utc>,
    /// Seat cap. `None` or non-positive means the configured default applies.
    pub max_simultaneous_logins: Option<i32>,
    /// Maximum number of named users on the account.
    pub max_users: i32,
}

impl LicenseRecord {
    /// Check whether the license is valid at `now` (not yet expired).
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.expiry_date
    }

    /// The seat cap carried by this license, if it specifies a positive one.
    pub fn seat_cap(&self) -> Option<u32> {
        self.max_simultaneous_logins
            .filter(|cap| *cap > 0)
            .map(|cap| cap as u32)
    }

    /// Whole days remaining until expiry at `now`, rounded up; 0 once expired.
    pub fn days_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        let seconds = (self.expiry_date - now).num_seconds();
        if seconds <= 0 {
            return 0;
        }
        (seconds as u64).div_ceil(86_400) as i64
    }
}
