//! License registry — read-only seat-cap and validity resolution.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use faktura_core::config::license::LicenseConfig;
use faktura_core::types::id::AccountId;
use faktura_entity::license::LicenseRecord;

use super::directory::LicenseDirectory;

/// Resolves license-derived values for individual accounts.
///
/// Lookup failures are treated as "no license", never as a hard error:
/// a degraded license table must not lock every account out, it only drops
/// them to the configured default seat cap.
#[derive(Debug, Clone)]
pub struct LicenseRegistry {
    /// License record source.
    directory: Arc<dyn LicenseDirectory>,
    /// License configuration with the default seat cap.
    config: LicenseConfig,
}

impl LicenseRegistry {
    /// Creates a new license registry.
    pub fn new(directory: Arc<dyn LicenseDirectory>, config: LicenseConfig) -> Self {
        Self { directory, config }
    }

    /// Fetch the account's license record, mapping lookup errors to `None`.
    pub async fn get_license(&self, account_id: AccountId) -> Option<LicenseRecord> {
        match self.directory.find_by_account(account_id).await {
            Ok(license) => license,
            Err(e) => {
                warn!(
                    account_id = %account_id,
                    error = %e,
                    "License lookup failed, treating as no license"
                );
                None
            }
        }
    }

    /// Whether the account holds an unexpired license. `false` without one.
    pub async fn is_valid(&self, account_id: AccountId) -> bool {
        self.get_license(account_id)
            .await
            .map(|license| license.is_valid_at(Utc::now()))
            .unwrap_or(false)
    }

    /// The effective seat cap for the account: the license value when it is
    /// present and positive, otherwise the configured default.
    pub async fn max_logins(&self, account_id: AccountId) -> u32 {
        self.get_license(account_id)
            .await
            .and_then(|license| license.seat_cap())
            .unwrap_or(self.config.default_max_logins)
    }

    /// Whole days remaining until expiry, rounded up; 0 without a license.
    pub async fn days_remaining(&self, account_id: AccountId) -> i64 {
        self.get_license(account_id)
            .await
            .map(|license| license.days_remaining_at(Utc::now()))
            .unwrap_or(0)
    }
}
