//! In-memory license directory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use faktura_core::error::AppError;
use faktura_core::types::id::AccountId;
use faktura_entity::license::LicenseRecord;

use super::directory::LicenseDirectory;

/// In-memory license directory for tests and single-process tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryLicenseDirectory {
    /// Protected license map, keyed by account id.
    licenses: Arc<Mutex<HashMap<AccountId, LicenseRecord>>>,
}

impl MemoryLicenseDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account's license record.
    pub async fn upsert(&self, license: LicenseRecord) {
        let mut licenses = self.licenses.lock().await;
        licenses.insert(license.account_id, license);
    }
}

#[async_trait]
impl LicenseDirectory for MemoryLicenseDirectory {
    async fn find_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<LicenseRecord>, AppError> {
        let licenses = self.licenses.lock().await;
        Ok(licenses.get(&account_id).cloned())
    }
}
