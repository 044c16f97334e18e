//! License directory trait.

use async_trait::async_trait;

use faktura_core::error::AppError;
use faktura_core::types::id::AccountId;
use faktura_entity::license::LicenseRecord;

/// Read-only source of license records.
#[async_trait]
pub trait LicenseDirectory: Send + Sync + std::fmt::Debug {
    /// Look up the license record for an account.
    async fn find_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<LicenseRecord>, AppError>;
}
