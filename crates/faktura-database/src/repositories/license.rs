//! License repository implementation.
//!
//! Read-only from this subsystem's perspective; license rows are written by
//! account-administration flows elsewhere in the application.

use sqlx::PgPool;

use faktura_core::error::{AppError, ErrorKind};
use faktura_core::result::AppResult;
use faktura_core::types::id::AccountId;
use faktura_entity::license::LicenseRecord;

/// Repository for license records.
#[derive(Debug, Clone)]
pub struct LicenseRepository {
    pool: PgPool,
}

impl LicenseRepository {
    /// Create a new license repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the license record for an account.
    pub async fn find_by_account(&self, account_id: AccountId) -> AppResult<Option<LicenseRecord>> {
        sqlx::query_as::<_, LicenseRecord>("SELECT * FROM licenses WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find license", e)
            })
    }
}
