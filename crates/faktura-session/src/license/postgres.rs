//! PostgreSQL license directory wrapping the database repository.

use std::sync::Arc;

use async_trait::async_trait;

use faktura_core::error::AppError;
use faktura_core::types::id::AccountId;
use faktura_database::repositories::LicenseRepository;
use faktura_entity::license::LicenseRecord;

use super::directory::LicenseDirectory;

/// License directory backed by the shared PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PgLicenseDirectory {
    /// License database repository.
    repo: Arc<LicenseRepository>,
}

impl PgLicenseDirectory {
    /// Creates a new Postgres-backed license directory.
    pub fn new(repo: Arc<LicenseRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl LicenseDirectory for PgLicenseDirectory {
    async fn find_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<LicenseRecord>, AppError> {
        self.repo.find_by_account(account_id).await
    }
}
