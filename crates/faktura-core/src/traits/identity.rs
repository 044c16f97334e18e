//! External identity-provider seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::id::AccountId;

/// Credentials presented to the identity provider on sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Plaintext password, verified by the provider.
    pub password: String,
}

/// The authenticated identity returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    /// The account the credentials resolved to.
    pub account_id: AccountId,
}

/// External identity provider consumed by the session subsystem.
///
/// Credential verification and token issuance live behind this trait.
/// The subsystem never implements it; it only drives `sign_out` when an
/// admission is rejected.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials and establish an authenticated identity.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthenticatedIdentity, AppError>;

    /// Tear down the provider-side authentication state.
    async fn sign_out(&self) -> Result<(), AppError>;
}
