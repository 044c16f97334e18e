//! Seat admission decisions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use faktura_core::error::AppError;
use faktura_core::types::id::{AccountId, SessionId};
use faktura_entity::session::SessionRecord;

use crate::license::LicenseRegistry;
use crate::reaper::Reaper;
use crate::store::SessionStore;

/// Result of an admission attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AdmissionDecision {
    /// A seat was granted and a session record created.
    Admitted {
        /// The freshly generated session id.
        session_id: SessionId,
    },
    /// The account is at its seat cap.
    Rejected {
        /// User-facing reason, stating the configured limit.
        reason: String,
    },
}

/// Decides whether a new login may acquire a seat.
#[derive(Clone)]
pub struct AdmissionController {
    /// License registry for seat-cap resolution.
    registry: Arc<LicenseRegistry>,
    /// Reaper run before every decision.
    reaper: Arc<Reaper>,
    /// Session persistence.
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController").finish()
    }
}

impl AdmissionController {
    /// Creates a new admission controller.
    pub fn new(
        registry: Arc<LicenseRegistry>,
        reaper: Arc<Reaper>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            registry,
            reaper,
            store,
        }
    }

    /// Performs the admission sequence:
    ///
    /// 1. Resolve the account's seat cap from the license registry.
    /// 2. Reap stale records system-wide.
    /// 3. Count the account's remaining records.
    /// 4. At or above the cap, reject with the limit in the message.
    /// 5. Otherwise generate a fresh session id, insert the record, admit.
    ///
    /// Steps 2–5 are not transactional against the backing store: two
    /// concurrent attempts for the same account can both observe a count
    /// below the cap and both insert. The resulting over-admission is
    /// bounded by the number of truly concurrent racers and heals through
    /// the reaper once either session stops heartbeating. Store errors in
    /// any step deny the admission.
    pub async fn admit(
        &self,
        account_id: AccountId,
        device_descriptor: &str,
    ) -> Result<AdmissionDecision, AppError> {
        let max_logins = self.registry.max_logins(account_id).await;

        self.reaper.reap().await?;

        let active = self.store.count_active(account_id).await?;

        if active >= max_logins {
            warn!(
                account_id = %account_id,
                active,
                max_logins,
                "Admission rejected: seat cap reached"
            );
            return Ok(AdmissionDecision::Rejected {
                reason: format!(
                    "Maximum {max_logins} simultaneous login(s) allowed. \
                     Please log out from another device."
                ),
            });
        }

        let record = SessionRecord::new(account_id, device_descriptor);
        self.store.insert(&record).await?;

        info!(
            account_id = %account_id,
            session_id = %record.session_id,
            seats_used = active + 1,
            max_logins,
            "Session admitted"
        );

        Ok(AdmissionDecision::Admitted {
            session_id: record.session_id,
        })
    }
}
