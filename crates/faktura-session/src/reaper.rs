//! Stale session reaping.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use faktura_core::config::session::SessionConfig;
use faktura_core::error::AppError;

use crate::store::SessionStore;

/// Deletes session records whose liveness has expired, regardless of which
/// account they belong to.
///
/// Runs before every admission decision, so orphaned records left by
/// crashed or forcibly-closed clients self-heal without requiring any one
/// account's action.
#[derive(Clone)]
pub struct Reaper {
    /// Session store to sweep.
    store: Arc<dyn SessionStore>,
    /// Staleness window.
    threshold: chrono::Duration,
}

impl std::fmt::Debug for Reaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reaper")
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl Reaper {
    /// Creates a new reaper with the configured staleness window.
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            threshold: config.staleness_threshold(),
        }
    }

    /// Runs one reap cycle, deleting every record with `last_activity`
    /// older than `now - threshold`. Returns the number removed.
    pub async fn reap(&self) -> Result<u64, AppError> {
        let cutoff = Utc::now() - self.threshold;
        let removed = self.store.reap_older_than(cutoff).await?;

        if removed > 0 {
            info!(removed, "Reaped stale sessions");
        }

        Ok(removed)
    }
}
