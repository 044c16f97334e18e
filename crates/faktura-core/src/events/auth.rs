//! Authentication state-change events.

use serde::{Deserialize, Serialize};

use crate::types::id::AccountId;

/// Auth state changes emitted by the identity provider.
///
/// The lifecycle orchestrator subscribes to these and drives seat
/// admission, heartbeat, and teardown off them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthStateEvent {
    /// The identity provider completed a sign-in for this client process.
    SignedIn {
        /// The authenticated account.
        account_id: AccountId,
        /// Free-text device/browser label for the session record.
        device_descriptor: String,
    },
    /// The user explicitly signed out.
    SignedOut,
    /// The client process is going away (page close, app shutdown).
    Unloaded,
}
