//! License resolution configuration.

use serde::{Deserialize, Serialize};

/// License resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Seat cap applied when an account has no license record or the
    /// license does not specify a positive `max_simultaneous_logins`.
    #[serde(default = "default_max_logins")]
    pub default_max_logins: u32,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            default_max_logins: default_max_logins(),
        }
    }
}

fn default_max_logins() -> u32 {
    3
}
