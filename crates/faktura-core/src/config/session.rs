//! Session admission and liveness configuration.

use serde::{Deserialize, Serialize};

/// Session admission and liveness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes without a heartbeat before a session is considered dead and
    /// eligible for reaping.
    #[serde(default = "default_staleness_threshold")]
    pub staleness_threshold_minutes: u64,
    /// Interval between heartbeat ticks in seconds.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
}

impl SessionConfig {
    /// The staleness window as a [`chrono::Duration`].
    pub fn staleness_threshold(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.staleness_threshold_minutes as i64)
    }

    /// The heartbeat interval as a [`std::time::Duration`].
    pub fn heartbeat_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.heartbeat_interval_seconds)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            staleness_threshold_minutes: default_staleness_threshold(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
        }
    }
}

fn default_staleness_threshold() -> u64 {
    5
}

fn default_heartbeat_interval() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.staleness_threshold_minutes, 5);
        assert_eq!(config.heartbeat_interval_seconds, 60);
    }

    #[test]
    fn test_threshold_conversion() {
        let config = SessionConfig::default();
        assert_eq!(config.staleness_threshold(), chrono::Duration::minutes(5));
        assert_eq!(
            config.heartbeat_interval(),
            std::time::Duration::from_secs(60)
        );
    }
}
