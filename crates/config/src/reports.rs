use serde::Deserialize;

/// Report lifecycle timing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportsConfig {
    /// Timeout (seconds) for sessions that never attract a consumer, after
    /// which they are deregistered (event **T**).
    pub wait_for_connection_secs: f64,
    /// Upper bound (seconds) on the consumer stream loop's wait between
    /// drains.
    pub throttle_secs: f64,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            wait_for_connection_secs: 60.0,
            throttle_secs: 0.1,
        }
    }
}
