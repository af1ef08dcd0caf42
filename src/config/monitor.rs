//! Monitored target configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the single monitored domain and the failover loop cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Domain (or full URL) to probe
    pub domain: String,
    /// Seconds between ticks of the control loop
    pub interval_seconds: u64,
    /// Hard timeout for a single probe
    pub timeout_seconds: u64,
    /// Probes required to confirm an outage
    pub max_retries: u32,
    /// Pause between confirmation probes
    pub retry_delay_seconds: u64,
    /// Execution budget of one monitoring cycle, 0 for unbounded
    pub cycle_seconds: u64,
    /// User-Agent sent with every probe
    pub user_agent: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            interval_seconds: 5,
            timeout_seconds: 2,
            max_retries: 3,
            retry_delay_seconds: 15,
            cycle_seconds: 55,
            user_agent: "failover-sentinel-monitor".to_string(),
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    /// `None` when cycles are unbounded.
    pub fn cycle_budget(&self) -> Option<Duration> {
        (self.cycle_seconds > 0).then(|| Duration::from_secs(self.cycle_seconds))
    }
}
