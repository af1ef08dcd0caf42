//! Collaborators shared by the engine and the status reporter.

use super::EngineError;
use crate::config::SentinelConfig;
use crate::notify::NotificationGate;
use crate::probe::HealthProbe;
use crate::rules::RuleController;
use std::time::Duration;

/// Everything one control loop touches, owned in one place.
pub struct FailoverContext {
    pub probe: HealthProbe,
    pub rules: RuleController,
    pub gate: NotificationGate,
}

impl FailoverContext {
    pub fn new(probe: HealthProbe, rules: RuleController, gate: NotificationGate) -> Self {
        Self { probe, rules, gate }
    }

    /// Wire the HTTP probe, Cloudflare rules, Telegram channel and store.
    pub fn from_config(config: &SentinelConfig) -> Result<Self, EngineError> {
        Ok(Self::new(
            HealthProbe::from_config(&config.monitor)?,
            RuleController::from_config(&config.rules)?,
            NotificationGate::from_config(&config.store, &config.notify)?,
        ))
    }
}

/// Loop cadence and message settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailoverSettings {
    /// Target time from one tick start to the next
    pub interval: Duration,
    /// Execution budget of a cycle; `None` runs until cancelled
    pub cycle_budget: Option<Duration>,
    /// Offset for alert timestamps
    pub utc_offset_minutes: i32,
}

impl FailoverSettings {
    pub fn from_config(config: &SentinelConfig) -> Self {
        Self {
            interval: config.monitor.interval(),
            cycle_budget: config.monitor.cycle_budget(),
            utc_offset_minutes: config.notify.utc_offset_minutes,
        }
    }
}

impl Default for FailoverSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            cycle_budget: Some(Duration::from_secs(55)),
            utc_offset_minutes: 7 * 60,
        }
    }
}
