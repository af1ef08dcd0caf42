//! Reachability probing of the monitored domain.
//!
//! A single probe is a HEAD request with a hard timeout. Any answer in
//! [200, 500) means the origin is serving, so redirects and client errors
//! count as reachable. Outage verdicts need `max_retries` consecutive failed
//! probes spaced `retry_delay` apart.

mod error;
mod http;


pub use error::ProbeError;
pub use http::{target_url, HttpProbe};

use crate::config::MonitorConfig;
use crate::metrics::{PROBES_TOTAL, PROBE_LATENCY_SECONDS};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable { status: u16, latency_ms: u32 },
    Unreachable { error: ProbeError },
}

impl ProbeOutcome {
    /// Classify an HTTP answer.
    pub fn from_status(status: u16, latency_ms: u32) -> Self {
        if (200..500).contains(&status) {
            ProbeOutcome::Reachable { status, latency_ms }
        } else {
            ProbeOutcome::Unreachable {
                error: ProbeError::Status(status),
            }
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable { .. })
    }
}

/// Performs a single probe against a target.
///
/// Implementations never fail: every transport problem is an
/// `Unreachable` outcome.
#[async_trait]
pub trait ProbeTransport: Send + Sync + 'static {
    async fn probe(&self, target: &str) -> ProbeOutcome;
}

/// Reachability checks for the one monitored target.
pub struct HealthProbe {
    transport: Arc<dyn ProbeTransport>,
    target: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl HealthProbe {
    pub fn new(
        transport: Arc<dyn ProbeTransport>,
        target: impl Into<String>,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            transport,
            target: target.into(),
            max_retries,
            retry_delay,
        }
    }

    /// Build an HTTP-backed probe from the monitor section.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, ProbeError> {
        let transport = HttpProbe::new(config.timeout(), &config.user_agent)?;
        Ok(Self::new(
            Arc::new(transport),
            config.domain.clone(),
            config.max_retries,
            config.retry_delay(),
        ))
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// One probe. True iff the origin answered with a status in [200, 500).
    pub async fn check(&self) -> bool {
        let outcome = self.transport.probe(&self.target).await;

        match &outcome {
            ProbeOutcome::Reachable { status, latency_ms } => {
                metrics::counter!(PROBES_TOTAL, "result" => "reachable").increment(1);
                metrics::histogram!(PROBE_LATENCY_SECONDS).record(*latency_ms as f64 / 1000.0);
                tracing::debug!(
                    domain = %self.target,
                    status = status,
                    latency_ms = latency_ms,
                    "Probe answered"
                );
            }
            ProbeOutcome::Unreachable { error } => {
                metrics::counter!(PROBES_TOTAL, "result" => "unreachable").increment(1);
                tracing::debug!(domain = %self.target, error = %error, "Probe failed");
            }
        }

        outcome.is_reachable()
    }

    /// Confirm an outage with up to `max_retries` sequential probes.
    ///
    /// Returns false as soon as one probe succeeds, without waiting out the
    /// remaining delays. Worst case takes `(max_retries - 1) * retry_delay`
    /// plus the probe time.
    pub async fn verify_down(&self) -> bool {
        let attempts = self.max_retries.max(1);

        for attempt in 1..=attempts {
            if self.check().await {
                tracing::info!(
                    domain = %self.target,
                    attempt = attempt,
                    "Target answered during outage verification"
                );
                return false;
            }

            tracing::debug!(
                domain = %self.target,
                attempt = attempt,
                max_retries = attempts,
                "Verification probe failed"
            );

            if attempt < attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        true
    }
}
