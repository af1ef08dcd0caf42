//! # Metrics
//!
//! Prometheus export of the sentinel's counters. Only current counts are
//! kept; there is no history.
//!
//! **Counters:**
//! - `sentinel_probes_total{result}` - Reachability probes by outcome
//! - `sentinel_rule_writes_total{outcome}` - Rule pair writes
//! - `sentinel_transitions_total{status}` - Announced DOWN/UP transitions
//! - `sentinel_notifications_total{delivered}` - Operator messages
//!
//! **Histograms:**
//! - `sentinel_probe_latency_seconds` - Latency of answered probes

pub use metrics_exporter_prometheus::PrometheusHandle;

pub const PROBES_TOTAL: &str = "sentinel_probes_total";
pub const PROBE_LATENCY_SECONDS: &str = "sentinel_probe_latency_seconds";
pub const RULE_WRITES_TOTAL: &str = "sentinel_rule_writes_total";
pub const TRANSITIONS_TOTAL: &str = "sentinel_transitions_total";
pub const NOTIFICATIONS_TOTAL: &str = "sentinel_notifications_total";

/// Install the global Prometheus recorder.
///
/// Probe latency buckets sit around the 2 second probe timeout.
pub fn setup_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let latency_buckets = &[0.05, 0.1, 0.25, 0.5, 1.0, 1.5, 2.0, 5.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(PROBE_LATENCY_SECONDS.to_string()),
            latency_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}
