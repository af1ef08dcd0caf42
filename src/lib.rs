//! Failover sentinel - health-check driven page-rule failover
//!
//! Probes a web domain on a fixed cadence. A confirmed outage switches the
//! CDN edge from the main page rule to a backup rule and alerts the
//! operator; a confirmed recovery switches back. Each transition is
//! announced once, tracked through a durable last-announced status.

pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod logging;
pub mod metrics;
pub mod notify;
pub mod probe;
pub mod reading;
pub mod rules;
pub mod status;

#[cfg(test)]
mod testing;
