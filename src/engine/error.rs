//! Error types for the failover engine.

use crate::notify::NotifyError;
use crate::probe::ProbeError;
use crate::rules::RuleApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Another monitoring cycle holds the run guard.
    #[error("a monitoring cycle is already running")]
    AlreadyRunning,

    #[error("probe setup failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("rule API setup failed: {0}")]
    Rules(#[from] RuleApiError),

    #[error("notification setup failed: {0}")]
    Notify(#[from] NotifyError),
}
