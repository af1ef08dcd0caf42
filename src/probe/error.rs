//! Error types for reachability probes.

use thiserror::Error;

/// Reasons a probe counts the target as unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// No response within the probe timeout
    #[error("request timeout after {0}ms")]
    Timeout(u64),

    /// DNS, TCP or TLS failure
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The origin answered with a status outside [200, 500)
    #[error("unreachable status: HTTP {0}")]
    Status(u16),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}
