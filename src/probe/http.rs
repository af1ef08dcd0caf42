//! HEAD-request transport for reachability probes.

use super::{ProbeError, ProbeOutcome, ProbeTransport};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Probes a target with a single HEAD request under a hard timeout.
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    /// Build a probe whose requests carry `user_agent`.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Create a probe with a custom HTTP client (for testing).
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn classify_error(e: reqwest::Error, timeout: Duration) -> ProbeError {
        if e.is_timeout() {
            ProbeError::Timeout(timeout.as_millis() as u64)
        } else {
            ProbeError::ConnectionFailed(e.to_string())
        }
    }
}

/// `https://<domain>` unless the target already names a scheme.
pub fn target_url(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{}", target)
    }
}

#[async_trait]
impl ProbeTransport for HttpProbe {
    async fn probe(&self, target: &str) -> ProbeOutcome {
        let start = Instant::now();
        match self
            .client
            .head(target_url(target))
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => ProbeOutcome::from_status(
                response.status().as_u16(),
                start.elapsed().as_millis() as u32,
            ),
            Err(e) => ProbeOutcome::Unreachable {
                error: Self::classify_error(e, self.timeout),
            },
        }
    }
}
