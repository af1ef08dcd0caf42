//! Page-rule control plane client.

use super::{RuleApiError, RuleStatus};
use crate::config::RuleApiConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Remote store of the two rule toggles.
#[async_trait]
pub trait RuleApi: Send + Sync + 'static {
    /// Read one rule's current status.
    async fn fetch_status(&self, rule_id: &str) -> Result<RuleStatus, RuleApiError>;

    /// Set one rule's status. Idempotent on the remote side.
    async fn update_status(&self, rule_id: &str, status: RuleStatus) -> Result<(), RuleApiError>;
}

#[derive(Debug, Deserialize)]
struct RuleEnvelope {
    result: Option<RuleBody>,
}

#[derive(Debug, Deserialize)]
struct RuleBody {
    status: String,
}

/// Cloudflare page-rule API authenticated with an email/key pair.
pub struct CloudflareRuleApi {
    client: reqwest::Client,
    api_base: String,
    zone_id: String,
    api_email: String,
    api_key: String,
    timeout: Duration,
}

impl CloudflareRuleApi {
    pub fn from_config(config: &RuleApiConfig) -> Result<Self, RuleApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RuleApiError::Configuration(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client with a custom HTTP client (for testing).
    pub fn with_client(client: reqwest::Client, config: &RuleApiConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            zone_id: config.zone_id.clone(),
            api_email: config.api_email.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
        }
    }

    fn rule_url(&self, rule_id: &str) -> String {
        format!(
            "{}/zones/{}/pagerules/{}",
            self.api_base, self.zone_id, rule_id
        )
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    async fn upstream_error(response: reqwest::Response) -> RuleApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(200)
            .collect();
        RuleApiError::Upstream { status, message }
    }
}

#[async_trait]
impl RuleApi for CloudflareRuleApi {
    async fn fetch_status(&self, rule_id: &str) -> Result<RuleStatus, RuleApiError> {
        let response = self
            .client
            .get(self.rule_url(rule_id))
            .header("X-Auth-Email", &self.api_email)
            .header("X-Auth-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| RuleApiError::from_reqwest(e, self.timeout_ms()))?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let envelope: RuleEnvelope = response
            .json()
            .await
            .map_err(|e| RuleApiError::InvalidResponse(e.to_string()))?;

        let body = envelope.result.ok_or_else(|| {
            RuleApiError::InvalidResponse(format!("rule {} returned no result", rule_id))
        })?;

        Ok(RuleStatus::from(body.status == "active"))
    }

    async fn update_status(&self, rule_id: &str, status: RuleStatus) -> Result<(), RuleApiError> {
        let response = self
            .client
            .patch(self.rule_url(rule_id))
            .header("X-Auth-Email", &self.api_email)
            .header("X-Auth-Key", &self.api_key)
            .json(&serde_json::json!({ "status": status.as_str() }))
            .send()
            .await
            .map_err(|e| RuleApiError::from_reqwest(e, self.timeout_ms()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::upstream_error(response).await)
        }
    }
}
