//! Rule-control API configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Credentials and identifiers for the page-rule control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleApiConfig {
    pub api_base: String,
    pub api_email: String,
    pub api_key: String,
    pub zone_id: String,
    /// Rule that redirects traffic away from the origin while it is down
    pub main_rule_id: String,
    /// Rule that is active while the origin is healthy
    pub backup_rule_id: String,
    /// Freshness window of the cached rule pair
    pub cache_ttl_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for RuleApiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.cloudflare.com/client/v4".to_string(),
            api_email: String::new(),
            api_key: String::new(),
            zone_id: String::new(),
            main_rule_id: String::new(),
            backup_rule_id: String::new(),
            cache_ttl_seconds: 30,
            timeout_seconds: 10,
        }
    }
}

impl RuleApiConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
