//! Configuration module for the failover sentinel
//!
//! Configuration is loaded once at process start and never reloaded.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SENTINEL_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use sentinel::config::SentinelConfig;
//!
//! let toml = r#"
//! [monitor]
//! domain = "example.com"
//! interval_seconds = 10
//! "#;
//! let config: SentinelConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.monitor.domain, "example.com");
//! assert_eq!(config.monitor.max_retries, 3);
//! ```

pub mod error;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod rules;
pub mod server;
pub mod store;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use monitor::MonitorConfig;
pub use notify::NotifyConfig;
pub use rules::RuleApiConfig;
pub use server::ServerConfig;
pub use store::StoreConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SentinelConfig {
    /// Monitored target and loop cadence
    pub monitor: MonitorConfig,
    /// Page-rule control plane
    pub rules: RuleApiConfig,
    /// Operator notification channel
    pub notify: NotifyConfig,
    /// Durable last-announced status
    pub store: StoreConfig,
    /// Status HTTP server
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl SentinelConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Secrets are usually supplied this way rather than in the file.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(domain) = std::env::var("SENTINEL_DOMAIN") {
            self.monitor.domain = domain;
        }

        // Rule-control API credentials
        if let Ok(email) = std::env::var("SENTINEL_API_EMAIL") {
            self.rules.api_email = email;
        }
        if let Ok(key) = std::env::var("SENTINEL_API_KEY") {
            self.rules.api_key = key;
        }
        if let Ok(zone) = std::env::var("SENTINEL_ZONE_ID") {
            self.rules.zone_id = zone;
        }

        // Notification channel
        if let Ok(token) = std::env::var("SENTINEL_TELEGRAM_TOKEN") {
            self.notify.bot_token = token;
        }
        if let Ok(chat) = std::env::var("SENTINEL_TELEGRAM_CHAT_ID") {
            self.notify.chat_id = chat;
        }

        // Server settings
        if let Ok(port) = std::env::var("SENTINEL_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("SENTINEL_HOST") {
            self.server.host = host;
        }

        // Logging settings
        if let Ok(level) = std::env::var("SENTINEL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SENTINEL_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("monitor.domain", &self.monitor.domain)?;
        if self.monitor.interval_seconds == 0 {
            return Err(invalid("monitor.interval_seconds", "interval must be non-zero"));
        }
        if self.monitor.timeout_seconds == 0 {
            return Err(invalid("monitor.timeout_seconds", "timeout must be non-zero"));
        }
        if self.monitor.cycle_seconds != 0 && self.monitor.cycle_seconds < self.monitor.interval_seconds {
            return Err(invalid(
                "monitor.cycle_seconds",
                "a cycle must fit at least one tick interval",
            ));
        }
        if self.monitor.max_retries == 0 {
            return Err(invalid(
                "monitor.max_retries",
                "at least one probe is needed to confirm an outage",
            ));
        }

        require("rules.api_email", &self.rules.api_email)?;
        require("rules.api_key", &self.rules.api_key)?;
        require("rules.zone_id", &self.rules.zone_id)?;
        require("rules.main_rule_id", &self.rules.main_rule_id)?;
        require("rules.backup_rule_id", &self.rules.backup_rule_id)?;
        if self.rules.main_rule_id == self.rules.backup_rule_id {
            return Err(invalid(
                "rules.backup_rule_id",
                "main and backup rules must be different rules",
            ));
        }

        if self.rules.timeout_seconds == 0 {
            return Err(invalid("rules.timeout_seconds", "timeout must be non-zero"));
        }

        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES)
            .contains(&self.notify.utc_offset_minutes)
        {
            return Err(invalid(
                "notify.utc_offset_minutes",
                "offset must be within one day of UTC",
            ));
        }
        if self.notify.enabled {
            if self.notify.timeout_seconds == 0 {
                return Err(invalid("notify.timeout_seconds", "timeout must be non-zero"));
            }
            require("notify.bot_token", &self.notify.bot_token)?;
            require("notify.chat_id", &self.notify.chat_id)?;
        }

        if self.store.key.is_empty() {
            return Err(invalid("store.key", "key cannot be empty"));
        }

        if self.server.enabled && self.server.port == 0 {
            return Err(invalid("server.port", "port must be non-zero"));
        }

        Ok(())
    }
}

const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60;

fn require(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(field.to_string()));
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
