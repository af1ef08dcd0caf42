//! Main/backup page-rule synchronisation.
//!
//! The two rules are mutually exclusive: while the origin is down the main
//! rule diverts traffic and the backup rule is off, and the reverse while it
//! is up. Reads and writes always address both rules concurrently and are
//! interpreted together.
//!
//! Writes are a best-effort pair, not a transaction. When only one of the two
//! writes lands the pair is left drifted on the remote side and the cache is
//! not touched, so the next cycle sees the mismatch and retries.

mod api;
mod cache;
mod error;
mod state;

pub use api::{CloudflareRuleApi, RuleApi};
pub use cache::RuleStateCache;
pub use error::RuleApiError;
pub use state::{RulePair, RuleStatus, RuleWrite};

use crate::config::RuleApiConfig;
use crate::metrics::RULE_WRITES_TOTAL;
use crate::reading::Reading;
use std::sync::Arc;
use std::time::Duration;

/// Remote identifiers of the rule pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleIds {
    pub main: String,
    pub backup: String,
}

impl From<&RuleApiConfig> for RuleIds {
    fn from(config: &RuleApiConfig) -> Self {
        Self {
            main: config.main_rule_id.clone(),
            backup: config.backup_rule_id.clone(),
        }
    }
}

/// Reads and writes the rule pair through a shared cache.
pub struct RuleController {
    api: Arc<dyn RuleApi>,
    ids: RuleIds,
    cache: RuleStateCache,
}

impl RuleController {
    pub fn new(api: Arc<dyn RuleApi>, ids: RuleIds, cache_ttl: Duration) -> Self {
        let cache = RuleStateCache::new(Arc::clone(&api), ids.clone(), cache_ttl);
        Self { api, ids, cache }
    }

    /// Controller backed by the Cloudflare page-rule API.
    pub fn from_config(config: &RuleApiConfig) -> Result<Self, RuleApiError> {
        let api = CloudflareRuleApi::from_config(config)?;
        Ok(Self::new(
            Arc::new(api),
            RuleIds::from(config),
            config.cache_ttl(),
        ))
    }

    pub fn cache(&self) -> &RuleStateCache {
        &self.cache
    }

    /// Current rule pair, cached for the freshness window.
    pub async fn rule_status(&self) -> Reading<RulePair> {
        self.cache.get_rule_status().await
    }

    /// Drive both rules to the state for an origin that is (not) down.
    ///
    /// `down == true` activates the main rule and disables the backup rule.
    /// Skips the remote calls when the cache already holds the target pair.
    pub async fn set_rules(&self, down: bool) -> RuleWrite {
        let target = RulePair::target(down);

        if self.cache.peek() == Some(target) {
            tracing::debug!(down = down, "Rule pair already in target state");
            return RuleWrite::Unchanged;
        }

        let (main, backup) = tokio::join!(
            self.api
                .update_status(&self.ids.main, RuleStatus::from(target.main)),
            self.api
                .update_status(&self.ids.backup, RuleStatus::from(target.backup))
        );

        let write = match (main, backup) {
            (Ok(()), Ok(())) => {
                self.cache.record(target);
                RuleWrite::Applied
            }
            (Ok(()), Err(e)) => RuleWrite::Partial {
                main_applied: true,
                backup_applied: false,
                reason: format!("backup rule {}: {}", self.ids.backup, e),
            },
            (Err(e), Ok(())) => RuleWrite::Partial {
                main_applied: false,
                backup_applied: true,
                reason: format!("main rule {}: {}", self.ids.main, e),
            },
            (Err(main_err), Err(backup_err)) => RuleWrite::Failed {
                reason: format!("main: {}; backup: {}", main_err, backup_err),
            },
        };

        metrics::counter!(RULE_WRITES_TOTAL, "outcome" => write.outcome_label()).increment(1);

        match &write {
            RuleWrite::Applied => tracing::info!(
                main = target.main,
                backup = target.backup,
                "Rule pair updated"
            ),
            RuleWrite::Partial { reason, .. } | RuleWrite::Failed { reason } => tracing::warn!(
                down = down,
                outcome = write.outcome_label(),
                error = %reason,
                "Rule pair update failed"
            ),
            RuleWrite::Unchanged => {}
        }

        write
    }
}
