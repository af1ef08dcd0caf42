//! Short-lived cache of the remote rule pair.

use super::{RuleApi, RuleIds, RulePair};
use crate::reading::Reading;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Entry {
    pair: RulePair,
    refreshed_at: Instant,
}

/// Last-known state of the rule pair with a freshness window.
///
/// Time is measured with `tokio::time::Instant`, so a paused test runtime
/// controls expiry.
pub struct RuleStateCache {
    api: Arc<dyn RuleApi>,
    ids: RuleIds,
    ttl: Duration,
    entry: Mutex<Option<Entry>>,
}

impl RuleStateCache {
    pub fn new(api: Arc<dyn RuleApi>, ids: RuleIds, ttl: Duration) -> Self {
        Self {
            api,
            ids,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Last known pair regardless of age.
    pub fn peek(&self) -> Option<RulePair> {
        self.current().map(|e| e.pair)
    }

    /// Record a pair confirmed by the remote side and restart the window.
    pub fn record(&self, pair: RulePair) {
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = Some(Entry {
            pair,
            refreshed_at: Instant::now(),
        });
    }

    fn current(&self) -> Option<Entry> {
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh(&self) -> Option<RulePair> {
        self.current()
            .filter(|e| e.refreshed_at.elapsed() < self.ttl)
            .map(|e| e.pair)
    }

    /// Current rule pair.
    ///
    /// Served from cache inside the freshness window; otherwise both rules
    /// are read concurrently. A failed read degrades to the last known pair,
    /// or both-disabled when nothing was ever read.
    pub async fn get_rule_status(&self) -> Reading<RulePair> {
        if let Some(pair) = self.fresh() {
            return Reading::Cached(pair);
        }

        let (main, backup) = tokio::join!(
            self.api.fetch_status(&self.ids.main),
            self.api.fetch_status(&self.ids.backup)
        );

        match (main, backup) {
            (Ok(main), Ok(backup)) => {
                let pair = RulePair {
                    main: main.is_active(),
                    backup: backup.is_active(),
                };
                self.record(pair);
                tracing::debug!(main = pair.main, backup = pair.backup, "Rule pair refreshed");
                Reading::Fresh(pair)
            }
            (Err(e), _) | (_, Err(e)) => {
                let stale = self.peek().unwrap_or_default();
                tracing::warn!(
                    error = %e,
                    main = stale.main,
                    backup = stale.backup,
                    "Failed to read rule pair, using last known state"
                );
                Reading::Degraded {
                    value: stale,
                    reason: e.to_string(),
                }
            }
        }
    }
}
