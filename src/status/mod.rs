//! Read-only status snapshot for external queries.

use crate::engine::FailoverContext;
use crate::notify::AnnouncedStatus;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Snapshot served by `GET /status` and `sentinel status --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// "up" or "down" from a fresh probe
    pub status: String,
    pub main_page_rule_enabled: bool,
    pub backup_page_rule_enabled: bool,
    pub last_notification_status: AnnouncedStatus,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}

/// Aggregates probe, rule and announcement state without changing it.
#[derive(Clone)]
pub struct StatusReporter {
    ctx: Arc<FailoverContext>,
}

impl StatusReporter {
    pub fn new(ctx: Arc<FailoverContext>) -> Self {
        Self { ctx }
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        let (reachable, rules, announced) = tokio::join!(
            self.ctx.probe.check(),
            self.ctx.rules.rule_status(),
            self.ctx.gate.last_status()
        );
        let rules = rules.into_value();

        StatusSnapshot {
            status: if reachable { "up" } else { "down" }.to_string(),
            main_page_rule_enabled: rules.main,
            backup_page_rule_enabled: rules.backup,
            last_notification_status: announced.into_value(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
