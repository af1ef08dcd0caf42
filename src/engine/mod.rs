//! The failover control loop.
//!
//! A *cycle* corresponds to one invocation by the host scheduler: it
//! reconciles the rule pair with observed reachability once, then runs ticks
//! every `interval` until its budget elapses or it is cancelled. Each tick
//! probes the target and handles DOWN/UP transitions:
//!
//! - unreachable: confirm with `verify_down`; on a confirmed outage that has
//!   not been announced yet, switch to the failover rules, notify, and
//!   persist DOWN.
//! - reachable: confirm with one more probe; if DOWN was the last announced
//!   status, restore the normal rules, notify, and persist UP.
//!
//! The announced status is persisted whether or not the notification was
//! delivered. Rules converge through reconciliation independently of
//! notification success.

mod context;
mod error;

#[cfg(test)]
mod tests;

pub use context::{FailoverContext, FailoverSettings};
pub use error::EngineError;

use crate::metrics::TRANSITIONS_TOTAL;
use crate::notify::{message, AnnouncedStatus};
use crate::rules::{RulePair, RuleWrite};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Result of the per-cycle reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub reachable: bool,
    /// Rule pair observed before any correction
    pub observed: RulePair,
    /// Write issued to realign the rules, if they disagreed with reachability
    pub correction: Option<RuleWrite>,
}

/// An announced DOWN or UP transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub status: AnnouncedStatus,
    pub rules: RuleWrite,
    /// The operator channel acknowledged the message
    pub delivered: bool,
    /// The announced status reached the durable store
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub reachable: bool,
    /// Rule pair seen at the start of the tick
    pub rules: RulePair,
    pub transition: Option<Transition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub ticks: u64,
    pub transitions: u32,
    pub cancelled: bool,
}

/// Debounced health detection driving the main/backup rule pair.
pub struct FailoverEngine {
    ctx: Arc<FailoverContext>,
    settings: FailoverSettings,
    /// Held for the duration of a cycle; the dual rule write is not safe
    /// against concurrent writers.
    run_guard: tokio::sync::Mutex<()>,
}

impl FailoverEngine {
    pub fn new(ctx: Arc<FailoverContext>, settings: FailoverSettings) -> Self {
        Self {
            ctx,
            settings,
            run_guard: tokio::sync::Mutex::new(()),
        }
    }

    pub fn context(&self) -> &Arc<FailoverContext> {
        &self.ctx
    }

    pub fn settings(&self) -> &FailoverSettings {
        &self.settings
    }

    fn timestamp(&self) -> String {
        message::format_timestamp(chrono::Utc::now(), self.settings.utc_offset_minutes)
    }

    /// Realign the rules with a single reachability probe.
    ///
    /// Runs regardless of the announced status, so the rules self-heal even
    /// when a transition was announced but its rule write failed.
    pub async fn reconcile(&self) -> Reconciliation {
        let observed = self.ctx.rules.rule_status().await.into_value();
        let reachable = self.ctx.probe.check().await;
        let desired = RulePair::target(!reachable);

        let correction = if observed != desired {
            tracing::info!(
                domain = %self.ctx.probe.target(),
                reachable = reachable,
                main = observed.main,
                backup = observed.backup,
                "Rule pair disagrees with reachability, reconciling"
            );
            Some(self.ctx.rules.set_rules(!reachable).await)
        } else {
            None
        };

        Reconciliation {
            reachable,
            observed,
            correction,
        }
    }

    /// One probe plus whatever transition handling it triggers.
    pub async fn tick(&self) -> TickReport {
        let reachable = self.ctx.probe.check().await;
        let rules = self.ctx.rules.rule_status().await.into_value();

        let transition = if reachable {
            self.handle_up(rules).await
        } else {
            self.handle_down().await
        };

        TickReport {
            reachable,
            rules,
            transition,
        }
    }

    async fn handle_down(&self) -> Option<Transition> {
        if !self.ctx.probe.verify_down().await {
            tracing::debug!(domain = %self.ctx.probe.target(), "Outage not confirmed");
            return None;
        }

        if self.ctx.gate.last_status().await.into_value() == AnnouncedStatus::Down {
            tracing::debug!(domain = %self.ctx.probe.target(), "Outage already announced");
            return None;
        }

        let domain = self.ctx.probe.target();
        tracing::warn!(domain = %domain, "Target confirmed down, switching to failover rules");

        let rules = self.ctx.rules.set_rules(true).await;
        let text = message::down_alert(domain, &self.timestamp(), rules.is_success());
        Some(self.announce(AnnouncedStatus::Down, rules, &text).await)
    }

    /// Confirm a recovery and announce UP if DOWN is still the last
    /// announced status.
    ///
    /// The announcement does not additionally require the rules to show
    /// failover: reconciliation may already have restored the normal pair,
    /// and the recovery must still be announced. `set_rules(false)` then
    /// returns `Unchanged` without remote writes.
    async fn handle_up(&self, rules: RulePair) -> Option<Transition> {
        if !self.ctx.probe.check().await {
            tracing::debug!(domain = %self.ctx.probe.target(), "Recovery not confirmed");
            return None;
        }

        if self.ctx.gate.last_status().await.into_value() == AnnouncedStatus::Up {
            return None;
        }

        let domain = self.ctx.probe.target();
        tracing::info!(
            domain = %domain,
            failover_active = rules.is_failover_active(),
            "Target recovered, restoring normal rules"
        );

        let write = self.ctx.rules.set_rules(false).await;
        let text = message::recovery_alert(domain, &self.timestamp(), write.is_success());
        Some(self.announce(AnnouncedStatus::Up, write, &text).await)
    }

    async fn announce(&self, status: AnnouncedStatus, rules: RuleWrite, text: &str) -> Transition {
        let delivered = self.ctx.gate.notify(text).await;
        if !delivered {
            tracing::warn!(status = %status, "Transition notification was not delivered");
        }
        let persisted = self.ctx.gate.set_last_status(status).await;

        metrics::counter!(TRANSITIONS_TOTAL, "status" => status.as_str()).increment(1);

        Transition {
            status,
            rules,
            delivered,
            persisted,
        }
    }

    /// Run one monitoring cycle: reconcile, then tick until the budget
    /// elapses or `cancel` fires.
    ///
    /// Cancellation takes effect between ticks; an in-flight tick always
    /// completes. Ticks start `interval` apart measured from the previous
    /// tick's start, so probe and update work does not stretch the cadence.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Result<CycleSummary, EngineError> {
        let _guard = self
            .run_guard
            .try_lock()
            .map_err(|_| EngineError::AlreadyRunning)?;

        let started = Instant::now();
        let deadline = self.settings.cycle_budget.map(|budget| started + budget);
        let mut summary = CycleSummary::default();

        self.reconcile().await;

        loop {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }

            let tick_started = Instant::now();
            let report = self.tick().await;
            summary.ticks += 1;
            if report.transition.is_some() {
                summary.transitions += 1;
            }

            let mut next = tick_started + self.settings.interval;
            if let Some(d) = deadline {
                next = next.min(d);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    summary.cancelled = true;
                    break;
                }
                _ = tokio::time::sleep_until(next) => {}
            }
        }

        tracing::debug!(
            ticks = summary.ticks,
            transitions = summary.transitions,
            cancelled = summary.cancelled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Monitoring cycle finished"
        );

        Ok(summary)
    }

    /// Run cycles back to back on a background task until cancelled.
    pub fn start(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                domain = %self.ctx.probe.target(),
                interval_ms = self.settings.interval.as_millis() as u64,
                "Failover engine started"
            );

            loop {
                match self.run_cycle(&cancel).await {
                    Ok(summary) if summary.cancelled => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Monitoring cycle skipped");
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            _ = tokio::time::sleep(self.settings.interval) => {}
                        }
                    }
                }

                if cancel.is_cancelled() {
                    break;
                }
            }

            tracing::info!("Failover engine shutting down");
        })
    }
}
