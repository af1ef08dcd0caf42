//! Unit tests for the failover engine.

use super::*;
use crate::notify::{MemoryStatusStore, NotificationGate, StatusStore};
use crate::probe::HealthProbe;
use crate::rules::RuleController;
use crate::testing::{FakeRuleApi, RecordingNotifier, ScriptedProbe};
use std::time::Duration;

struct Harness {
    engine: Arc<FailoverEngine>,
    probe: Arc<ScriptedProbe>,
    api: Arc<FakeRuleApi>,
    notifier: Arc<RecordingNotifier>,
    store: Arc<MemoryStatusStore>,
}

impl Harness {
    async fn new(script: &[bool], reachable: bool, remote: RulePair, announced: AnnouncedStatus) -> Self {
        Self::with_settings(script, reachable, remote, announced, settings()).await
    }

    async fn with_settings(
        script: &[bool],
        reachable: bool,
        remote: RulePair,
        announced: AnnouncedStatus,
        settings: FailoverSettings,
    ) -> Self {
        let probe = Arc::new(ScriptedProbe::new(script, reachable));
        let api = Arc::new(FakeRuleApi::with_pair(remote));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = Arc::new(MemoryStatusStore::default());
        store.put("lastStatus", announced.as_str()).await.unwrap();

        let ctx = FailoverContext::new(
            HealthProbe::new(probe.clone(), "example.com", 3, Duration::from_secs(15)),
            RuleController::new(api.clone(), FakeRuleApi::ids(), Duration::from_secs(30)),
            NotificationGate::new(store.clone(), notifier.clone(), "lastStatus"),
        );

        Self {
            engine: Arc::new(FailoverEngine::new(Arc::new(ctx), settings)),
            probe,
            api,
            notifier,
            store,
        }
    }

    async fn announced(&self) -> Option<String> {
        self.store.get("lastStatus").await.unwrap()
    }
}

fn settings() -> FailoverSettings {
    FailoverSettings {
        interval: Duration::from_secs(5),
        cycle_budget: Some(Duration::from_secs(20)),
        utc_offset_minutes: 0,
    }
}

// ============================================================================
// Tick scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_healthy_and_in_sync_does_nothing() {
    let h = Harness::new(&[], true, RulePair::NORMAL, AnnouncedStatus::Up).await;

    let report = h.engine.tick().await;

    assert!(report.reachable);
    assert_eq!(report.rules, RulePair::NORMAL);
    assert!(report.transition.is_none());
    assert_eq!(h.api.writes(), 0);
    assert!(h.notifier.messages().is_empty());
    assert_eq!(h.announced().await.as_deref(), Some("UP"));
}

#[tokio::test(start_paused = true)]
async fn test_confirmed_outage_announces_down_once() {
    let h = Harness::new(&[], false, RulePair::NORMAL, AnnouncedStatus::Up).await;

    let transition = h.engine.tick().await.transition.expect("down transition");
    assert_eq!(transition.status, AnnouncedStatus::Down);
    assert_eq!(transition.rules, RuleWrite::Applied);
    assert!(transition.delivered);
    assert!(transition.persisted);

    assert_eq!(h.api.remote_pair(), RulePair::FAILOVER);
    assert_eq!(h.announced().await.as_deref(), Some("DOWN"));
    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Status: DOWN"));
    assert!(messages[0].contains("Main Page Rule enabled, Backup Page Rule disabled"));

    // Still down: verified again but not re-announced.
    assert!(h.engine.tick().await.transition.is_none());
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_outage_is_verified_with_every_retry() {
    let h = Harness::new(&[], false, RulePair::NORMAL, AnnouncedStatus::Up).await;
    let start = tokio::time::Instant::now();

    h.engine.tick().await;

    // Initial probe plus three verification probes, two delays between them.
    assert_eq!(h.probe.calls(), 4);
    assert_eq!(start.elapsed(), Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_transient_blip_is_debounced() {
    let h = Harness::new(&[false, false, true], true, RulePair::NORMAL, AnnouncedStatus::Up).await;

    let report = h.engine.tick().await;

    assert!(!report.reachable);
    assert!(report.transition.is_none());
    assert_eq!(h.api.writes(), 0);
    assert!(h.notifier.messages().is_empty());
    assert_eq!(h.announced().await.as_deref(), Some("UP"));
}

#[tokio::test(start_paused = true)]
async fn test_recovery_announces_up_and_restores_rules() {
    let h = Harness::new(&[], true, RulePair::FAILOVER, AnnouncedStatus::Down).await;

    let transition = h.engine.tick().await.transition.expect("up transition");
    assert_eq!(transition.status, AnnouncedStatus::Up);
    assert_eq!(transition.rules, RuleWrite::Applied);

    assert_eq!(h.api.remote_pair(), RulePair::NORMAL);
    assert_eq!(h.announced().await.as_deref(), Some("UP"));
    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Website Recovery Alert"));
    assert!(messages[0].contains("Main Page Rule disabled, Backup Page Rule enabled"));

    assert!(h.engine.tick().await.transition.is_none());
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_recovery_not_confirmed_by_second_probe() {
    let h = Harness::new(&[true, false], true, RulePair::FAILOVER, AnnouncedStatus::Down).await;

    let report = h.engine.tick().await;

    assert!(report.reachable);
    assert!(report.transition.is_none());
    assert_eq!(h.api.remote_pair(), RulePair::FAILOVER);
}

#[tokio::test(start_paused = true)]
async fn test_recovery_announced_when_rules_already_normal() {
    let h = Harness::new(&[], true, RulePair::NORMAL, AnnouncedStatus::Down).await;

    let transition = h.engine.tick().await.transition.expect("up transition");

    assert_eq!(transition.status, AnnouncedStatus::Up);
    assert_eq!(transition.rules, RuleWrite::Unchanged);
    assert_eq!(h.api.writes(), 0);
    assert_eq!(h.announced().await.as_deref(), Some("UP"));
    assert!(h.notifier.messages()[0].contains("Backup Page Rule enabled"));
}

#[tokio::test(start_paused = true)]
async fn test_undelivered_notification_still_persists_status() {
    let h = Harness::new(&[], false, RulePair::NORMAL, AnnouncedStatus::Up).await;
    h.notifier.set_failing(true);

    let transition = h.engine.tick().await.transition.expect("down transition");

    assert!(!transition.delivered);
    assert!(transition.persisted);
    assert_eq!(h.announced().await.as_deref(), Some("DOWN"));
    assert_eq!(h.api.remote_pair(), RulePair::FAILOVER);

    // No repeat attempt for an already persisted announcement.
    assert!(h.engine.tick().await.transition.is_none());
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_rule_write_is_reported_and_reconciled() {
    let h = Harness::new(&[], false, RulePair::NORMAL, AnnouncedStatus::Up).await;
    h.api.fail_writes_for("main");
    h.api.fail_writes_for("backup");

    let transition = h.engine.tick().await.transition.expect("down transition");
    assert!(matches!(transition.rules, RuleWrite::Failed { .. }));
    assert!(h.notifier.messages()[0].contains("Main Page Rule failed to enable"));
    assert_eq!(h.announced().await.as_deref(), Some("DOWN"));

    // The next cycle's reconciliation retries the write.
    h.api.clear_write_failures();
    let reconciliation = h.engine.reconcile().await;
    assert_eq!(reconciliation.correction, Some(RuleWrite::Applied));
    assert_eq!(h.api.remote_pair(), RulePair::FAILOVER);
    assert_eq!(h.notifier.messages().len(), 1);
}

// ============================================================================
// Reconciliation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_reconcile_in_sync_issues_no_write() {
    let h = Harness::new(&[], true, RulePair::NORMAL, AnnouncedStatus::Up).await;

    let reconciliation = h.engine.reconcile().await;

    assert!(reconciliation.reachable);
    assert!(reconciliation.correction.is_none());
    assert_eq!(h.api.writes(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reconcile_restores_normal_rules_without_notifying() {
    let h = Harness::new(&[], true, RulePair::FAILOVER, AnnouncedStatus::Up).await;

    let reconciliation = h.engine.reconcile().await;

    assert_eq!(reconciliation.observed, RulePair::FAILOVER);
    assert_eq!(reconciliation.correction, Some(RuleWrite::Applied));
    assert_eq!(h.api.remote_pair(), RulePair::NORMAL);
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reconcile_fixes_drifted_pair_while_down() {
    let drifted = RulePair {
        main: true,
        backup: true,
    };
    let h = Harness::new(&[], false, drifted, AnnouncedStatus::Down).await;

    let reconciliation = h.engine.reconcile().await;

    assert!(!reconciliation.reachable);
    assert_eq!(reconciliation.correction, Some(RuleWrite::Applied));
    assert_eq!(h.api.remote_pair(), RulePair::FAILOVER);
}

#[tokio::test(start_paused = true)]
async fn test_reconcile_with_unreadable_rules_drives_target() {
    let h = Harness::new(&[], true, RulePair::NORMAL, AnnouncedStatus::Up).await;
    h.api.fail_reads(true);

    // Unreadable rules fall back to both-disabled, which is not normal.
    let reconciliation = h.engine.reconcile().await;

    assert_eq!(reconciliation.observed, RulePair::default());
    assert_eq!(reconciliation.correction, Some(RuleWrite::Applied));
    assert_eq!(h.api.remote_pair(), RulePair::NORMAL);
}

// ============================================================================
// Cycle loop
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_cycle_ticks_on_interval_until_budget() {
    let h = Harness::new(&[], true, RulePair::NORMAL, AnnouncedStatus::Up).await;
    let start = tokio::time::Instant::now();

    let summary = h.engine.run_cycle(&CancellationToken::new()).await.unwrap();

    // Ticks at 0s, 5s, 10s and 15s inside a 20s budget.
    assert_eq!(summary.ticks, 4);
    assert_eq!(summary.transitions, 0);
    assert!(!summary.cancelled);
    assert_eq!(start.elapsed(), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn test_slow_ticks_do_not_add_interval_on_top() {
    let settings = FailoverSettings {
        cycle_budget: Some(Duration::from_secs(60)),
        ..self::settings()
    };
    let h = Harness::with_settings(&[], false, RulePair::FAILOVER, AnnouncedStatus::Down, settings)
        .await;

    let summary = h.engine.run_cycle(&CancellationToken::new()).await.unwrap();

    // Each tick spends 30s verifying; the next starts immediately after.
    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.transitions, 0);
}

#[tokio::test(start_paused = true)]
async fn test_cycle_announces_outage_during_run() {
    let settings = FailoverSettings {
        cycle_budget: Some(Duration::from_secs(60)),
        ..self::settings()
    };
    // Reconciliation probe and the first tick succeed, then the target dies.
    let h = Harness::with_settings(
        &[true, true, true],
        false,
        RulePair::NORMAL,
        AnnouncedStatus::Up,
        settings,
    )
    .await;

    let summary = h.engine.run_cycle(&CancellationToken::new()).await.unwrap();

    assert_eq!(summary.transitions, 1);
    assert_eq!(h.notifier.messages().len(), 1);
    assert_eq!(h.api.remote_pair(), RulePair::FAILOVER);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_between_ticks() {
    let settings = FailoverSettings {
        cycle_budget: None,
        ..self::settings()
    };
    let h = Harness::with_settings(&[], true, RulePair::NORMAL, AnnouncedStatus::Up, settings).await;
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(7)).await;
        trigger.cancel();
    });

    let summary = h.engine.run_cycle(&cancel).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.ticks, 2);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_cycle_is_rejected() {
    let settings = FailoverSettings {
        cycle_budget: None,
        ..self::settings()
    };
    let h = Harness::with_settings(&[], true, RulePair::NORMAL, AnnouncedStatus::Up, settings).await;
    let cancel = CancellationToken::new();

    let engine = Arc::clone(&h.engine);
    let running = cancel.clone();
    let first = tokio::spawn(async move { engine.run_cycle(&running).await });
    tokio::time::sleep(Duration::from_secs(1)).await;

    let second = h.engine.run_cycle(&cancel).await;
    assert!(matches!(second, Err(EngineError::AlreadyRunning)));

    cancel.cancel();
    let summary = first.await.unwrap().unwrap();
    assert!(summary.cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_stops_on_cancel() {
    let h = Harness::new(&[], true, RulePair::NORMAL, AnnouncedStatus::Up).await;
    let cancel = CancellationToken::new();

    let handle = Arc::clone(&h.engine).start(cancel.clone());
    tokio::time::sleep(Duration::from_secs(45)).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
    assert!(result.is_ok());
    // Two full cycles reconciled plus the one that was cancelled.
    assert!(h.probe.calls() > 10);
}

// ============================================================================
// Announcement properties
// ============================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Announcements alternate DOWN/UP starting from UP, and the
        /// persisted status always matches the latest stable verdict.
        #[test]
        fn prop_announcements_alternate(verdicts in proptest::collection::vec(any::<bool>(), 1..24)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();

            runtime.block_on(async {
                let h = Harness::new(&[], true, RulePair::NORMAL, AnnouncedStatus::Up).await;
                let mut announced = AnnouncedStatus::Up;
                let mut transitions = 0;

                for reachable in verdicts {
                    h.probe.set_reachable(reachable);
                    let report = h.engine.tick().await;

                    if let Some(transition) = report.transition {
                        prop_assert_ne!(transition.status, announced);
                        announced = transition.status;
                        transitions += 1;
                    }

                    let expected = if reachable { AnnouncedStatus::Up } else { AnnouncedStatus::Down };
                    prop_assert_eq!(announced, expected);
                    prop_assert_eq!(h.api.remote_pair(), RulePair::target(!reachable));
                }

                prop_assert_eq!(h.notifier.messages().len(), transitions);
                Ok(())
            })?;
        }
    }
}
