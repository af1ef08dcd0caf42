//! In-memory doubles for the probe, rule API, notifier and store seams.

use crate::notify::{NotifyError, Notifier, StatusStore, StoreError};
use crate::probe::{ProbeError, ProbeOutcome, ProbeTransport};
use crate::rules::{RuleApi, RuleApiError, RuleIds, RulePair, RuleStatus};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Answers probes from a script, then with a fixed default.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<bool>>,
    default: AtomicBool,
    targets: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new(script: &[bool], default: bool) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
            default: AtomicBool::new(default),
            targets: Mutex::new(Vec::new()),
        }
    }

    /// Reachable/unreachable for every probe from now on.
    pub fn set_reachable(&self, reachable: bool) {
        self.script.lock().unwrap().clear();
        self.default.store(reachable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.targets.lock().unwrap().len()
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProbeTransport for ScriptedProbe {
    async fn probe(&self, target: &str) -> ProbeOutcome {
        self.targets.lock().unwrap().push(target.to_string());
        let reachable = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.load(Ordering::SeqCst));

        if reachable {
            ProbeOutcome::Reachable {
                status: 200,
                latency_ms: 5,
            }
        } else {
            ProbeOutcome::Unreachable {
                error: ProbeError::ConnectionFailed("scripted".to_string()),
            }
        }
    }
}

/// Rule control plane holding statuses in a map keyed by rule id.
pub struct FakeRuleApi {
    remote: Mutex<HashMap<String, RuleStatus>>,
    fail_reads: AtomicBool,
    failing_writes: Mutex<HashSet<String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl FakeRuleApi {
    pub fn ids() -> RuleIds {
        RuleIds {
            main: "main".to_string(),
            backup: "backup".to_string(),
        }
    }

    pub fn with_pair(pair: RulePair) -> Self {
        let remote = HashMap::from([
            ("main".to_string(), RuleStatus::from(pair.main)),
            ("backup".to_string(), RuleStatus::from(pair.backup)),
        ]);
        Self {
            remote: Mutex::new(remote),
            fail_reads: AtomicBool::new(false),
            failing_writes: Mutex::new(HashSet::new()),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn set_remote(&self, rule_id: &str, status: RuleStatus) {
        self.remote
            .lock()
            .unwrap()
            .insert(rule_id.to_string(), status);
    }

    pub fn remote_pair(&self) -> RulePair {
        let remote = self.remote.lock().unwrap();
        RulePair {
            main: remote["main"].is_active(),
            backup: remote["backup"].is_active(),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes_for(&self, rule_id: &str) {
        self.failing_writes
            .lock()
            .unwrap()
            .insert(rule_id.to_string());
    }

    pub fn clear_write_failures(&self) {
        self.failing_writes.lock().unwrap().clear();
    }

    /// Individual rule reads issued so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Individual rule writes issued so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuleApi for FakeRuleApi {
    async fn fetch_status(&self, rule_id: &str) -> Result<RuleStatus, RuleApiError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RuleApiError::Network("read refused".to_string()));
        }
        self.remote
            .lock()
            .unwrap()
            .get(rule_id)
            .copied()
            .ok_or_else(|| RuleApiError::InvalidResponse(format!("unknown rule {}", rule_id)))
    }

    async fn update_status(&self, rule_id: &str, status: RuleStatus) -> Result<(), RuleApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing_writes.lock().unwrap().contains(rule_id) {
            return Err(RuleApiError::Upstream {
                status: 500,
                message: "write refused".to_string(),
            });
        }
        self.set_remote(rule_id, status);
        Ok(())
    }
}

/// Collects every message; acknowledges by default.
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    ack: AtomicBool,
    failing: AtomicBool,
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            ack: AtomicBool::new(true),
            failing: AtomicBool::new(false),
        }
    }
}

impl RecordingNotifier {
    pub fn set_ack(&self, ack: bool) {
        self.ack.store(ack, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<bool, NotifyError> {
        self.messages.lock().unwrap().push(text.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Network("channel unreachable".to_string()));
        }
        Ok(self.ack.load(Ordering::SeqCst))
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl StatusStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("store offline")))
    }

    async fn put(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("store offline")))
    }
}
