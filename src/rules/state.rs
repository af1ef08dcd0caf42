//! Rule pair state and write outcomes.

use serde::{Deserialize, Serialize};

/// Remote status of a single page rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Active,
    Disabled,
}

impl RuleStatus {
    pub fn is_active(self) -> bool {
        self == RuleStatus::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleStatus::Active => "active",
            RuleStatus::Disabled => "disabled",
        }
    }
}

impl From<bool> for RuleStatus {
    fn from(active: bool) -> Self {
        if active {
            RuleStatus::Active
        } else {
            RuleStatus::Disabled
        }
    }
}

/// The main/backup rule toggles, read or written together.
///
/// Once synchronised `main == !backup`; anything else is drift that the
/// next reconciliation corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RulePair {
    pub main: bool,
    pub backup: bool,
}

impl RulePair {
    /// Traffic diverted away from the origin.
    pub const FAILOVER: RulePair = RulePair {
        main: true,
        backup: false,
    };

    /// Traffic served by the origin.
    pub const NORMAL: RulePair = RulePair {
        main: false,
        backup: true,
    };

    /// Desired pair for an origin that is (or is not) down.
    pub fn target(down: bool) -> Self {
        if down {
            Self::FAILOVER
        } else {
            Self::NORMAL
        }
    }

    /// True unless the pair is exactly the normal configuration.
    pub fn is_failover_active(&self) -> bool {
        self.main || !self.backup
    }

    pub fn is_synchronized(&self) -> bool {
        self.main != self.backup
    }
}

/// Outcome of driving the rule pair to a target state.
///
/// The two remote writes are independent; there is no rollback when only
/// one of them lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleWrite {
    /// The cache already showed the target pair; nothing was sent
    Unchanged,
    /// Both writes were acknowledged
    Applied,
    /// Exactly one write was acknowledged
    Partial {
        main_applied: bool,
        backup_applied: bool,
        reason: String,
    },
    /// Neither write was acknowledged
    Failed { reason: String },
}

impl RuleWrite {
    pub fn is_success(&self) -> bool {
        matches!(self, RuleWrite::Unchanged | RuleWrite::Applied)
    }

    pub(crate) fn outcome_label(&self) -> &'static str {
        match self {
            RuleWrite::Unchanged => "unchanged",
            RuleWrite::Applied => "applied",
            RuleWrite::Partial { .. } => "partial",
            RuleWrite::Failed { .. } => "failed",
        }
    }
}
