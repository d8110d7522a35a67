//! Governance decisions and time-boxed overrides.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Criticality attached to a governance decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Low,
    Medium,
    High,
    Critical,
}

/// A human or automated governance action against an axiom.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Decision {
    pub axiom_id: String,
    pub rationale: String,
    pub criticality: Criticality,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Decision {
    pub fn new(
        axiom_id: impl Into<String>,
        rationale: impl Into<String>,
        criticality: Criticality,
    ) -> Self {
        Self {
            axiom_id: axiom_id.into(),
            rationale: rationale.into(),
            criticality,
            timestamp: Utc::now(),
        }
    }

    /// High and critical decisions always require a human in the loop.
    pub fn requires_human_review(&self) -> bool {
        matches!(self.criticality, Criticality::High | Criticality::Critical)
    }
}

/// A decision that temporarily suppresses an axiom. Expires after
/// `expires_in_days`; an expired override is inert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Override {
    #[serde(flatten)]
    pub decision: Decision,
    #[serde(default = "default_expires_in_days")]
    pub expires_in_days: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_expires_in_days() -> i64 {
    90
}

impl Override {
    pub fn new(decision: Decision, expires_in_days: i64) -> Self {
        Self {
            decision,
            expires_in_days,
            scope: None,
        }
    }

    /// Whether the override is still in force at `now`:
    /// `timestamp + expires_in_days > now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.decision.timestamp + Duration::days(self.expires_in_days) > now
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}
