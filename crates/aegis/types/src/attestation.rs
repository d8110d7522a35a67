//! Agent self-attestations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of an attestation after confidence evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationStatus {
    Pending,
    Passed,
    Failed,
    Escalated,
}

/// An agent's self-certification that it satisfied the applicable axioms for
/// one task. Created exactly once per record call, immutable thereafter, and
/// never deleted (audit requirement).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attestation {
    pub attestation_id: String,
    pub agent_id: String,
    pub task_id: String,
    /// Self-reported confidence in [0, 1].
    pub confidence: f64,
    /// Axiom ids in application order; order is significant.
    pub axioms_applied: Vec<String>,
    pub status: AttestationStatus,
    pub timestamp: DateTime<Utc>,
}

impl Attestation {
    pub fn new(
        agent_id: impl Into<String>,
        task_id: impl Into<String>,
        confidence: f64,
        axioms_applied: Vec<String>,
        status: AttestationStatus,
    ) -> Self {
        Self {
            attestation_id: format!("att-{}", Uuid::new_v4()),
            agent_id: agent_id.into(),
            task_id: task_id.into(),
            confidence,
            axioms_applied,
            status,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&AttestationStatus::Escalated).unwrap();
        assert_eq!(json, "\"escalated\"");
    }

    #[test]
    fn attestation_preserves_axiom_application_order() {
        let att = Attestation::new(
            "agent-1",
            "T1",
            0.9,
            vec!["Π.2.1".into(), "Π.1.1".into()],
            AttestationStatus::Passed,
        );
        assert_eq!(att.axioms_applied, vec!["Π.2.1", "Π.1.1"]);
        assert!(att.attestation_id.starts_with("att-"));
    }
}
