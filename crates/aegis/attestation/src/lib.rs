//! Agent self-attestation recording with confidence-based escalation.
//!
//! An agent self-certifies its compliance for a task with a confidence score.
//! Scores below [`CONFIDENCE_THRESHOLD`] are escalated to secondary review.
//! Every attestation and escalation is committed to the audit chain; an audit
//! write failure aborts the operation.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use aegis_audit::{AuditError, AuditLog};
use aegis_orchestrator::{Orchestrator, OrchestratorError};
use aegis_types::{Attestation, AttestationStatus, Violation};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

/// Confidence below this escalates; the boundary value itself passes.
pub const CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Attestation errors.
#[derive(Debug, Error)]
pub enum AttestationError {
    /// Malformed input, rejected before any audit write.
    #[error("invalid attestation input: {0}")]
    Validation(String),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// Records attestations and runs pre-execution compliance self-checks.
pub struct AttestationService {
    audit: Arc<AuditLog>,
    orchestrator: Arc<Orchestrator>,
}

impl AttestationService {
    /// The audit log must be the same instance the orchestrator writes to,
    /// so all governance decisions land on one chain.
    pub fn new(audit: Arc<AuditLog>, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            audit,
            orchestrator,
        }
    }

    /// Record an attestation. Exactly one `ATTESTATION_RECORDED` entry is
    /// written; if the confidence falls below the threshold an
    /// `ESCALATION_TRIGGERED` entry follows immediately.
    pub async fn record(
        &self,
        agent_id: &str,
        task_id: &str,
        confidence: f64,
        axioms_applied: Vec<String>,
    ) -> Result<Attestation, AttestationError> {
        if !(0.0..=1.0).contains(&confidence) || confidence.is_nan() {
            return Err(AttestationError::Validation(format!(
                "confidence {confidence} outside [0, 1]"
            )));
        }

        let status = if confidence < CONFIDENCE_THRESHOLD {
            AttestationStatus::Escalated
        } else {
            AttestationStatus::Passed
        };

        let attestation =
            Attestation::new(agent_id, task_id, confidence, axioms_applied, status);

        self.audit
            .append(
                "ATTESTATION_RECORDED",
                json!({
                    "agent_id": attestation.agent_id,
                    "task_id": attestation.task_id,
                    "confidence": attestation.confidence,
                    "axioms_applied": attestation.axioms_applied,
                    "status": attestation.status,
                }),
            )
            .await?;

        if status == AttestationStatus::Escalated {
            warn!(
                agent_id,
                task_id, confidence, "attestation escalated for review"
            );
            self.audit
                .append(
                    "ESCALATION_TRIGGERED",
                    json!({
                        "agent_id": attestation.agent_id,
                        "task_id": attestation.task_id,
                        "confidence": attestation.confidence,
                        "reason": format!(
                            "Confidence {confidence} below threshold {CONFIDENCE_THRESHOLD}"
                        ),
                    }),
                )
                .await?;
        } else {
            info!(agent_id, task_id, confidence, "attestation passed");
        }

        Ok(attestation)
    }

    /// Pre-execution compliance self-check: logs `PRE_CHECK_RUN`, then
    /// delegates to the orchestrator and returns its findings.
    pub async fn pre_check(
        &self,
        files: &[PathBuf],
    ) -> Result<Vec<Violation>, AttestationError> {
        self.audit
            .append("PRE_CHECK_RUN", json!({ "files_count": files.len() }))
            .await?;

        let report = self.orchestrator.run(files).await?;
        Ok(report.into_violations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn service() -> AttestationService {
        let audit = Arc::new(AuditLog::in_memory());
        let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&audit), Path::new(".")));
        AttestationService::new(audit, orchestrator)
    }

    #[tokio::test]
    async fn boundary_confidence_passes() {
        let service = service();
        let attestation = service
            .record("a1", "T1", 0.7, vec!["S.1".into()])
            .await
            .unwrap();
        assert_eq!(attestation.status, AttestationStatus::Passed);

        let entries = service.audit.list(0).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "ATTESTATION_RECORDED");
        assert_eq!(entries[0].details["status"], "passed");
    }

    #[tokio::test]
    async fn below_threshold_escalates_with_audit_order() {
        let service = service();
        let attestation = service.record("a1", "T2", 0.69, vec![]).await.unwrap();
        assert_eq!(attestation.status, AttestationStatus::Escalated);

        // Newest-first: escalation entry sits on top of the attestation entry.
        let entries = service.audit.list(2).await.unwrap();
        assert_eq!(entries[0].action, "ESCALATION_TRIGGERED");
        assert_eq!(entries[1].action, "ATTESTATION_RECORDED");

        let reason = entries[0].details["reason"].as_str().unwrap();
        assert!(reason.contains("0.69"));
        assert!(reason.contains("0.7"));
    }

    #[tokio::test]
    async fn out_of_range_confidence_is_rejected_before_any_write() {
        let service = service();
        for confidence in [-0.1, 1.5, f64::NAN] {
            let result = service.record("a1", "T3", confidence, vec![]).await;
            assert!(matches!(result, Err(AttestationError::Validation(_))));
        }
        assert!(service.audit.list(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attestation_preserves_axiom_order() {
        let service = service();
        let attestation = service
            .record("a1", "T4", 0.9, vec!["Π.2.1".into(), "Π.1.1".into()])
            .await
            .unwrap();
        assert_eq!(attestation.axioms_applied, vec!["Π.2.1", "Π.1.1"]);

        let entries = service.audit.list(1).await.unwrap();
        assert_eq!(
            entries[0].details["axioms_applied"],
            serde_json::json!(["Π.2.1", "Π.1.1"])
        );
    }

    #[tokio::test]
    async fn pre_check_logs_then_delegates() {
        let service = service();
        let violations = service
            .pre_check(&[PathBuf::from("src/a.rs")])
            .await
            .unwrap();
        assert!(violations.is_empty());

        // PRE_CHECK_RUN precedes the orchestrator's RUN_START/RUN_COMPLETE.
        let entries = service.audit.list(0).await.unwrap();
        let actions: Vec<_> = entries.iter().rev().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["PRE_CHECK_RUN", "RUN_START", "RUN_COMPLETE"]);
        assert_eq!(entries[2].details["files_count"], 1);

        service.audit.verify_chain().await.unwrap();
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn escalates_iff_confidence_below_threshold(confidence in 0.0f64..=1.0) {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("runtime");

                rt.block_on(async move {
                    let service = service();
                    let attestation = service
                        .record("prop-agent", "prop-task", confidence, vec![])
                        .await
                        .expect("attestation");

                    let expected = if confidence < CONFIDENCE_THRESHOLD {
                        AttestationStatus::Escalated
                    } else {
                        AttestationStatus::Passed
                    };
                    assert_eq!(attestation.status, expected);

                    // Exactly one extra audit entry iff escalated.
                    let entries = service.audit.list(0).await.expect("list");
                    let expected_len =
                        if expected == AttestationStatus::Escalated { 2 } else { 1 };
                    assert_eq!(entries.len(), expected_len);
                    service.audit.verify_chain().await.expect("chain");
                });
            }
        }
    }
}
