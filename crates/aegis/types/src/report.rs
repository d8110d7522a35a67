//! Compliance reports - the aggregate produced by one orchestrator run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::violation::{Violation, ViolationState};

/// Aggregate of one orchestrator run. Immutable after construction; violation
/// order is engine completion order and carries no correctness meaning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComplianceReport {
    repo_root: String,
    violations: Vec<Violation>,
}

/// Derived count view over a report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub new: usize,
    pub acknowledged: usize,
    pub resolved: usize,
    pub overridden: usize,
    pub by_axiom: BTreeMap<String, usize>,
}

impl ComplianceReport {
    pub fn new(repo_root: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            repo_root: repo_root.into(),
            violations,
        }
    }

    pub fn repo_root(&self) -> &str {
        &self.repo_root
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.violations.len(),
            ..ReportSummary::default()
        };
        for violation in &self.violations {
            match violation.state {
                ViolationState::New => summary.new += 1,
                ViolationState::Acknowledged => summary.acknowledged += 1,
                ViolationState::Resolved => summary.resolved += 1,
                ViolationState::Overridden => summary.overridden += 1,
            }
            *summary
                .by_axiom
                .entry(violation.axiom_id.clone())
                .or_insert(0) += 1;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_compliant() {
        let report = ComplianceReport::new(".", vec![]);
        assert!(report.is_compliant());
        assert_eq!(report.summary(), ReportSummary::default());
    }

    #[test]
    fn summary_counts_states_and_axioms() {
        let mut acked = Violation::new("Π.2.1", "src/b.rs", "no test");
        acked.transition_to(ViolationState::Acknowledged).unwrap();

        let report = ComplianceReport::new(
            "/repo",
            vec![
                Violation::new("Π.1.1", ".", "no spec"),
                Violation::new("Π.2.1", "src/a.rs", "no test"),
                acked,
            ],
        );

        let summary = report.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.new, 2);
        assert_eq!(summary.acknowledged, 1);
        assert_eq!(summary.by_axiom.get("Π.2.1"), Some(&2));
        assert_eq!(report.repo_root(), "/repo");
    }
}
