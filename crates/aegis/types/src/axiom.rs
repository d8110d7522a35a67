//! Axioms - the immutable policy rules engines check against.

use serde::{Deserialize, Serialize};

/// Severity of an axiom or the violations it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// An immutable policy rule. Reference data only; axioms are not created or
/// destroyed at runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Axiom {
    /// Stable identifier, e.g. "Π.1.1".
    pub id: String,
    pub name: String,
    pub category: String,
    pub severity: Severity,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Axiom {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            severity,
            enabled: true,
        }
    }
}

/// Axiom id reported when an engine itself fails and its result is
/// fault-isolated into a synthetic violation.
pub const AXIOM_ENGINE_INTEGRITY: &str = "Π.0.1";
/// Axiom id for a missing specification artifact.
pub const AXIOM_SPEC_PRESENCE: &str = "Π.1.1";
/// Axiom id for a missing test file.
pub const AXIOM_TEST_COVERAGE: &str = "Π.2.1";
/// Axiom id for non-deterministic test content.
pub const AXIOM_TEST_DETERMINISM: &str = "Π.3.1";

/// The built-in axiom roster covering the reference engines.
pub fn builtin_axioms() -> Vec<Axiom> {
    vec![
        Axiom::new(
            AXIOM_ENGINE_INTEGRITY,
            "Engine execution integrity",
            "governance",
            Severity::High,
        ),
        Axiom::new(
            AXIOM_SPEC_PRESENCE,
            "Specification artifact present",
            "specification",
            Severity::High,
        ),
        Axiom::new(
            AXIOM_TEST_COVERAGE,
            "Implementation files have tests",
            "testing",
            Severity::Medium,
        ),
        Axiom::new(
            AXIOM_TEST_DETERMINISM,
            "Tests are deterministic",
            "testing",
            Severity::Medium,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_is_enabled_with_unique_ids() {
        let axioms = builtin_axioms();
        assert!(axioms.iter().all(|a| a.enabled));

        let mut ids: Vec<_> = axioms.iter().map(|a| a.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), axioms.len());
    }

    #[test]
    fn severity_orders_low_to_critical() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_serializes_snake_case() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
