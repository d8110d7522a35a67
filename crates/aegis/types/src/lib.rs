//! Aegis governance core types.
//!
//! Value types shared across the governance workspace:
//! - [`Axiom`] — immutable policy rules identified by stable ids
//! - [`Violation`] — engine findings with a one-way lifecycle state machine
//! - [`ComplianceReport`] — the aggregate produced by one orchestrator run
//! - [`Decision`] / [`Override`] — governance actions with review gating
//! - [`Attestation`] — an agent's self-certification for a task

#![deny(unsafe_code)]

pub mod attestation;
pub mod axiom;
pub mod decision;
pub mod report;
pub mod violation;

pub use attestation::{Attestation, AttestationStatus};
pub use axiom::{
    builtin_axioms, Axiom, Severity, AXIOM_ENGINE_INTEGRITY, AXIOM_SPEC_PRESENCE,
    AXIOM_TEST_COVERAGE, AXIOM_TEST_DETERMINISM,
};
pub use decision::{Criticality, Decision, Override};
pub use report::{ComplianceReport, ReportSummary};
pub use violation::{TransitionError, Violation, ViolationState};
