//! The check-engine interface.

use std::path::PathBuf;

use aegis_types::Violation;
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single engine's check. Recoverable: the orchestrator
/// fault-isolates it into a synthetic violation instead of aborting the run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine {engine} failed: {reason}")]
    Failed { engine: String, reason: String },
}

/// A pluggable compliance checker.
///
/// Contract:
/// - `check` is read-only with respect to the file system
/// - a disabled engine (`should_run() == false`) returns an empty sequence
///   without inspecting any file
/// - a missing or unreadable artifact is ignored or reported as a violation,
///   never surfaced as an error that aborts the run
#[async_trait]
pub trait CheckEngine: Send + Sync {
    /// Stable engine name, used in audit details and synthetic violations.
    fn name(&self) -> &str;

    /// Gate derived from the engine's configuration.
    fn should_run(&self) -> bool;

    /// Inspect the ordered file set and return findings.
    async fn check(&self, files: &[PathBuf]) -> Result<Vec<Violation>, EngineError>;
}
