//! Compliance-run orchestration.
//!
//! Fans the configured engine roster out as independent concurrent tasks,
//! joins them, and aggregates their findings into one
//! [`aegis_types::ComplianceReport`]. Every run is bracketed by `RUN_START`
//! and `RUN_COMPLETE` audit entries.
//!
//! Join semantics are fault-isolated: a failing (or panicking) engine
//! contributes one synthetic violation instead of aborting the run, so every
//! `RUN_START` pairs with a `RUN_COMPLETE`. The exception is
//! [`Orchestrator::run_with_timeout`]: on expiry the run is aborted
//! mid-flight, partial results are discarded, and no `RUN_COMPLETE` is
//! written, since the chain has no way to mark partial runs.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use aegis_audit::{AuditError, AuditLog};
use aegis_engines::{CheckEngine, EngineError};
use aegis_types::{ComplianceReport, Violation, AXIOM_ENGINE_INTEGRITY};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// An audit write failed. Fatal: governance decisions must be recorded.
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// The caller-supplied deadline expired before all engines completed.
    #[error("compliance run timed out after {0:?}")]
    Timeout(Duration),
}

/// Runs the registered engines concurrently and aggregates their findings.
///
/// Collaborators are injected explicitly; the orchestrator holds no global
/// state and one audit log instance is shared with the other services.
pub struct Orchestrator {
    engines: Vec<Arc<dyn CheckEngine>>,
    audit: Arc<AuditLog>,
    repo_root: PathBuf,
}

impl Orchestrator {
    pub fn new(audit: Arc<AuditLog>, repo_root: &Path) -> Self {
        Self {
            engines: Vec::new(),
            audit,
            repo_root: repo_root.to_path_buf(),
        }
    }

    pub fn with_engines(
        audit: Arc<AuditLog>,
        repo_root: &Path,
        engines: Vec<Arc<dyn CheckEngine>>,
    ) -> Self {
        Self {
            engines,
            audit,
            repo_root: repo_root.to_path_buf(),
        }
    }

    /// Register an engine. The roster is open; nothing in the run loop names
    /// concrete engine types.
    pub fn register(&mut self, engine: Arc<dyn CheckEngine>) {
        self.engines.push(engine);
    }

    pub fn audit(&self) -> Arc<AuditLog> {
        Arc::clone(&self.audit)
    }

    /// Run all enabled engines against `files` and aggregate the results.
    ///
    /// Violation order preserves per-engine order; inter-engine ordering is
    /// completion order and carries no meaning.
    pub async fn run(&self, files: &[PathBuf]) -> Result<ComplianceReport, OrchestratorError> {
        self.audit
            .append("RUN_START", json!({ "files_count": files.len() }))
            .await?;

        // JoinSet aborts in-flight tasks when dropped, which is what makes
        // run_with_timeout's cancellation actually stop engine work.
        let mut tasks: JoinSet<(String, Result<Vec<Violation>, EngineError>)> = JoinSet::new();
        for engine in &self.engines {
            if !engine.should_run() {
                debug!(engine = engine.name(), "engine disabled, skipping");
                continue;
            }
            let engine = Arc::clone(engine);
            let name = engine.name().to_string();
            let files = files.to_vec();
            tasks.spawn(async move {
                let result = engine.check(&files).await;
                (name, result)
            });
        }

        let mut violations: Vec<Violation> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(found))) => {
                    debug!(engine = %name, count = found.len(), "engine completed");
                    violations.extend(found);
                }
                Ok((name, Err(err))) => {
                    warn!(engine = %name, error = %err, "engine failed, isolating");
                    violations.push(engine_failure_violation(&name, &err.to_string()));
                }
                Err(join_err) => {
                    warn!(error = %join_err, "engine panicked, isolating");
                    violations.push(engine_failure_violation("unknown", "engine task panicked"));
                }
            }
        }

        self.audit
            .append(
                "RUN_COMPLETE",
                json!({ "violations_count": violations.len() }),
            )
            .await?;

        info!(
            violations = violations.len(),
            files = files.len(),
            "compliance run complete"
        );
        Ok(ComplianceReport::new(
            self.repo_root.display().to_string(),
            violations,
        ))
    }

    /// Like [`run`](Self::run), but aborted wholesale when `deadline`
    /// expires. In-flight engine work is dropped and partial results are
    /// discarded; no `RUN_COMPLETE` entry is written for a timed-out run.
    pub async fn run_with_timeout(
        &self,
        files: &[PathBuf],
        deadline: Duration,
    ) -> Result<ComplianceReport, OrchestratorError> {
        match tokio::time::timeout(deadline, self.run(files)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(?deadline, "compliance run timed out");
                Err(OrchestratorError::Timeout(deadline))
            }
        }
    }
}

/// Synthetic violation standing in for a failed engine's findings.
fn engine_failure_violation(engine: &str, reason: &str) -> Violation {
    Violation::new(
        AXIOM_ENGINE_INTEGRITY,
        format!("engine:{engine}"),
        format!("Engine '{engine}' failed: {reason}"),
    )
}
