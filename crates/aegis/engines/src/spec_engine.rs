//! Specification-presence engine.

use std::path::{Path, PathBuf};

use aegis_config::EngineSettings;
use aegis_types::{Violation, AXIOM_SPEC_PRESENCE};
use async_trait::async_trait;
use tracing::debug;

use crate::engine::{CheckEngine, EngineError};

/// Flags [`AXIOM_SPEC_PRESENCE`] when no specification artifact exists under
/// well-known locations: any `.md` file below `specs/`, or any `.md` file at
/// the repository root.
pub struct SpecEngine {
    settings: EngineSettings,
    repo_root: PathBuf,
}

impl SpecEngine {
    pub fn new(settings: EngineSettings, repo_root: &Path) -> Self {
        Self {
            settings,
            repo_root: repo_root.to_path_buf(),
        }
    }

    async fn spec_artifact_exists(&self) -> bool {
        if dir_contains_markdown(&self.repo_root, false).await {
            return true;
        }
        dir_contains_markdown(&self.repo_root.join("specs"), true).await
    }
}

/// Whether `dir` contains a `.md` file, optionally descending into
/// subdirectories. Unreadable directories count as empty.
async fn dir_contains_markdown(dir: &Path, recursive: bool) -> bool {
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let Ok(mut entries) = tokio::fs::read_dir(&current).await else {
            continue;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if path.extension().is_some_and(|ext| ext == "md") {
                return true;
            }
        }
    }
    false
}

#[async_trait]
impl CheckEngine for SpecEngine {
    fn name(&self) -> &str {
        "spec"
    }

    fn should_run(&self) -> bool {
        self.settings.enabled
    }

    async fn check(&self, _files: &[PathBuf]) -> Result<Vec<Violation>, EngineError> {
        if !self.should_run() {
            return Ok(Vec::new());
        }

        if self.spec_artifact_exists().await {
            debug!(repo_root = %self.repo_root.display(), "specification artifact found");
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            AXIOM_SPEC_PRESENCE,
            self.repo_root.display().to_string(),
            "No specification artifact found",
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_settings() -> EngineSettings {
        EngineSettings::default()
    }

    #[tokio::test]
    async fn flags_repo_without_specification() {
        let dir = tempfile::tempdir().unwrap();
        let engine = SpecEngine::new(enabled_settings(), dir.path());

        let violations = engine.check(&[]).await.unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].axiom_id, AXIOM_SPEC_PRESENCE);
    }

    #[tokio::test]
    async fn root_markdown_satisfies_the_check() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("spec.md"), "# Spec").unwrap();

        let engine = SpecEngine::new(enabled_settings(), dir.path());
        assert!(engine.check(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn nested_specs_directory_satisfies_the_check() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("specs/feature")).unwrap();
        std::fs::write(dir.path().join("specs/feature/one.md"), "# One").unwrap();

        let engine = SpecEngine::new(enabled_settings(), dir.path());
        assert!(engine.check(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn disabled_engine_reports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EngineSettings {
            enabled: false,
            ..EngineSettings::default()
        };
        let engine = SpecEngine::new(settings, dir.path());

        assert!(!engine.should_run());
        assert!(engine.check(&[]).await.unwrap().is_empty());
    }
}
