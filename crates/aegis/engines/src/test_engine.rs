//! Test-coverage engine.

use std::path::{Path, PathBuf};

use aegis_config::EngineSettings;
use aegis_types::{Violation, AXIOM_TEST_COVERAGE, AXIOM_TEST_DETERMINISM};
use async_trait::async_trait;
use tracing::debug;

use crate::engine::{CheckEngine, EngineError};

/// Substrings that mark a test as non-deterministic (blocking sleeps, live
/// network calls).
const NON_DETERMINISTIC_PATTERNS: &[&str] = &[
    "thread::sleep",
    "time.sleep",
    "reqwest::blocking",
    "requests.get",
];

/// Extensions treated as implementation source.
const IMPL_EXTENSIONS: &[&str] = &["rs", "py"];

/// Maps implementation files to expected test locations by naming convention;
/// flags [`AXIOM_TEST_COVERAGE`] when no test file exists and
/// [`AXIOM_TEST_DETERMINISM`] when an existing test contains known
/// non-deterministic patterns.
pub struct TestEngine {
    settings: EngineSettings,
    repo_root: PathBuf,
}

impl TestEngine {
    pub fn new(settings: EngineSettings, repo_root: &Path) -> Self {
        Self {
            settings,
            repo_root: repo_root.to_path_buf(),
        }
    }

    fn is_implementation_file(file: &Path) -> bool {
        file.starts_with("src")
            && file
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMPL_EXTENSIONS.contains(&ext))
    }

    /// Candidate test locations for one implementation file, relative to the
    /// repository root. Both `test_foo.ext` and `foo_test.ext` conventions
    /// are recognized.
    fn test_candidates(file: &Path) -> Vec<PathBuf> {
        let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
            return Vec::new();
        };
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            return Vec::new();
        };
        let Some(ext) = file.extension().and_then(|e| e.to_str()) else {
            return Vec::new();
        };

        vec![
            PathBuf::from(format!("tests/test_{name}")),
            PathBuf::from(format!("tests/{stem}_test.{ext}")),
            PathBuf::from(format!("tests/unit/test_{name}")),
            PathBuf::from(format!("tests/unit/models/test_{name}")),
            PathBuf::from(format!("tests/unit/services/test_{name}")),
            PathBuf::from(format!("tests/unit/engines/test_{name}")),
        ]
    }

    async fn find_test_file(&self, file: &Path) -> Option<PathBuf> {
        for candidate in Self::test_candidates(file) {
            let absolute = self.repo_root.join(&candidate);
            if tokio::fs::try_exists(&absolute).await.unwrap_or(false) {
                return Some(candidate);
            }
        }
        None
    }
}

#[async_trait]
impl CheckEngine for TestEngine {
    fn name(&self) -> &str {
        "test"
    }

    fn should_run(&self) -> bool {
        self.settings.enabled
    }

    async fn check(&self, files: &[PathBuf]) -> Result<Vec<Violation>, EngineError> {
        if !self.should_run() {
            return Ok(Vec::new());
        }

        let mut violations = Vec::new();
        for file in files {
            if !Self::is_implementation_file(file) {
                continue;
            }

            let Some(test_path) = self.find_test_file(file).await else {
                violations.push(Violation::new(
                    AXIOM_TEST_COVERAGE,
                    file.display().to_string(),
                    format!("Missing test file for {}", file.display()),
                ));
                continue;
            };

            // Unreadable test files are skipped, not reported: the coverage
            // axiom is satisfied by the file's existence.
            let absolute = self.repo_root.join(&test_path);
            let Ok(content) = tokio::fs::read_to_string(&absolute).await else {
                debug!(path = %absolute.display(), "test file unreadable, skipping scan");
                continue;
            };

            if NON_DETERMINISTIC_PATTERNS
                .iter()
                .any(|pattern| content.contains(pattern))
            {
                violations.push(Violation::new(
                    AXIOM_TEST_DETERMINISM,
                    test_path.display().to_string(),
                    "Non-deterministic code detected (sleep/network)",
                ));
            }
        }

        Ok(violations)
    }
}
