//! Pluggable compliance check engines.
//!
//! An engine inspects a file set and emits [`aegis_types::Violation`]s for one
//! category of rule. Engines are read-only with respect to the file system and
//! never abort a run over a missing or unreadable artifact.

#![deny(unsafe_code)]

mod engine;
mod spec_engine;
mod test_engine;

use std::path::Path;
use std::sync::Arc;

use aegis_config::Config;

pub use engine::{CheckEngine, EngineError};
pub use spec_engine::SpecEngine;
pub use test_engine::TestEngine;

/// Construct the built-in engine roster from configuration. The orchestrator
/// accepts any `Arc<dyn CheckEngine>`, so external engines can be registered
/// alongside these.
pub fn default_engines(config: &Config, repo_root: &Path) -> Vec<Arc<dyn CheckEngine>> {
    vec![
        Arc::new(SpecEngine::new(config.engines.spec.clone(), repo_root)),
        Arc::new(TestEngine::new(config.engines.test.clone(), repo_root)),
    ]
}
