//! In-memory audit store for tests, local runs, and embedding.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::entry::AuditEntry;
use crate::error::{AuditError, AuditResult};
use crate::store::AuditStore;

/// Deterministic, test-friendly store. Durable deployments should use the
/// SQLite backend behind the `sqlite` feature.
#[derive(Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn commit(&self, entry: AuditEntry) -> AuditResult<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| AuditError::Persistence("audit lock poisoned".to_string()))?;
        guard.push(entry);
        Ok(())
    }

    async fn tail(&self) -> AuditResult<Option<AuditEntry>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| AuditError::Persistence("audit lock poisoned".to_string()))?;
        Ok(guard.last().cloned())
    }

    async fn list(&self, limit: usize) -> AuditResult<Vec<AuditEntry>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| AuditError::Persistence("audit lock poisoned".to_string()))?;
        let mut values: Vec<AuditEntry> = guard.iter().rev().cloned().collect();
        if limit > 0 {
            values.truncate(limit);
        }
        Ok(values)
    }

    async fn all(&self) -> AuditResult<Vec<AuditEntry>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| AuditError::Persistence("audit lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}
