//! The audit log facade: sequencing, hashing, and single-writer appends.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::entry::{verify_entries, AuditEntry, GENESIS_HASH};
use crate::error::AuditResult;
use crate::memory::InMemoryAuditStore;
use crate::store::AuditStore;

/// Append-only, hash-chained audit log.
///
/// One instance per configuration/process lifetime, passed explicitly to the
/// services that write to it. All appends from all callers serialize through
/// the internal writer lock, so no two entries can claim the same
/// `previous_hash` and the chain never branches.
pub struct AuditLog {
    store: Arc<dyn AuditStore>,
    // Guards the read-tail-then-commit sequence. The store alone cannot
    // provide this: two concurrent appends could both read the same tail.
    writer: Mutex<()>,
}

impl AuditLog {
    /// Log backed by an in-memory store.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryAuditStore::new()))
    }

    /// Log backed by an explicit store.
    pub fn with_store(store: Arc<dyn AuditStore>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    /// Append one entry as a single atomic operation: read the chain tail,
    /// compute the new hash, commit. `details` should be a JSON object; its
    /// keys serialize in sorted order for hashing.
    ///
    /// A failure here is fatal for the governance operation that triggered
    /// it. Callers must propagate the error, never swallow it.
    pub async fn append(&self, action: &str, details: Value) -> AuditResult<AuditEntry> {
        let _guard = self.writer.lock().await;

        let tail = self.store.tail().await?;
        let (id, previous_hash) = match tail {
            Some(entry) => (entry.id + 1, entry.hash),
            None => (1, GENESIS_HASH.to_string()),
        };

        let entry = AuditEntry::next(id, Utc::now(), action.to_string(), details, previous_hash)?;
        if let Err(err) = self.store.commit(entry.clone()).await {
            warn!(action, error = %err, "audit append failed");
            return Err(err);
        }

        debug!(action, id = entry.id, "audit entry appended");
        Ok(entry)
    }

    /// Entries newest-first; `limit` of 0 returns everything. Read-only.
    pub async fn list(&self, limit: usize) -> AuditResult<Vec<AuditEntry>> {
        self.store.list(limit).await
    }

    /// Recompute every hash from the first entry and confirm each
    /// `previous_hash` linkage. Fails with the first mismatching entry.
    pub async fn verify_chain(&self) -> AuditResult<()> {
        let entries = self.store.all().await?;
        verify_entries(&entries)
    }
}
