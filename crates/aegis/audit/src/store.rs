//! Storage interface for the audit chain.

use async_trait::async_trait;

use crate::entry::AuditEntry;
use crate::error::AuditResult;

/// Backing store for audit entries. Stores hold committed entries only;
/// sequencing, hashing, and append serialization live in
/// [`crate::AuditLog`], which owns the single-writer critical section.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist a fully formed entry at the chain tail.
    async fn commit(&self, entry: AuditEntry) -> AuditResult<()>;

    /// Current chain tail, if any.
    async fn tail(&self) -> AuditResult<Option<AuditEntry>>;

    /// Entries newest-first. `limit` of 0 returns everything.
    async fn list(&self, limit: usize) -> AuditResult<Vec<AuditEntry>>;

    /// Every entry oldest-first, for chain verification.
    async fn all(&self) -> AuditResult<Vec<AuditEntry>>;
}
