//! Append-only, hash-chained audit trail.
//!
//! Every governance decision (checks run, attestations recorded, escalations
//! triggered) is committed to a single append-only chain. Each entry's hash
//! covers its timestamp, action, canonically serialized details, and the
//! previous entry's hash, so retroactive tampering is detectable by
//! recomputation ([`AuditLog::verify_chain`]).
//!
//! Audit writes are never best-effort: an append failure must abort the
//! operation that triggered it.

#![deny(unsafe_code)]

mod entry;
mod error;
mod log;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;

pub use entry::{verify_entries, AuditEntry, GENESIS_HASH};
pub use error::{AuditError, AuditResult};
pub use log::AuditLog;
pub use memory::InMemoryAuditStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteAuditStore;
pub use store::AuditStore;
