//! Audit entries and the chain hash format.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{AuditError, AuditResult};

/// `previous_hash` of the first entry in a chain.
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// One record in the append-only audit chain.
///
/// Invariants:
/// - `hash = SHA-256(timestamp_iso || action || canonical_json(details) || previous_hash)`
/// - `previous_hash` of entry n equals `hash` of entry n-1
/// - the first entry's `previous_hash` is [`GENESIS_HASH`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Monotonically increasing sequence id, starting at 1.
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    /// Free-form tag, e.g. "RUN_START".
    pub action: String,
    /// Structured payload. Serialized with sorted keys when hashed, so hash
    /// verification is reproducible across implementations.
    pub details: Value,
    /// Hex-encoded SHA-256 digest of the preceding entry.
    pub previous_hash: String,
    /// Hex-encoded SHA-256 digest of this entry.
    pub hash: String,
}

impl AuditEntry {
    /// Build the next entry in the chain, computing its hash from the
    /// supplied tail.
    pub(crate) fn next(
        id: u64,
        timestamp: DateTime<Utc>,
        action: String,
        details: Value,
        previous_hash: String,
    ) -> AuditResult<Self> {
        let hash = compute_hash(timestamp, &action, &details, &previous_hash)?;
        Ok(Self {
            id,
            timestamp,
            action,
            details,
            previous_hash,
            hash,
        })
    }
}

/// Canonical timestamp rendering used in the hash payload. Fixed precision
/// keeps recomputation stable across storage backends.
fn canonical_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Compute the chain hash for one entry. `details` map keys serialize in
/// sorted order (serde_json's default map is BTree-backed), which makes the
/// serialization canonical.
pub(crate) fn compute_hash(
    timestamp: DateTime<Utc>,
    action: &str,
    details: &Value,
    previous_hash: &str,
) -> AuditResult<String> {
    let canonical_details = serde_json::to_string(details)?;
    let payload = format!(
        "{}{}{}{}",
        canonical_timestamp(timestamp),
        action,
        canonical_details,
        previous_hash
    );

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Verify a chain of entries, oldest-first: every hash recomputes and every
/// `previous_hash` links to its predecessor. Fails with the first offending
/// entry's sequence id.
pub fn verify_entries(entries: &[AuditEntry]) -> AuditResult<()> {
    for (index, entry) in entries.iter().enumerate() {
        let expected_prev = if index == 0 {
            GENESIS_HASH
        } else {
            entries[index - 1].hash.as_str()
        };
        if entry.previous_hash != expected_prev {
            return Err(AuditError::IntegrityViolation {
                sequence: entry.id,
                reason: "previous hash link mismatch".into(),
            });
        }

        let computed =
            compute_hash(entry.timestamp, &entry.action, &entry.details, &entry.previous_hash)?;
        if computed != entry.hash {
            return Err(AuditError::IntegrityViolation {
                sequence: entry.id,
                reason: "entry hash mismatch".into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chain_of(n: u64) -> Vec<AuditEntry> {
        let mut entries: Vec<AuditEntry> = Vec::new();
        for id in 1..=n {
            let prev = entries
                .last()
                .map(|e| e.hash.clone())
                .unwrap_or_else(|| GENESIS_HASH.to_string());
            entries.push(
                AuditEntry::next(
                    id,
                    Utc::now(),
                    "TEST_ACTION".into(),
                    json!({ "n": id }),
                    prev,
                )
                .unwrap(),
            );
        }
        entries
    }

    #[test]
    fn empty_chain_verifies() {
        verify_entries(&[]).unwrap();
    }

    #[test]
    fn intact_chain_verifies() {
        verify_entries(&chain_of(5)).unwrap();
    }

    #[test]
    fn tampered_details_fail_at_that_entry() {
        let mut entries = chain_of(4);
        entries[2].details = json!({ "n": 999 });

        let err = verify_entries(&entries).unwrap_err();
        match err {
            AuditError::IntegrityViolation { sequence, .. } => assert_eq!(sequence, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tampered_action_fails() {
        let mut entries = chain_of(3);
        entries[0].action = "FORGED".into();
        assert!(verify_entries(&entries).is_err());
    }

    #[test]
    fn rewritten_hash_breaks_the_link_downstream() {
        let mut entries = chain_of(3);
        // Recompute entry 2's hash over forged details: the entry itself now
        // verifies, but entry 3 no longer links to it.
        entries[1].details = json!({ "forged": true });
        entries[1].hash = compute_hash(
            entries[1].timestamp,
            &entries[1].action,
            &entries[1].details,
            &entries[1].previous_hash,
        )
        .unwrap();

        let err = verify_entries(&entries).unwrap_err();
        match err {
            AuditError::IntegrityViolation { sequence, .. } => assert_eq!(sequence, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn action_strategy() -> impl Strategy<Value = Vec<(String, u64)>> {
            proptest::collection::vec(("[A-Z_]{1,12}", any::<u64>()), 1..16)
        }

        proptest! {
            #[test]
            fn any_chain_verifies_until_tampered(
                actions in action_strategy(),
                tamper_at in any::<prop::sample::Index>(),
            ) {
                let mut entries: Vec<AuditEntry> = Vec::new();
                for (action, n) in &actions {
                    let prev = entries
                        .last()
                        .map(|e| e.hash.clone())
                        .unwrap_or_else(|| GENESIS_HASH.to_string());
                    entries.push(
                        AuditEntry::next(
                            entries.len() as u64 + 1,
                            Utc::now(),
                            action.clone(),
                            json!({ "n": n }),
                            prev,
                        )
                        .unwrap(),
                    );
                }
                prop_assert!(verify_entries(&entries).is_ok());

                let index = tamper_at.index(entries.len());
                entries[index].details = json!({ "n": "tampered" });
                let err = verify_entries(&entries).unwrap_err();
                prop_assert!(
                    matches!(
                        err,
                        AuditError::IntegrityViolation { sequence, .. }
                            if sequence == index as u64 + 1
                    ),
                    "unexpected error: {:?}",
                    err
                );
            }
        }
    }

    #[test]
    fn key_order_in_details_does_not_change_the_hash() {
        let ts = Utc::now();
        let a = compute_hash(ts, "A", &json!({ "x": 1, "y": 2 }), GENESIS_HASH).unwrap();
        let b = compute_hash(ts, "A", &json!({ "y": 2, "x": 1 }), GENESIS_HASH).unwrap();
        assert_eq!(a, b);
    }
}
