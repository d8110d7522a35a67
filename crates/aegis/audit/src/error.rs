use thiserror::Error;

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Audit-trail errors.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Backing store unreachable or unwritable. Fatal for the governance
    /// operation that triggered the write.
    #[error("audit persistence error: {0}")]
    Persistence(String),

    /// Chain verification failed at the named entry.
    #[error("audit chain integrity violation at entry {sequence}: {reason}")]
    IntegrityViolation { sequence: u64, reason: String },

    #[error("audit serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for AuditError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_violation_names_the_entry() {
        let err = AuditError::IntegrityViolation {
            sequence: 3,
            reason: "hash mismatch".into(),
        };
        assert_eq!(
            err.to_string(),
            "audit chain integrity violation at entry 3: hash mismatch"
        );
    }
}
