//! SQLite adapter for the audit store.
//!
//! Durable backend behind the `sqlite` cargo feature. Timestamps are stored
//! as fixed-precision RFC 3339 text so recomputed hashes match across
//! process restarts.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::entry::AuditEntry;
use crate::error::{AuditError, AuditResult};
use crate::store::AuditStore;

/// SQLite-backed audit store.
#[derive(Clone)]
pub struct SqliteAuditStore {
    pool: SqlitePool,
}

impl SqliteAuditStore {
    /// Open (or create) the database at `path` and initialize the schema.
    /// Parent directories are created as needed. `":memory:"` opens an
    /// in-process database.
    pub async fn connect(path: &str) -> AuditResult<Self> {
        let url = if path == ":memory:" || path.is_empty() {
            "sqlite::memory:".to_string()
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| AuditError::Persistence(e.to_string()))?;
                }
            }
            format!("sqlite://{path}")
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| AuditError::Persistence(e.to_string()))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> AuditResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY,
                timestamp TEXT NOT NULL,
                action TEXT NOT NULL,
                details TEXT NOT NULL,
                previous_hash TEXT NOT NULL,
                hash TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_entry(row: sqlx::sqlite::SqliteRow) -> AuditResult<AuditEntry> {
        let id: i64 = row.try_get("id")?;
        let timestamp: String = row.try_get("timestamp")?;
        let action: String = row.try_get("action")?;
        let details: String = row.try_get("details")?;
        let previous_hash: String = row.try_get("previous_hash")?;
        let hash: String = row.try_get("hash")?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| AuditError::Serialization(e.to_string()))?
            .with_timezone(&Utc);

        Ok(AuditEntry {
            id: id as u64,
            timestamp,
            action,
            details: serde_json::from_str(&details)?,
            previous_hash,
            hash,
        })
    }
}

#[async_trait]
impl AuditStore for SqliteAuditStore {
    async fn commit(&self, entry: AuditEntry) -> AuditResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, timestamp, action, details, previous_hash, hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(entry.id as i64)
        .bind(entry.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))
        .bind(&entry.action)
        .bind(serde_json::to_string(&entry.details)?)
        .bind(&entry.previous_hash)
        .bind(&entry.hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn tail(&self) -> AuditResult<Option<AuditEntry>> {
        let row = sqlx::query(
            "SELECT id, timestamp, action, details, previous_hash, hash
               FROM audit_log ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_entry).transpose()
    }

    async fn list(&self, limit: usize) -> AuditResult<Vec<AuditEntry>> {
        let rows = if limit == 0 {
            sqlx::query(
                "SELECT id, timestamp, action, details, previous_hash, hash
                   FROM audit_log ORDER BY id DESC",
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT id, timestamp, action, details, previous_hash, hash
                   FROM audit_log ORDER BY id DESC LIMIT ?1",
            )
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?
        };

        rows.into_iter().map(Self::row_to_entry).collect()
    }

    async fn all(&self) -> AuditResult<Vec<AuditEntry>> {
        let rows = sqlx::query(
            "SELECT id, timestamp, action, details, previous_hash, hash
               FROM audit_log ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_entry).collect()
    }
}
