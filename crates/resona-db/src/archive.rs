//! Snapshot archive repository implementation.
//!
//! One row per `(external_user_id, horizon)`, last-writer-wins on the same
//! key. Documents are stored as opaque JSONB so the archive stays
//! forward-compatible with snapshot-schema changes; it never interprets
//! document contents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use resona_core::{ArchivedSnapshot, Error, Horizon, Result, SnapshotArchive};

/// PostgreSQL implementation of SnapshotArchive.
pub struct PgSnapshotArchive {
    pool: Pool<Postgres>,
}

impl PgSnapshotArchive {
    /// Create a new PgSnapshotArchive with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotArchive for PgSnapshotArchive {
    async fn save(
        &self,
        external_user_id: &str,
        horizon: Horizon,
        document: &JsonValue,
    ) -> Result<DateTime<Utc>> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO snapshots (external_user_id, horizon, document, last_synced)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (external_user_id, horizon) DO UPDATE SET
                document = EXCLUDED.document,
                last_synced = EXCLUDED.last_synced
            "#,
        )
        .bind(external_user_id)
        .bind(horizon.as_str())
        .bind(document)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "archive",
            op = "save",
            user_id = external_user_id,
            horizon = horizon.as_str(),
            "Archived snapshot"
        );
        Ok(now)
    }

    async fn history(&self, external_user_id: &str) -> Result<Vec<ArchivedSnapshot>> {
        let rows = sqlx::query(
            r#"
            SELECT external_user_id, horizon, document, last_synced
            FROM snapshots
            WHERE external_user_id = $1
            ORDER BY last_synced DESC
            "#,
        )
        .bind(external_user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter()
            .map(|row| {
                let horizon: String = row.get("horizon");
                Ok(ArchivedSnapshot {
                    external_user_id: row.get("external_user_id"),
                    horizon: horizon.parse()?,
                    document: row.get("document"),
                    last_synced: row.get("last_synced"),
                })
            })
            .collect()
    }
}
