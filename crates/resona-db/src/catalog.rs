//! Artist/track repository with user associations.
//!
//! Upserts are transactional per call; concurrent upserts for the same id
//! are serializable with the last committer winning on mutable columns.
//! Association inserts are additive (ignore-if-present) and are never
//! pruned when a user's top list changes: the relational store carries the
//! union of everything the user has ever been associated with, while the
//! archive retains the ordered snapshots.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use resona_core::{Artist, CatalogRepository, Error, Result, Track};

/// PostgreSQL implementation of CatalogRepository.
pub struct PgCatalogRepository {
    pool: Pool<Postgres>,
}

impl PgCatalogRepository {
    /// Create a new PgCatalogRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn upsert_artists(&self, artists: &[Artist]) -> Result<()> {
        if artists.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for artist in artists {
            sqlx::query(
                r#"
                INSERT INTO artists (id, name, popularity, image_url)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    popularity = EXCLUDED.popularity,
                    image_url = EXCLUDED.image_url
                "#,
            )
            .bind(&artist.id)
            .bind(&artist.name)
            .bind(artist.popularity)
            .bind(&artist.image_url)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "catalog",
            op = "upsert_artists",
            result_count = artists.len(),
            "Upserted artists"
        );
        Ok(())
    }

    async fn upsert_tracks(&self, tracks: &[Track]) -> Result<()> {
        if tracks.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for track in tracks {
            sqlx::query(
                r#"
                INSERT INTO tracks (id, name, popularity, preview_url)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    popularity = EXCLUDED.popularity,
                    preview_url = EXCLUDED.preview_url
                "#,
            )
            .bind(&track.id)
            .bind(&track.name)
            .bind(track.popularity)
            .bind(&track.preview_url)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "catalog",
            op = "upsert_tracks",
            result_count = tracks.len(),
            "Upserted tracks"
        );
        Ok(())
    }

    async fn link_artists(&self, external_user_id: &str, artist_ids: &[String]) -> Result<()> {
        if artist_ids.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for artist_id in artist_ids {
            sqlx::query(
                r#"
                INSERT INTO user_artists (external_user_id, artist_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(external_user_id)
            .bind(artist_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)
    }

    async fn link_tracks(&self, external_user_id: &str, track_ids: &[String]) -> Result<()> {
        if track_ids.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for track_id in track_ids {
            sqlx::query(
                r#"
                INSERT INTO user_tracks (external_user_id, track_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(external_user_id)
            .bind(track_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)
    }

    async fn artist_ids_for_user(&self, external_user_id: &str) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT artist_id FROM user_artists WHERE external_user_id = $1 ORDER BY artist_id",
        )
        .bind(external_user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(ids)
    }

    async fn track_ids_for_user(&self, external_user_id: &str) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT track_id FROM user_tracks WHERE external_user_id = $1 ORDER BY track_id",
        )
        .bind(external_user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(ids)
    }
}
