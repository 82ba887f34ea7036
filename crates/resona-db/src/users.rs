//! User repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use resona_core::{Error, Result, User, UserRepository};

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn upsert(&self, external_id: &str, display_name: &str) -> Result<()> {
        if external_id.is_empty() {
            return Err(Error::BadRequest("empty external user id".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO users (external_id, display_name)
            VALUES ($1, $2)
            ON CONFLICT (external_id) DO UPDATE SET display_name = EXCLUDED.display_name
            "#,
        )
        .bind(external_id)
        .bind(display_name)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn fetch(&self, external_id: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT external_id, display_name FROM users WHERE external_id = $1",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| User {
            external_id: r.get("external_id"),
            display_name: r.get("display_name"),
            image_url: None,
        }))
    }
}
