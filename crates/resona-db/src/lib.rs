//! # resona-db
//!
//! PostgreSQL persistence layer for resona.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for users, artists, tracks, and their
//!   user associations (additive, upsert-only)
//! - The per-user, per-horizon snapshot archive (opaque JSONB documents)
//!
//! ## Example
//!
//! ```rust,ignore
//! use resona_db::{create_pool, PgUserRepository};
//! use resona_core::UserRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool("postgres://localhost/resona").await?;
//!     let users = PgUserRepository::new(pool);
//!     users.upsert("user-42", "Ada").await?;
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod catalog;
pub mod pool;
pub mod users;

#[cfg(test)]
mod tests;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use resona_core::*;

// Re-export repository implementations
pub use archive::PgSnapshotArchive;
pub use catalog::PgCatalogRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use users::PgUserRepository;

#[cfg(feature = "migrations")]
pub use pool::run_migrations;
