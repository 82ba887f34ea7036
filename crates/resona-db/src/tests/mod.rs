//! Integration tests against a live PostgreSQL instance.
//!
//! Run with a database reachable at `DATABASE_URL` (schema applied from
//! `migrations/0001_schema.sql`):
//!
//! ```sh
//! cargo test -p resona-db -- --ignored
//! ```
