//! Core traits for resona abstractions.
//!
//! These traits define the seams between the orchestrator and its
//! collaborators, enabling pluggable backends and testability. Postgres
//! implementations live in `resona-db`, HTTP implementations in
//! `resona-provider` and `resona-inference`, and the Redis cache in
//! `resona-pipeline`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// UPSTREAM PROVIDER BACKENDS
// =============================================================================

/// Identity provider operations: authorization-code exchange and profile
/// resolution.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Exchange an authorization code for a bearer token.
    ///
    /// Fails with `Error::UpstreamAuth` on any non-200 response.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenGrant>;

    /// Fetch the profile of the token's owner.
    ///
    /// Fails with `Error::TokenExpired` on 401, `Error::Upstream` otherwise.
    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile>;
}

/// Catalog provider reads: a user's top artists/tracks for one horizon.
///
/// Implementations preserve provider order and surface non-401 error bodies
/// verbatim.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn top_artists(
        &self,
        access_token: &str,
        horizon: Horizon,
        limit: usize,
    ) -> Result<Vec<Artist>>;

    async fn top_tracks(
        &self,
        access_token: &str,
        horizon: Horizon,
        limit: usize,
    ) -> Result<Vec<Track>>;
}

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Repository for user rows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert-or-update on `external_id`; `display_name` is
    /// last-writer-wins.
    async fn upsert(&self, external_id: &str, display_name: &str) -> Result<()>;

    /// Fetch a user by external id.
    async fn fetch(&self, external_id: &str) -> Result<Option<User>>;
}

/// Repository for artists, tracks, and their user associations.
///
/// Association writes are additive: ids are inserted with ignore-if-present
/// semantics and never pruned when a user's top list changes. The relational
/// store is the union of everything a user has ever been associated with;
/// the archive retains the ordered snapshots.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Bulk insert-or-update on artist id, one transaction per call.
    async fn upsert_artists(&self, artists: &[Artist]) -> Result<()>;

    /// Bulk insert-or-update on track id, one transaction per call.
    async fn upsert_tracks(&self, tracks: &[Track]) -> Result<()>;

    /// Associate artists with a user (additive, idempotent).
    async fn link_artists(&self, external_user_id: &str, artist_ids: &[String]) -> Result<()>;

    /// Associate tracks with a user (additive, idempotent).
    async fn link_tracks(&self, external_user_id: &str, track_ids: &[String]) -> Result<()>;

    /// All artist ids ever associated with the user.
    async fn artist_ids_for_user(&self, external_user_id: &str) -> Result<Vec<String>>;

    /// All track ids ever associated with the user.
    async fn track_ids_for_user(&self, external_user_id: &str) -> Result<Vec<String>>;
}

/// Per-user, per-horizon append store of full snapshot documents.
///
/// The archive stores documents opaquely (forward-compatible with schema
/// changes) and never interprets their contents.
#[async_trait]
pub trait SnapshotArchive: Send + Sync {
    /// Upsert on `(external_user_id, horizon)`, stamping `last_synced` to
    /// current wall-clock UTC. Returns the stamped timestamp.
    async fn save(
        &self,
        external_user_id: &str,
        horizon: Horizon,
        document: &JsonValue,
    ) -> Result<DateTime<Utc>>;

    /// All archived documents for a user, newest first by `last_synced`.
    async fn history(&self, external_user_id: &str) -> Result<Vec<ArchivedSnapshot>>;
}

/// String-keyed TTL cache holding the current snapshot per `(user, horizon)`.
///
/// Cache operations are best-effort: failures degrade to a miss (`get`) or a
/// logged no-op (`set_with_ttl`) rather than failing the orchestrator call.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Read the cached snapshot, if present and unexpired.
    async fn get(&self, external_user_id: &str, horizon: Horizon) -> Option<Snapshot>;

    /// Atomically store the snapshot with the configured TTL. Returns false
    /// if the write did not happen.
    async fn set_with_ttl(
        &self,
        external_user_id: &str,
        horizon: Horizon,
        snapshot: &Snapshot,
    ) -> bool;
}

// =============================================================================
// LANGUAGE / EMOTION BACKENDS
// =============================================================================

/// Text-in / text-out translation service.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` into the target language (ISO 639-1 code).
    async fn translate(&self, text: &str, target: &str) -> Result<String>;
}

/// A remote text-classification model emitting the 28-label GoEmotions
/// taxonomy as `{label, score}` pairs.
#[async_trait]
pub trait EmotionBackend: Send + Sync {
    /// Classify the text, returning all labels with raw scores.
    async fn classify(&self, text: &str) -> Result<Vec<EmotionScore>>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
