//! In-memory fakes for the pipeline's collaborators.
//!
//! Each fake records enough state for assertions and exposes failure
//! switches so tests can exercise the fatal-versus-degraded split without
//! network or database dependencies.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use resona_core::{
    Album, ArchivedSnapshot, Artist, CatalogBackend, CatalogRepository, EmotionBackend, Error,
    Horizon, IdentityBackend, Result, Snapshot, SnapshotArchive, SnapshotCache, TokenGrant, Track,
    User, UserProfile, UserRepository,
};
use resona_inference::mock::MockClassifierBackend;
use resona_inference::{EmotionEnsemble, Normalizer};

use crate::orchestrator::SnapshotService;

// ─── Identity ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeIdentity {
    exchanged: Mutex<Vec<String>>,
    token_expired: Mutex<bool>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `fetch_profile` fail with `TokenExpired` from now on.
    pub fn expire_token(&self) {
        *self.token_expired.lock().unwrap() = true;
    }

    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityBackend for FakeIdentity {
    async fn exchange_code(&self, code: &str, _redirect_uri: &str) -> Result<TokenGrant> {
        self.exchanged.lock().unwrap().push(code.to_string());
        Ok(TokenGrant {
            access_token: "exchanged-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            refresh_token: None,
            scope: None,
        })
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<UserProfile> {
        if *self.token_expired.lock().unwrap() {
            return Err(Error::TokenExpired);
        }
        Ok(UserProfile {
            external_id: "listener-1".to_string(),
            display_name: "Test Listener".to_string(),
            image_url: None,
        })
    }
}

// ─── Catalog ───────────────────────────────────────────────────────────────

pub struct FakeCatalog {
    artists: Mutex<Vec<Artist>>,
    tracks: Mutex<Vec<Track>>,
    token_expired: Mutex<bool>,
    ignore_limit: Mutex<bool>,
}

pub fn test_track(id: &str, name: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        popularity: 50,
        preview_url: None,
        album: Album {
            name: "Test Album".to_string(),
            kind: "album".to_string(),
            total_tracks: 10,
        },
        artists: vec!["Test Artist".to_string()],
        duration_ms: 200_000,
        image_url: None,
    }
}

impl FakeCatalog {
    /// Defaults: two rock artists and two track titles.
    pub fn new() -> Self {
        let artists = vec![
            Artist {
                id: "artist-a".to_string(),
                name: "Artist A".to_string(),
                popularity: 80,
                image_url: None,
                genres: vec!["rock".to_string(), "indie".to_string()],
            },
            Artist {
                id: "artist-b".to_string(),
                name: "Artist B".to_string(),
                popularity: 60,
                image_url: None,
                genres: vec!["rock".to_string()],
            },
        ];
        let tracks = vec![test_track("track-1", "song1"), test_track("track-2", "song2")];
        Self {
            artists: Mutex::new(artists),
            tracks: Mutex::new(tracks),
            token_expired: Mutex::new(false),
            ignore_limit: Mutex::new(false),
        }
    }

    pub fn set_artists(&self, artists: Vec<Artist>) {
        *self.artists.lock().unwrap() = artists;
    }

    pub fn set_tracks(&self, tracks: Vec<Track>) {
        *self.tracks.lock().unwrap() = tracks;
    }

    /// Make both top-list reads fail with `TokenExpired` from now on.
    pub fn fail_with_expired_token(&self) {
        *self.token_expired.lock().unwrap() = true;
    }

    /// Return every configured item regardless of the requested limit,
    /// simulating a provider that does not honor `limit`.
    pub fn ignore_requested_limit(&self) {
        *self.ignore_limit.lock().unwrap() = true;
    }
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogBackend for FakeCatalog {
    async fn top_artists(
        &self,
        _access_token: &str,
        _horizon: Horizon,
        limit: usize,
    ) -> Result<Vec<Artist>> {
        if *self.token_expired.lock().unwrap() {
            return Err(Error::TokenExpired);
        }
        let cap = if *self.ignore_limit.lock().unwrap() {
            usize::MAX
        } else {
            limit
        };
        Ok(self.artists.lock().unwrap().iter().take(cap).cloned().collect())
    }

    async fn top_tracks(
        &self,
        _access_token: &str,
        _horizon: Horizon,
        limit: usize,
    ) -> Result<Vec<Track>> {
        if *self.token_expired.lock().unwrap() {
            return Err(Error::TokenExpired);
        }
        let cap = if *self.ignore_limit.lock().unwrap() {
            usize::MAX
        } else {
            limit
        };
        Ok(self.tracks.lock().unwrap().iter().take(cap).cloned().collect())
    }
}

// ─── Relational store ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryUserRepo {
    users: Mutex<HashMap<String, String>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetched_display_name(&self, external_id: &str) -> Option<String> {
        self.users.lock().unwrap().get(external_id).cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepo {
    async fn upsert(&self, external_id: &str, display_name: &str) -> Result<()> {
        self.users
            .lock()
            .unwrap()
            .insert(external_id.to_string(), display_name.to_string());
        Ok(())
    }

    async fn fetch(&self, external_id: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(external_id).map(|name| User {
            external_id: external_id.to_string(),
            display_name: name.clone(),
            image_url: None,
        }))
    }
}

#[derive(Default)]
pub struct MemoryCatalogRepo {
    artists: Mutex<HashMap<String, Artist>>,
    tracks: Mutex<HashMap<String, Track>>,
    artist_links: Mutex<HashMap<String, BTreeSet<String>>>,
    track_links: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl MemoryCatalogRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artist_ids(&self, external_user_id: &str) -> Vec<String> {
        self.artist_links
            .lock()
            .unwrap()
            .get(external_user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn track_ids(&self, external_user_id: &str) -> Vec<String> {
        self.track_links
            .lock()
            .unwrap()
            .get(external_user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalogRepo {
    async fn upsert_artists(&self, artists: &[Artist]) -> Result<()> {
        let mut guard = self.artists.lock().unwrap();
        for artist in artists {
            guard.insert(artist.id.clone(), artist.clone());
        }
        Ok(())
    }

    async fn upsert_tracks(&self, tracks: &[Track]) -> Result<()> {
        let mut guard = self.tracks.lock().unwrap();
        for track in tracks {
            guard.insert(track.id.clone(), track.clone());
        }
        Ok(())
    }

    async fn link_artists(&self, external_user_id: &str, artist_ids: &[String]) -> Result<()> {
        self.artist_links
            .lock()
            .unwrap()
            .entry(external_user_id.to_string())
            .or_default()
            .extend(artist_ids.iter().cloned());
        Ok(())
    }

    async fn link_tracks(&self, external_user_id: &str, track_ids: &[String]) -> Result<()> {
        self.track_links
            .lock()
            .unwrap()
            .entry(external_user_id.to_string())
            .or_default()
            .extend(track_ids.iter().cloned());
        Ok(())
    }

    async fn artist_ids_for_user(&self, external_user_id: &str) -> Result<Vec<String>> {
        Ok(self.artist_ids(external_user_id))
    }

    async fn track_ids_for_user(&self, external_user_id: &str) -> Result<Vec<String>> {
        Ok(self.track_ids(external_user_id))
    }
}

// ─── Cache and archive ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Snapshot>>,
    fail_writes: Mutex<bool>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail (reads keep working).
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn stored(&self, external_user_id: &str, horizon: Horizon) -> Option<Snapshot> {
        let key = format!("top:{}:{}", external_user_id, horizon.as_str());
        self.entries.lock().unwrap().get(&key).cloned()
    }

    pub fn put(&self, external_user_id: &str, horizon: Horizon, snapshot: Snapshot) {
        let key = format!("top:{}:{}", external_user_id, horizon.as_str());
        self.entries.lock().unwrap().insert(key, snapshot);
    }
}

#[async_trait]
impl SnapshotCache for MemoryCache {
    async fn get(&self, external_user_id: &str, horizon: Horizon) -> Option<Snapshot> {
        self.stored(external_user_id, horizon)
    }

    async fn set_with_ttl(
        &self,
        external_user_id: &str,
        horizon: Horizon,
        snapshot: &Snapshot,
    ) -> bool {
        if *self.fail_writes.lock().unwrap() {
            return false;
        }
        self.put(external_user_id, horizon, snapshot.clone());
        true
    }
}

#[derive(Default)]
pub struct MemoryArchive {
    rows: Mutex<Vec<ArchivedSnapshot>>,
    fail_writes: Mutex<bool>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn latest(&self, external_user_id: &str) -> Option<ArchivedSnapshot> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.external_user_id == external_user_id)
            .max_by_key(|r| r.last_synced)
            .cloned()
    }
}

#[async_trait]
impl SnapshotArchive for MemoryArchive {
    async fn save(
        &self,
        external_user_id: &str,
        horizon: Horizon,
        document: &JsonValue,
    ) -> Result<DateTime<Utc>> {
        if *self.fail_writes.lock().unwrap() {
            return Err(Error::Internal("archive unavailable".to_string()));
        }
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|r| !(r.external_user_id == external_user_id && r.horizon == horizon));
        rows.push(ArchivedSnapshot {
            external_user_id: external_user_id.to_string(),
            horizon,
            document: document.clone(),
            last_synced: now,
        });
        Ok(now)
    }

    async fn history(&self, external_user_id: &str) -> Result<Vec<ArchivedSnapshot>> {
        let mut rows: Vec<ArchivedSnapshot> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.external_user_id == external_user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.last_synced.cmp(&a.last_synced));
        Ok(rows)
    }
}

// ─── Assembled fixture ─────────────────────────────────────────────────────

/// All fakes wired together, ready to hand a `SnapshotService`.
pub struct PipelineFixture {
    pub identity: Arc<FakeIdentity>,
    pub catalog: Arc<FakeCatalog>,
    pub users: Arc<MemoryUserRepo>,
    pub store: Arc<MemoryCatalogRepo>,
    pub cache: Arc<MemoryCache>,
    pub archive: Arc<MemoryArchive>,
    classifiers: Vec<Arc<dyn EmotionBackend>>,
}

impl PipelineFixture {
    /// Fixture with two healthy classifiers matching the worked merge
    /// example (joy ranks first after neutral-drop and renormalization).
    pub fn new() -> Self {
        Self::with_classifiers(vec![
            Arc::new(MockClassifierBackend::new(
                "model-a",
                &[("joy", 0.4), ("sadness", 0.3), ("neutral", 0.3)],
            )),
            Arc::new(MockClassifierBackend::new(
                "model-b",
                &[("joy", 0.2), ("anger", 0.4), ("neutral", 0.4)],
            )),
        ])
    }

    pub fn with_classifiers(classifiers: Vec<Arc<dyn EmotionBackend>>) -> Self {
        Self {
            identity: Arc::new(FakeIdentity::new()),
            catalog: Arc::new(FakeCatalog::new()),
            users: Arc::new(MemoryUserRepo::new()),
            store: Arc::new(MemoryCatalogRepo::new()),
            cache: Arc::new(MemoryCache::new()),
            archive: Arc::new(MemoryArchive::new()),
            classifiers,
        }
    }

    pub fn service(&self) -> SnapshotService {
        SnapshotService::new(
            self.identity.clone(),
            self.catalog.clone(),
            self.users.clone(),
            self.store.clone(),
            self.cache.clone(),
            self.archive.clone(),
            Arc::new(Normalizer::without_translation()),
            Arc::new(EmotionEnsemble::new(self.classifiers.clone())),
        )
    }
}

impl Default for PipelineFixture {
    fn default() -> Self {
        Self::new()
    }
}
