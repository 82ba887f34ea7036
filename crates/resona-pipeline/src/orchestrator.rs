//! Snapshot orchestrator: the single write path that turns a bearer token
//! and a horizon into a complete listening snapshot.
//!
//! Fatal-versus-degraded split: identity, catalog, and relational writes are
//! fatal for the call; the emotion ensemble degrades to a placeholder
//! paragraph, and the trailing cache/archive writes are best-effort. The
//! orchestrator never partially caches: only a fully assembled document
//! (degraded emotion fields included) reaches the cache.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use resona_core::defaults::{DEGRADED_PARAGRAPH, GENRE_LIMIT, TOP_LIMIT};
use resona_core::{
    Artist, CatalogBackend, CatalogRepository, GenreCount, Horizon, IdentityBackend, Result,
    Snapshot, SnapshotArchive, SnapshotCache, UserRepository,
};
use resona_inference::{EmotionEnsemble, Normalizer};

/// The snapshot build pipeline with all collaborators injected.
///
/// Construction happens once at startup; the service itself is cheap to
/// clone and share across request handlers.
#[derive(Clone)]
pub struct SnapshotService {
    identity: Arc<dyn IdentityBackend>,
    catalog: Arc<dyn CatalogBackend>,
    users: Arc<dyn UserRepository>,
    store: Arc<dyn CatalogRepository>,
    cache: Arc<dyn SnapshotCache>,
    archive: Arc<dyn SnapshotArchive>,
    normalizer: Arc<Normalizer>,
    ensemble: Arc<EmotionEnsemble>,
}

impl SnapshotService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: Arc<dyn IdentityBackend>,
        catalog: Arc<dyn CatalogBackend>,
        users: Arc<dyn UserRepository>,
        store: Arc<dyn CatalogRepository>,
        cache: Arc<dyn SnapshotCache>,
        archive: Arc<dyn SnapshotArchive>,
        normalizer: Arc<Normalizer>,
        ensemble: Arc<EmotionEnsemble>,
    ) -> Self {
        Self {
            identity,
            catalog,
            users,
            store,
            cache,
            archive,
            normalizer,
            ensemble,
        }
    }

    /// Exchange an authorization code and build a snapshot with the freshly
    /// minted token.
    #[instrument(skip(self, code, redirect_uri), fields(subsystem = "pipeline", component = "orchestrator", op = "build_from_code", horizon = %horizon))]
    pub async fn build_from_code(
        &self,
        code: &str,
        redirect_uri: &str,
        horizon: Horizon,
    ) -> Result<Snapshot> {
        let grant = self.identity.exchange_code(code, redirect_uri).await?;
        self.build(&grant.access_token, horizon).await
    }

    /// Build, persist, and cache the snapshot for the token's owner.
    #[instrument(skip(self, access_token), fields(subsystem = "pipeline", component = "orchestrator", op = "build", horizon = %horizon, request_id = %Uuid::now_v7()))]
    pub async fn build(&self, access_token: &str, horizon: Horizon) -> Result<Snapshot> {
        let start = Instant::now();

        let profile = self.identity.fetch_profile(access_token).await?;
        self.users
            .upsert(&profile.external_id, &profile.display_name)
            .await?;

        let (mut artists, mut tracks) = tokio::try_join!(
            self.catalog.top_artists(access_token, horizon, TOP_LIMIT),
            self.catalog.top_tracks(access_token, horizon, TOP_LIMIT),
        )?;
        // The document bound holds even if the provider ignores `limit`.
        artists.truncate(TOP_LIMIT);
        tracks.truncate(TOP_LIMIT);
        debug!(
            user_id = %profile.external_id,
            artist_count = artists.len(),
            track_count = tracks.len(),
            "Fetched top lists"
        );

        self.store.upsert_artists(&artists).await?;
        self.store.upsert_tracks(&tracks).await?;
        let artist_ids: Vec<String> = artists.iter().map(|a| a.id.clone()).collect();
        let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
        self.store
            .link_artists(&profile.external_id, &artist_ids)
            .await?;
        self.store
            .link_tracks(&profile.external_id, &track_ids)
            .await?;

        let genres = genre_histogram(&artists);

        let corpus: String = tracks
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let normalized = self.normalizer.normalize(&corpus).await;

        let (emotion_paragraph, top_emotions) = match self.ensemble.analyze(&normalized).await {
            Ok(reading) => (reading.paragraph, reading.top_emotions),
            Err(e) => {
                warn!(error = %e, "Emotion ensemble unavailable, emitting degraded fields");
                (DEGRADED_PARAGRAPH.to_string(), Vec::new())
            }
        };

        let snapshot = Snapshot {
            display_name: profile.display_name,
            image_url: profile.image_url,
            artists,
            tracks,
            genres,
            emotion_paragraph,
            top_emotions,
            horizon,
            last_synced: Utc::now(),
        };

        // Best-effort tail writes; the document is already complete.
        let document = match serde_json::to_value(&snapshot) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, "Snapshot serialization for archive failed");
                None
            }
        };
        let archive_write = async {
            match &document {
                Some(doc) => self
                    .archive
                    .save(&profile.external_id, horizon, doc)
                    .await
                    .map(|_| ()),
                None => Ok(()),
            }
        };
        let (cached, archived) = tokio::join!(
            self.cache
                .set_with_ttl(&profile.external_id, horizon, &snapshot),
            archive_write,
        );
        if !cached {
            warn!(user_id = %profile.external_id, "Cache write skipped or failed");
        }
        if let Err(e) = archived {
            warn!(user_id = %profile.external_id, error = %e, "Archive write failed");
        }

        info!(
            user_id = %profile.external_id,
            duration_ms = start.elapsed().as_millis() as u64,
            genre_count = snapshot.genres.len(),
            degraded = snapshot.top_emotions.is_empty(),
            "Snapshot built"
        );
        Ok(snapshot)
    }
}

/// Count genre tags across artists in provider order and emit the top 20.
///
/// Ties keep first-appearance order: the sort is stable and entries are
/// accumulated in the order their genre was first seen.
fn genre_histogram(artists: &[Artist]) -> Vec<GenreCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: std::collections::HashMap<&str, u32> = std::collections::HashMap::new();
    for artist in artists {
        for genre in &artist.genres {
            if !counts.contains_key(genre.as_str()) {
                order.push(genre.clone());
            }
            *counts.entry(genre.as_str()).or_insert(0) += 1;
        }
    }

    let mut histogram: Vec<GenreCount> = order
        .iter()
        .map(|name| GenreCount {
            name: name.clone(),
            count: counts[name.as_str()],
        })
        .collect();
    histogram.sort_by(|a, b| b.count.cmp(&a.count));
    histogram.truncate(GENRE_LIMIT);
    histogram
}
