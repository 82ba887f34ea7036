//! Catalog provider client: top artists/tracks for a time horizon.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use resona_core::defaults::PROVIDER_TIMEOUT_SECS;
use resona_core::{Album, Artist, CatalogBackend, Error, Horizon, Result, Track};

use crate::identity::DEFAULT_API_URL;

/// HTTP client for the catalog provider.
///
/// Item order is the provider's order and is preserved all the way into the
/// snapshot document; the client never re-sorts.
pub struct CatalogClient {
    client: Client,
    api_url: String,
}

impl CatalogClient {
    /// Create a new catalog client for the given API base URL.
    pub fn new(api_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            subsystem = "provider",
            component = "catalog",
            api_url = %api_url,
            "Initializing catalog client"
        );

        Self { client, api_url }
    }

    /// Create from the `RESONA_API_URL` environment variable.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("RESONA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(api_url)
    }

    async fn fetch_items<T: serde::de::DeserializeOwned>(
        &self,
        access_token: &str,
        kind: &str,
        horizon: Horizon,
        limit: usize,
    ) -> Result<Vec<T>> {
        let start = Instant::now();

        let response = self
            .client
            .get(format!("{}/top/{}", self.api_url, kind))
            .query(&[
                ("time_range", horizon.as_str()),
                ("limit", &limit.to_string()),
            ])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::TokenExpired);
        }
        if !response.status().is_success() {
            let status = response.status();
            // Surface the provider's error body verbatim.
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                kind, "Catalog fetch failed upstream"
            );
            return Err(Error::Upstream(body));
        }

        let page: ItemsPage<T> = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse {} page: {}", kind, e)))?;

        debug!(
            kind,
            horizon = horizon.as_str(),
            result_count = page.items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Catalog fetch complete"
        );
        Ok(page.items)
    }
}

/// Paged list shape shared by the provider's top-item endpoints.
#[derive(Deserialize)]
struct ItemsPage<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
struct WireImage {
    url: String,
}

#[derive(Deserialize)]
struct WireArtist {
    id: String,
    name: String,
    #[serde(default)]
    popularity: i32,
    #[serde(default)]
    images: Vec<WireImage>,
    #[serde(default)]
    genres: Vec<String>,
}

#[derive(Deserialize)]
struct WireAlbum {
    name: String,
    #[serde(default)]
    album_type: String,
    #[serde(default)]
    total_tracks: i32,
    #[serde(default)]
    images: Vec<WireImage>,
}

#[derive(Deserialize)]
struct WireTrackArtist {
    name: String,
}

#[derive(Deserialize)]
struct WireTrack {
    id: String,
    name: String,
    #[serde(default)]
    popularity: i32,
    #[serde(default)]
    preview_url: Option<String>,
    album: WireAlbum,
    #[serde(default)]
    artists: Vec<WireTrackArtist>,
    #[serde(default)]
    duration_ms: i64,
}

impl From<WireArtist> for Artist {
    fn from(w: WireArtist) -> Self {
        Artist {
            id: w.id,
            name: w.name,
            popularity: w.popularity,
            image_url: w.images.into_iter().next().map(|i| i.url),
            genres: w.genres,
        }
    }
}

impl From<WireTrack> for Track {
    fn from(w: WireTrack) -> Self {
        let image_url = w.album.images.first().map(|i| i.url.clone());
        Track {
            id: w.id,
            name: w.name,
            popularity: w.popularity,
            preview_url: w.preview_url,
            album: Album {
                name: w.album.name,
                kind: w.album.album_type,
                total_tracks: w.album.total_tracks,
            },
            artists: w.artists.into_iter().map(|a| a.name).collect(),
            duration_ms: w.duration_ms,
            image_url,
        }
    }
}

#[async_trait]
impl CatalogBackend for CatalogClient {
    #[instrument(skip(self, access_token), fields(subsystem = "provider", component = "catalog", op = "top_artists", horizon = %horizon))]
    async fn top_artists(
        &self,
        access_token: &str,
        horizon: Horizon,
        limit: usize,
    ) -> Result<Vec<Artist>> {
        let items: Vec<WireArtist> = self
            .fetch_items(access_token, "artists", horizon, limit)
            .await?;
        Ok(items.into_iter().map(Artist::from).collect())
    }

    #[instrument(skip(self, access_token), fields(subsystem = "provider", component = "catalog", op = "top_tracks", horizon = %horizon))]
    async fn top_tracks(
        &self,
        access_token: &str,
        horizon: Horizon,
        limit: usize,
    ) -> Result<Vec<Track>> {
        let items: Vec<WireTrack> = self
            .fetch_items(access_token, "tracks", horizon, limit)
            .await?;
        Ok(items.into_iter().map(Track::from).collect())
    }
}
