//! Identity provider client: authorization-code exchange and profile fetch.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use resona_core::defaults::PROVIDER_TIMEOUT_SECS;
use resona_core::{Error, IdentityBackend, Result, TokenGrant, UserProfile};

/// Default identity provider base URL (token endpoint host).
pub const DEFAULT_AUTH_URL: &str = "https://accounts.resona.dev";

/// Default resource API base URL (profile endpoint host).
pub const DEFAULT_API_URL: &str = "https://api.resona.dev/v1";

/// HTTP client for the identity provider.
pub struct IdentityClient {
    client: Client,
    auth_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
}

impl IdentityClient {
    /// Create a new identity client with custom configuration.
    pub fn with_config(
        auth_url: String,
        api_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            subsystem = "provider",
            component = "identity",
            auth_url = %auth_url,
            api_url = %api_url,
            "Initializing identity client"
        );

        Self {
            client,
            auth_url,
            api_url,
            client_id,
            client_secret,
        }
    }

    /// Create from environment variables.
    ///
    /// Reads `RESONA_AUTH_URL`, `RESONA_API_URL`, `RESONA_CLIENT_ID`, and
    /// `RESONA_CLIENT_SECRET`. Fails with `Error::Config` when the client
    /// credentials are missing.
    pub fn from_env() -> Result<Self> {
        let auth_url =
            std::env::var("RESONA_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string());
        let api_url =
            std::env::var("RESONA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let client_id = std::env::var("RESONA_CLIENT_ID")
            .map_err(|_| Error::Config("RESONA_CLIENT_ID not set".to_string()))?;
        let client_secret = std::env::var("RESONA_CLIENT_SECRET")
            .map_err(|_| Error::Config("RESONA_CLIENT_SECRET not set".to_string()))?;

        Ok(Self::with_config(
            auth_url,
            api_url,
            client_id,
            client_secret,
        ))
    }
}

/// Profile response shape from the provider's `/me` endpoint.
#[derive(Deserialize)]
struct ProfileResponse {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    images: Vec<ProfileImage>,
}

#[derive(Deserialize)]
struct ProfileImage {
    url: String,
}

#[async_trait]
impl IdentityBackend for IdentityClient {
    #[instrument(skip(self, code, redirect_uri), fields(subsystem = "provider", component = "identity", op = "exchange_code"))]
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenGrant> {
        let start = Instant::now();

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .client
            .post(format!("{}/api/token", self.auth_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::UpstreamAuth(format!("Request failed: {}", e)))?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                "Token exchange rejected by identity provider"
            );
            return Err(Error::UpstreamAuth(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        let grant: TokenGrant = response
            .json()
            .await
            .map_err(|e| Error::UpstreamAuth(format!("Failed to parse token response: {}", e)))?;

        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Token exchange complete"
        );
        Ok(grant)
    }

    #[instrument(skip(self, access_token), fields(subsystem = "provider", component = "identity", op = "fetch_profile"))]
    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile> {
        let start = Instant::now();

        let response = self
            .client
            .get(format!("{}/me", self.api_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::TokenExpired);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Profile endpoint returned {}: {}",
                status, body
            )));
        }

        let profile: ProfileResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse profile: {}", e)))?;

        debug!(
            user_id = %profile.id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Profile resolved"
        );

        Ok(UserProfile {
            // Fall back to the id when the provider omits a display name.
            display_name: profile
                .display_name
                .clone()
                .unwrap_or_else(|| profile.id.clone()),
            image_url: profile.images.into_iter().next().map(|i| i.url),
            external_id: profile.id,
        })
    }
}
