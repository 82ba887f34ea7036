//! HTTP translation backend (text-in / text-out).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use resona_core::defaults::TRANSLATE_TIMEOUT_SECS;
use resona_core::{Error, Result, TranslationBackend};

/// Default translation service endpoint.
pub const DEFAULT_TRANSLATE_URL: &str = "http://127.0.0.1:5000";

/// HTTP client for a LibreTranslate-style translation service.
pub struct HttpTranslator {
    client: Client,
    base_url: String,
}

impl HttpTranslator {
    /// Create a translator for the given service base URL.
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(TRANSLATE_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Create from the `RESONA_TRANSLATE_URL` environment variable.
    pub fn from_env() -> Self {
        let base_url = std::env::var("RESONA_TRANSLATE_URL")
            .unwrap_or_else(|_| DEFAULT_TRANSLATE_URL.to_string());
        Self::new(base_url)
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[async_trait]
impl TranslationBackend for HttpTranslator {
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "translator", op = "translate", corpus_len = text.len()))]
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&TranslateRequest {
                q: text,
                source: "auto",
                target,
                format: "text",
            })
            .send()
            .await
            .map_err(|e| Error::Translation(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Translation(format!(
                "Translator returned {}: {}",
                status, body
            )));
        }

        let result: TranslateResponse = response
            .json()
            .await
            .map_err(|e| Error::Translation(format!("Failed to parse response: {}", e)))?;

        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Translation complete"
        );
        Ok(result.translated_text)
    }
}
