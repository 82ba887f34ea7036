//! Remote GoEmotions classifier backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use resona_core::defaults::CLASSIFY_TIMEOUT_SECS;
use resona_core::{EmotionBackend, EmotionScore, Error, Result};

/// The 28-label GoEmotions taxonomy both ensemble models emit.
pub const GOEMOTIONS_LABELS: [&str; 28] = [
    "admiration",
    "amusement",
    "anger",
    "annoyance",
    "approval",
    "caring",
    "confusion",
    "curiosity",
    "desire",
    "disappointment",
    "disapproval",
    "disgust",
    "embarrassment",
    "excitement",
    "fear",
    "gratitude",
    "grief",
    "joy",
    "love",
    "nervousness",
    "neutral",
    "optimism",
    "pride",
    "realization",
    "relief",
    "remorse",
    "sadness",
    "surprise",
];

/// The label stripped from every merged score vector.
pub const NEUTRAL_LABEL: &str = "neutral";

/// HTTP backend for a hosted text-classification model.
///
/// Speaks the hosted-inference convention: POST `{"inputs": text}` to the
/// model endpoint, response `[[{"label": …, "score": …}, …]]` (some hosts
/// flatten the outer list; both shapes are accepted).
pub struct HttpClassifierBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_token: Option<String>,
}

impl HttpClassifierBackend {
    /// Create a backend for `endpoint`, labelled `model` in logs.
    pub fn new(endpoint: String, model: String, api_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(CLASSIFY_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint,
            model,
            api_token,
        }
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct WireScore {
    label: String,
    score: f64,
}

/// Hosted models return either `[[{label, score}]]` or `[{label, score}]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<WireScore>>),
    Flat(Vec<WireScore>),
}

impl ClassifyResponse {
    fn into_scores(self) -> Vec<WireScore> {
        match self {
            ClassifyResponse::Nested(mut outer) => {
                if outer.is_empty() {
                    Vec::new()
                } else {
                    outer.swap_remove(0)
                }
            }
            ClassifyResponse::Flat(scores) => scores,
        }
    }
}

#[async_trait]
impl EmotionBackend for HttpClassifierBackend {
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "classifier", op = "classify", model = %self.model, corpus_len = text.len()))]
    async fn classify(&self, text: &str) -> Result<Vec<EmotionScore>> {
        let start = Instant::now();

        let mut request = self.client.post(&self.endpoint).json(&ClassifyRequest {
            inputs: text,
        });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Classifier {} returned {}: {}",
                self.model, status, body
            )));
        }

        let parsed: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse classifier response: {}", e)))?;

        let scores: Vec<EmotionScore> = parsed
            .into_scores()
            .into_iter()
            .map(|w| EmotionScore {
                label: w.label,
                score: w.score,
            })
            .collect();

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            result_count = scores.len(),
            duration_ms = elapsed,
            "Classification complete"
        );
        if elapsed > 5000 {
            warn!(duration_ms = elapsed, slow = true, "Slow classifier call");
        }
        Ok(scores)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
