//! Mock inference backends for deterministic testing.
//!
//! Provides in-memory implementations of [`TranslationBackend`] and
//! [`EmotionBackend`] that return configured results, record their calls,
//! and can simulate failures or latency.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use resona_core::{EmotionBackend, EmotionScore, Error, Result, TranslationBackend};

// =============================================================================
// TRANSLATOR
// =============================================================================

#[derive(Clone)]
enum TranslatorOutcome {
    Result(String),
    Error(String),
}

/// Mock translation backend with a call log.
#[derive(Clone)]
pub struct MockTranslator {
    outcome: TranslatorOutcome,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTranslator {
    /// Create a mock that echoes its input.
    pub fn new() -> Self {
        Self {
            outcome: TranslatorOutcome::Result(String::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return a fixed translation for every call.
    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.outcome = TranslatorOutcome::Result(result.into());
        self
    }

    /// Fail every call with `Error::Translation(message)`.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.outcome = TranslatorOutcome::Error(message.into());
        self
    }

    /// All texts submitted for translation, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationBackend for MockTranslator {
    async fn translate(&self, text: &str, _target: &str) -> Result<String> {
        self.calls.lock().unwrap().push(text.to_string());
        match &self.outcome {
            TranslatorOutcome::Result(s) => Ok(s.clone()),
            TranslatorOutcome::Error(msg) => Err(Error::Translation(msg.clone())),
        }
    }
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Mock emotion classifier with configurable scores, failure, and latency.
#[derive(Clone)]
pub struct MockClassifierBackend {
    name: String,
    scores: Vec<EmotionScore>,
    fail_with: Option<String>,
    latency: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockClassifierBackend {
    /// Create a mock emitting the given `(label, score)` pairs.
    pub fn new(name: impl Into<String>, scores: &[(&str, f64)]) -> Self {
        Self {
            name: name.into(),
            scores: scores
                .iter()
                .map(|(label, score)| EmotionScore {
                    label: label.to_string(),
                    score: *score,
                })
                .collect(),
            fail_with: None,
            latency: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every call with `Error::Upstream(message)`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scores: Vec::new(),
            fail_with: Some(message.into()),
            latency: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Delay each call by `latency` before responding.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// All corpora submitted for classification, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of classify calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EmotionBackend for MockClassifierBackend {
    async fn classify(&self, text: &str) -> Result<Vec<EmotionScore>> {
        self.calls.lock().unwrap().push(text.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.fail_with {
            Some(msg) => Err(Error::Upstream(msg.clone())),
            None => Ok(self.scores.clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
