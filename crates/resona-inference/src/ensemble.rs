//! Emotion ensemble: concurrent classifier dispatch, score merge, ranking,
//! and paragraph composition.
//!
//! Merge protocol: per-label sum of the raw scores from every responding
//! model; a single responder passes through unchanged; zero responders is
//! `Error::ModelsUnavailable`. The `neutral` label is dropped before
//! renormalization, and ranking ties break lexicographically on the label
//! so the output is deterministic.

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use lru::LruCache;
use once_cell::sync::Lazy;
use tracing::{debug, instrument, warn};

use resona_core::defaults::{
    CORPUS_MAX_CHARS, EMOTION_CACHE_CAPACITY, ENSEMBLE_TIMEOUT_SECS, FALLBACK_EMOTIONS,
    PARAGRAPH_LABELS, TOP_EMOTIONS,
};
use resona_core::{EmotionBackend, EmotionReading, EmotionScore, Error, Result};

use crate::classifier::NEUTRAL_LABEL;
use crate::normalize::truncate_chars;

/// Phrase fragments for the paragraph, one per non-neutral GoEmotions label.
static PHRASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("admiration", "glowing admiration"),
        ("amusement", "easy amusement"),
        ("anger", "smoldering anger"),
        ("annoyance", "prickly annoyance"),
        ("approval", "steady approval"),
        ("caring", "gentle caring"),
        ("confusion", "hazy confusion"),
        ("curiosity", "restless curiosity"),
        ("desire", "aching desire"),
        ("disappointment", "heavy disappointment"),
        ("disapproval", "cool disapproval"),
        ("disgust", "sharp disgust"),
        ("embarrassment", "flushed embarrassment"),
        ("excitement", "electric excitement"),
        ("fear", "creeping fear"),
        ("gratitude", "warm gratitude"),
        ("grief", "deep grief"),
        ("joy", "radiant joy"),
        ("love", "tender love"),
        ("nervousness", "jittery nervousness"),
        ("optimism", "bright optimism"),
        ("pride", "quiet pride"),
        ("realization", "sudden realization"),
        ("relief", "soft relief"),
        ("remorse", "lingering remorse"),
        ("sadness", "muted sadness"),
        ("surprise", "wide-eyed surprise"),
    ])
});

/// Ensemble over remote emotion classifiers with an in-process result cache.
///
/// The cache is keyed by the exact post-normalization corpus string, so a
/// repeated build for an unchanged top-track list never re-queries the
/// models.
pub struct EmotionEnsemble {
    backends: Vec<Arc<dyn EmotionBackend>>,
    cache: Mutex<LruCache<String, EmotionReading>>,
    timeout: Duration,
}

impl EmotionEnsemble {
    /// Create an ensemble with default timeout and cache capacity.
    pub fn new(backends: Vec<Arc<dyn EmotionBackend>>) -> Self {
        Self::with_config(
            backends,
            Duration::from_secs(ENSEMBLE_TIMEOUT_SECS),
            EMOTION_CACHE_CAPACITY,
        )
    }

    /// Create an ensemble with a custom wall-clock cap and cache capacity.
    pub fn with_config(
        backends: Vec<Arc<dyn EmotionBackend>>,
        timeout: Duration,
        cache_capacity: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity.max(1)).expect("capacity >= 1");
        Self {
            backends,
            cache: Mutex::new(LruCache::new(capacity)),
            timeout,
        }
    }

    /// Analyze a (language-normalized) corpus into an emotion reading.
    ///
    /// Fails only with `Error::ModelsUnavailable` when no model responded
    /// inside the wall-clock cap; every other degradation happens upstream.
    #[instrument(skip(self, corpus), fields(subsystem = "inference", component = "ensemble", op = "analyze", corpus_len = corpus.len()))]
    pub async fn analyze(&self, corpus: &str) -> Result<EmotionReading> {
        if let Some(cached) = self.cache.lock().unwrap().get(corpus).cloned() {
            debug!("Ensemble cache hit");
            return Ok(cached);
        }

        let start = Instant::now();
        let text = truncate_chars(corpus, CORPUS_MAX_CHARS);

        let calls = self.backends.iter().map(|b| b.classify(text));
        let outcomes = tokio::time::timeout(self.timeout, futures::future::join_all(calls))
            .await
            .map_err(|_| {
                Error::ModelsUnavailable(format!(
                    "ensemble timed out after {:?}",
                    self.timeout
                ))
            })?;

        let mut merged: BTreeMap<String, f64> = BTreeMap::new();
        let mut responders = 0usize;
        for (backend, outcome) in self.backends.iter().zip(outcomes) {
            match outcome {
                Ok(scores) => {
                    responders += 1;
                    for s in scores {
                        *merged.entry(s.label).or_insert(0.0) += s.score;
                    }
                }
                Err(e) => {
                    warn!(
                        model = backend.model_name(),
                        error = %e,
                        "Classifier failed, continuing with remaining models"
                    );
                }
            }
        }

        if responders == 0 {
            return Err(Error::ModelsUnavailable(
                "no classifier responded".to_string(),
            ));
        }

        merged.remove(NEUTRAL_LABEL);

        let ranked = renormalize_and_rank(merged);
        let reading = EmotionReading {
            paragraph: compose_paragraph(&ranked),
            top_emotions: ranked.into_iter().take(TOP_EMOTIONS).collect(),
        };

        debug!(
            responders,
            duration_ms = start.elapsed().as_millis() as u64,
            "Ensemble analysis complete"
        );

        self.cache
            .lock()
            .unwrap()
            .put(corpus.to_string(), reading.clone());
        Ok(reading)
    }
}

/// Renormalize the merged vector to sum to 1 and rank it descending,
/// tie-breaking lexicographically on the label. A zero-sum vector yields an
/// empty ranking.
fn renormalize_and_rank(merged: BTreeMap<String, f64>) -> Vec<EmotionScore> {
    let total: f64 = merged.values().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut ranked: Vec<EmotionScore> = merged
        .into_iter()
        .map(|(label, score)| EmotionScore {
            label,
            score: score / total,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.label.cmp(&b.label))
    });
    ranked
}

/// Compose the paragraph from the top 3 distinct ranked labels, padding
/// from the fixed fallback list when fewer survive.
fn compose_paragraph(ranked: &[EmotionScore]) -> String {
    let mut labels: Vec<&str> = Vec::with_capacity(PARAGRAPH_LABELS);
    for e in ranked {
        if labels.len() == PARAGRAPH_LABELS {
            break;
        }
        if !labels.contains(&e.label.as_str()) {
            labels.push(&e.label);
        }
    }
    for fallback in FALLBACK_EMOTIONS {
        if labels.len() == PARAGRAPH_LABELS {
            break;
        }
        if !labels.contains(&fallback) {
            labels.push(fallback);
        }
    }

    let fragments: Vec<&str> = labels
        .iter()
        .map(|label| *PHRASES.get(label).unwrap_or(label))
        .collect();
    format!("Shades of {}.", fragments.join(", "))
}
