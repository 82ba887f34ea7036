//! Lyrics mood path: an emotion fingerprint for an arbitrary lyrics text,
//! outside the snapshot flow.

use std::sync::Arc;

use tracing::instrument;

use resona_core::{EmotionReading, Result};
use resona_inference::{EmotionEnsemble, Normalizer};

/// Normalize-then-classify entry point for already-fetched lyrics.
#[derive(Clone)]
pub struct MoodAnalyzer {
    normalizer: Arc<Normalizer>,
    ensemble: Arc<EmotionEnsemble>,
}

impl MoodAnalyzer {
    pub fn new(normalizer: Arc<Normalizer>, ensemble: Arc<EmotionEnsemble>) -> Self {
        Self {
            normalizer,
            ensemble,
        }
    }

    /// Analyze a lyrics text.
    ///
    /// Unlike the snapshot build, ensemble failure is surfaced here: there
    /// is no document to degrade into, so the caller decides the fallback.
    #[instrument(skip(self, lyrics), fields(subsystem = "pipeline", component = "mood", op = "analyze_lyrics", corpus_len = lyrics.len()))]
    pub async fn analyze_lyrics(&self, lyrics: &str) -> Result<EmotionReading> {
        let normalized = self.normalizer.normalize(lyrics).await;
        self.ensemble.analyze(&normalized).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_core::{EmotionBackend, Error};
    use resona_inference::mock::{MockClassifierBackend, MockTranslator};

    fn analyzer_with(
        normalizer: Normalizer,
        classifier: MockClassifierBackend,
    ) -> MoodAnalyzer {
        MoodAnalyzer::new(
            Arc::new(normalizer),
            Arc::new(EmotionEnsemble::new(vec![
                Arc::new(classifier) as Arc<dyn EmotionBackend>
            ])),
        )
    }

    #[tokio::test]
    async fn test_lyrics_are_normalized_before_classification() {
        let classifier = MockClassifierBackend::new("model-a", &[("joy", 1.0)]);
        let handle = classifier.clone();
        let analyzer = analyzer_with(Normalizer::without_translation(), classifier);

        analyzer
            .analyze_lyrics("aing tidak tahu mengapa kamu pergi")
            .await
            .unwrap();

        let sent = handle.calls();
        assert!(sent[0].starts_with("saya "));
        assert!(!sent[0].contains("aing"));
    }

    #[tokio::test]
    async fn test_non_english_lyrics_pass_through_translation() {
        let translator = MockTranslator::new().with_result("I do not know why you left");
        let classifier = MockClassifierBackend::new("model-a", &[("sadness", 1.0)]);
        let handle = classifier.clone();
        let analyzer = analyzer_with(
            Normalizer::new(Arc::new(translator)),
            classifier,
        );

        let reading = analyzer
            .analyze_lyrics("aing tidak tahu mengapa kamu pergi meninggalkan rumah itu kemarin malam")
            .await
            .unwrap();

        assert_eq!(handle.calls()[0], "I do not know why you left");
        assert_eq!(reading.top_emotions[0].label, "sadness");
    }

    #[tokio::test]
    async fn test_ensemble_failure_is_surfaced() {
        let analyzer = analyzer_with(
            Normalizer::without_translation(),
            MockClassifierBackend::failing("model-a", "down"),
        );

        let err = analyzer.analyze_lyrics("some lyrics").await.unwrap_err();
        assert!(matches!(err, Error::ModelsUnavailable(_)));
    }
}
