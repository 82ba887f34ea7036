//! Language normalizer: slang pass, detection, best-effort translation.

use std::sync::Arc;

use tracing::{debug, warn};
use whatlang::Lang;

use resona_core::defaults::{DETECT_SAMPLE_CHARS, TRANSLATE_MAX_CHARS};
use resona_core::TranslationBackend;

use crate::slang;

/// Normalizes a corpus toward English before classification.
///
/// Pipeline, in order:
/// 1. slang map (informal/regional tokens → formal equivalents),
/// 2. language detection over the first 500 characters,
/// 3. translation of the first 4 500 characters when the detected language
///    is not English.
///
/// The normalizer never fails: a translation error or empty result falls
/// through to the slang-normalized input, and already-English input passes
/// straight through, making the step idempotent.
pub struct Normalizer {
    translator: Option<Arc<dyn TranslationBackend>>,
}

impl Normalizer {
    /// Create a normalizer with a translation backend.
    pub fn new(translator: Arc<dyn TranslationBackend>) -> Self {
        Self {
            translator: Some(translator),
        }
    }

    /// Create a normalizer without translation; detection still runs but
    /// non-English text passes through slang-normalized.
    pub fn without_translation() -> Self {
        Self { translator: None }
    }

    /// Normalize `text` toward English. Infallible by contract.
    pub async fn normalize(&self, text: &str) -> String {
        let normalized = slang::apply(text);

        let sample = truncate_chars(&normalized, DETECT_SAMPLE_CHARS);
        let detected = whatlang::detect_lang(sample);
        match detected {
            Some(Lang::Eng) | None => {
                debug!(
                    subsystem = "inference",
                    component = "normalizer",
                    lang = ?detected,
                    "Corpus treated as English, no translation"
                );
                return normalized;
            }
            Some(lang) => {
                debug!(
                    subsystem = "inference",
                    component = "normalizer",
                    lang = %lang.code(),
                    "Non-English corpus detected"
                );
            }
        }

        let Some(translator) = &self.translator else {
            return normalized;
        };

        let head = truncate_chars(&normalized, TRANSLATE_MAX_CHARS);
        match translator.translate(head, "en").await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => {
                warn!(
                    subsystem = "inference",
                    component = "normalizer",
                    "Translation returned empty result, passing through"
                );
                normalized
            }
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "normalizer",
                    error = %e,
                    "Translation failed, passing through"
                );
                normalized
            }
        }
    }
}

/// Truncate to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTranslator;

    const INDONESIAN: &str =
        "aing tidak tahu mengapa kamu pergi meninggalkan rumah itu kemarin malam";

    #[tokio::test]
    async fn test_english_passes_through_unchanged() {
        let normalizer = Normalizer::without_translation();
        let text = "The quick brown fox jumps over the lazy dog every single morning";
        assert_eq!(normalizer.normalize(text).await, text);
    }

    #[tokio::test]
    async fn test_idempotent_on_english() {
        let normalizer = Normalizer::without_translation();
        let text = "I walked home alone under a heavy winter sky";
        let once = normalizer.normalize(text).await;
        let twice = normalizer.normalize(&once).await;
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_slang_applied_before_detection() {
        let translator = MockTranslator::new().with_result("I do not know why you left");
        let normalizer = Normalizer::new(Arc::new(translator.clone()));

        let result = normalizer.normalize(INDONESIAN).await;

        // "aing" was slang-mapped to "saya" before the translator saw it.
        let calls = translator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("saya tidak tahu"));
        assert_eq!(result, "I do not know why you left");
    }

    #[tokio::test]
    async fn test_translation_error_falls_through() {
        let translator = MockTranslator::new().with_error("boom");
        let normalizer = Normalizer::new(Arc::new(translator));

        let result = normalizer.normalize(INDONESIAN).await;
        assert!(result.starts_with("saya tidak tahu"));
    }

    #[tokio::test]
    async fn test_empty_translation_falls_through() {
        let translator = MockTranslator::new().with_result("   ");
        let normalizer = Normalizer::new(Arc::new(translator));

        let result = normalizer.normalize(INDONESIAN).await;
        assert!(result.starts_with("saya tidak tahu"));
    }

    #[tokio::test]
    async fn test_no_translator_passes_through_normalized() {
        let normalizer = Normalizer::without_translation();
        let result = normalizer.normalize(INDONESIAN).await;
        assert!(result.starts_with("saya tidak tahu"));
    }

    #[tokio::test]
    async fn test_translation_input_capped() {
        let translator = MockTranslator::new().with_result("translated");
        let normalizer = Normalizer::new(Arc::new(translator.clone()));

        // Far beyond the 4,500-char translation bound.
        let long = format!("{} ", INDONESIAN).repeat(200);
        normalizer.normalize(&long).await;

        let calls = translator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].chars().count() <= TRANSLATE_MAX_CHARS);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 5), "héllo");
        assert_eq!(truncate_chars(text, 100), text);
        assert_eq!(truncate_chars("", 10), "");
    }
}
