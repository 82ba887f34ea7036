//! Centralized default constants for the resona pipeline.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers. When adding new constants, place them in the appropriate section
//! and document the rationale for the chosen value.

// =============================================================================
// CATALOG
// =============================================================================

/// Number of top artists/tracks requested per horizon in the core flow.
pub const TOP_LIMIT: usize = 20;

/// Number of genre histogram entries emitted in a snapshot.
pub const GENRE_LIMIT: usize = 20;

// =============================================================================
// EMOTION ENSEMBLE
// =============================================================================

/// Number of ranked emotions emitted as `top_emotions`.
pub const TOP_EMOTIONS: usize = 5;

/// Number of distinct labels composed into the emotion paragraph.
pub const PARAGRAPH_LABELS: usize = 3;

/// Corpus truncation bound (characters) before dispatch to the classifiers.
pub const CORPUS_MAX_CHARS: usize = 2_000;

/// Wall-clock cap for the whole ensemble, after which the degraded-document
/// path is taken.
pub const ENSEMBLE_TIMEOUT_SECS: u64 = 15;

/// Per-request timeout for a single classifier call.
pub const CLASSIFY_TIMEOUT_SECS: u64 = 10;

/// Capacity of the in-process LRU keyed by post-normalization corpus.
pub const EMOTION_CACHE_CAPACITY: usize = 256;

/// Paragraph emitted when both classifiers are unavailable.
pub const DEGRADED_PARAGRAPH: &str = "Vibe analysis is currently unavailable.";

/// Labels used to pad the paragraph when fewer than three non-neutral
/// emotions survive renormalization, applied in order.
pub const FALLBACK_EMOTIONS: [&str; 3] = ["optimism", "joy", "sadness"];

// =============================================================================
// LANGUAGE NORMALIZATION
// =============================================================================

/// Sample size (characters) for source-language detection.
pub const DETECT_SAMPLE_CHARS: usize = 500;

/// Maximum characters submitted to the translation service.
pub const TRANSLATE_MAX_CHARS: usize = 4_500;

/// Per-request timeout for a translation call.
pub const TRANSLATE_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// SNAPSHOT CACHE
// =============================================================================

/// Default snapshot TTL: one hour.
pub const CACHE_TTL_SECS: u64 = 3_600;

/// Key prefix shared by all snapshot cache entries.
pub const CACHE_PREFIX: &str = "top:";

// =============================================================================
// UPSTREAM PROVIDERS
// =============================================================================

/// Per-request timeout for identity and catalog provider calls.
pub const PROVIDER_TIMEOUT_SECS: u64 = 10;
