//! # resona-inference
//!
//! Language normalization and emotion-ensemble inference for resona.
//!
//! This crate provides:
//! - The slang dictionary and [`normalize::Normalizer`] (slang pass,
//!   language detection, best-effort translation to English)
//! - Remote classifier backends emitting the 28-label GoEmotions taxonomy
//! - The [`ensemble::EmotionEnsemble`]: concurrent dispatch, score merge,
//!   neutral-drop, renormalization, ranking, and paragraph composition
//!
//! All remote calls degrade rather than fail the pipeline: translation
//! failures pass the original text through, and only the loss of every
//! classifier surfaces as `Error::ModelsUnavailable`.

pub mod classifier;
pub mod ensemble;
pub mod normalize;
pub mod slang;
pub mod translate;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use classifier::{HttpClassifierBackend, GOEMOTIONS_LABELS, NEUTRAL_LABEL};
pub use ensemble::EmotionEnsemble;
pub use normalize::Normalizer;
pub use translate::HttpTranslator;
