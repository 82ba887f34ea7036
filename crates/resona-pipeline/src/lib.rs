//! resona-pipeline: snapshot orchestration, Redis snapshot cache, realtime
//! refresh path, and the lyrics mood entry point.
//!
//! This crate wires the provider clients, repositories, and inference
//! backends together behind [`SnapshotService`] (the single write path) and
//! [`SnapshotReader`] (the read path with cache fallback).

pub mod cache;
pub mod mood;
pub mod orchestrator;
pub mod refresh;

#[cfg(test)]
mod testutil;

pub use cache::RedisSnapshotCache;
pub use mood::MoodAnalyzer;
pub use orchestrator::SnapshotService;
pub use refresh::SnapshotReader;

// Re-export the core contract types pipeline consumers need.
pub use resona_core::{Error, Horizon, Result, Snapshot};
