//! # resona-core
//!
//! Core types, traits, and abstractions for the resona listening-snapshot
//! pipeline.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other resona crates depend on: the domain model (users, artists,
//! tracks, snapshots), the closed error sum type, and the repository/backend
//! seams implemented by the db, provider, inference, and pipeline crates.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
