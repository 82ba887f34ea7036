//! Structured logging schema and field name constants for resona.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a snapshot build and its sub-calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "provider", "db", "inference", "cache", "pipeline"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "identity", "catalog", "ensemble", "normalizer", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "fetch_profile", "top_artists", "classify", "build_snapshot"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Provider-assigned user id being operated on.
pub const USER_ID: &str = "user_id";

/// Horizon wire label (`short_term` | `medium_term` | `long_term`).
pub const HORIZON: &str = "horizon";

/// Classifier or translation model name.
pub const MODEL: &str = "model";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of items returned by a provider read or repository query.
pub const RESULT_COUNT: &str = "result_count";

/// Character length of a corpus sent to the ensemble.
pub const CORPUS_LEN: &str = "corpus_len";
