//! Error types for the resona snapshot pipeline.

use thiserror::Error;

/// Result type alias using resona's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for resona operations.
///
/// The snapshot orchestrator exposes a closed set of failure kinds; callers
/// match on these variants rather than inspecting strings.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied an invalid parameter (e.g. an unknown horizon)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The upstream access token is no longer valid; caller must re-authenticate
    #[error("Token expired")]
    TokenExpired,

    /// Authorization-code exchange was rejected by the identity provider
    #[error("Upstream auth error: {0}")]
    UpstreamAuth(String),

    /// Transient upstream provider failure; caller may retry
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Both emotion classifiers failed or timed out
    #[error("Models unavailable: {0}")]
    ModelsUnavailable(String),

    /// Translation service failure (always swallowed by the normalizer)
    #[error("Translation failed: {0}")]
    Translation(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Cache backend operation failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// No cached snapshot and no token to build one
    #[error("No data: {0}")]
    NoData(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_bad_request() {
        let err = Error::BadRequest("unknown horizon: weekly".to_string());
        assert_eq!(err.to_string(), "Bad request: unknown horizon: weekly");
    }

    #[test]
    fn test_error_display_token_expired() {
        assert_eq!(Error::TokenExpired.to_string(), "Token expired");
    }

    #[test]
    fn test_error_display_upstream_auth() {
        let err = Error::UpstreamAuth("invalid_grant".to_string());
        assert_eq!(err.to_string(), "Upstream auth error: invalid_grant");
    }

    #[test]
    fn test_error_display_upstream() {
        let err = Error::Upstream("503 Service Unavailable".to_string());
        assert_eq!(err.to_string(), "Upstream error: 503 Service Unavailable");
    }

    #[test]
    fn test_error_display_models_unavailable() {
        let err = Error::ModelsUnavailable("both classifiers failed".to_string());
        assert_eq!(
            err.to_string(),
            "Models unavailable: both classifiers failed"
        );
    }

    #[test]
    fn test_error_display_translation() {
        let err = Error::Translation("empty response".to_string());
        assert_eq!(err.to_string(), "Translation failed: empty response");
    }

    #[test]
    fn test_error_display_no_data() {
        let err = Error::NoData("user42/short_term".to_string());
        assert_eq!(err.to_string(), "No data: user42/short_term");
    }

    #[test]
    fn test_error_display_cache() {
        let err = Error::Cache("connection refused".to_string());
        assert_eq!(err.to_string(), "Cache error: connection refused");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::TokenExpired;
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("TokenExpired"));
    }
}
