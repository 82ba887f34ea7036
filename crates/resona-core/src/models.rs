//! Core data models for the resona snapshot pipeline.
//!
//! These types are shared across all resona crates and represent the domain
//! entities: the listening catalog (artists, tracks), the assembled snapshot
//! document, and the emotion fingerprint derived from track titles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// =============================================================================
// HORIZON
// =============================================================================

/// Time horizon over which the catalog provider aggregates a user's history.
///
/// The wire encoding (`short_term` | `medium_term` | `long_term`) is a closed
/// set; parsing anything else fails with [`Error::BadRequest`]. The same
/// encoding is used in cache keys and archive rows so that other readers
/// interoperate at the wire level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "short_term")]
    Short,
    #[serde(rename = "medium_term")]
    Medium,
    #[serde(rename = "long_term")]
    Long,
}

impl Horizon {
    /// Wire-level encoding used in provider query strings, cache keys, and
    /// archive rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::Short => "short_term",
            Horizon::Medium => "medium_term",
            Horizon::Long => "long_term",
        }
    }

    /// All horizons, in window order.
    pub fn all() -> [Horizon; 3] {
        [Horizon::Short, Horizon::Medium, Horizon::Long]
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_term" => Ok(Horizon::Short),
            "medium_term" => Ok(Horizon::Medium),
            "long_term" => Ok(Horizon::Long),
            other => Err(Error::BadRequest(format!("unknown horizon: {}", other))),
        }
    }
}

// =============================================================================
// USERS
// =============================================================================

/// A user as persisted in the relational store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned identifier; unique within the store.
    pub external_id: String,
    /// Last-writer-wins display name.
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Profile returned by the identity provider for a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub external_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Result of exchanging an authorization code at the provider's token
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

// =============================================================================
// CATALOG
// =============================================================================

/// An artist as returned by the catalog provider.
///
/// `genres` is a denormalized attribute that exists only inside snapshot
/// documents; the relational store persists id, name, popularity, and image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    /// Provider-assigned identifier.
    pub id: String,
    pub name: String,
    /// Integer 0-100.
    pub popularity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Album detail denormalized inside snapshot tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub total_tracks: i32,
}

/// A track as returned by the catalog provider.
///
/// Album and track-artist names are denormalized inside the snapshot
/// document only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Provider-assigned identifier.
    pub id: String,
    pub name: String,
    /// Integer 0-100.
    pub popularity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub album: Album,
    /// Ordered artist names, provider order.
    pub artists: Vec<String>,
    pub duration_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// =============================================================================
// EMOTION FINGERPRINT
// =============================================================================

/// One ranked emotion label with its renormalized score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f64,
}

/// The emotion fingerprint derived from a corpus: the ranked top emotions
/// plus the human-readable paragraph composed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    /// Top 5 labels after merge, neutral-drop, and renormalization.
    pub top_emotions: Vec<EmotionScore>,
    /// "Shades of <a>, <b>, <c>." composed from the top 3 distinct labels.
    pub paragraph: String,
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// One entry of the genre histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreCount {
    pub name: String,
    pub count: u32,
}

/// The complete denormalized document for one `(user, horizon)` pair.
///
/// The orchestrator is the sole writer; the cache and archive hold
/// independent copies that are byte-equal at the moment of write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Up to 20 artists, provider order.
    pub artists: Vec<Artist>,
    /// Up to 20 tracks, provider order.
    pub tracks: Vec<Track>,
    /// Top-20 genre histogram, counts descending, ties by first appearance.
    pub genres: Vec<GenreCount>,
    pub emotion_paragraph: String,
    pub top_emotions: Vec<EmotionScore>,
    pub horizon: Horizon,
    /// Wall-clock UTC timestamp stamped at persist time.
    pub last_synced: DateTime<Utc>,
}

/// One archived snapshot row, document kept opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedSnapshot {
    pub external_user_id: String,
    pub horizon: Horizon,
    pub document: JsonValue,
    pub last_synced: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_wire_encoding() {
        assert_eq!(Horizon::Short.as_str(), "short_term");
        assert_eq!(Horizon::Medium.as_str(), "medium_term");
        assert_eq!(Horizon::Long.as_str(), "long_term");
    }

    #[test]
    fn test_horizon_parse_roundtrip() {
        for h in Horizon::all() {
            assert_eq!(h.as_str().parse::<Horizon>().unwrap(), h);
        }
    }

    #[test]
    fn test_horizon_parse_rejects_unknown() {
        let err = "weekly".parse::<Horizon>().unwrap_err();
        match err {
            Error::BadRequest(msg) => assert!(msg.contains("weekly")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_horizon_parse_rejects_bare_label() {
        // Only the wire form is accepted; "short" is not in the closed set.
        assert!("short".parse::<Horizon>().is_err());
    }

    #[test]
    fn test_horizon_serde_uses_wire_form() {
        let json = serde_json::to_string(&Horizon::Medium).unwrap();
        assert_eq!(json, "\"medium_term\"");
        let back: Horizon = serde_json::from_str("\"long_term\"").unwrap();
        assert_eq!(back, Horizon::Long);
    }

    #[test]
    fn test_album_kind_serializes_as_type() {
        let album = Album {
            name: "OK Computer".to_string(),
            kind: "album".to_string(),
            total_tracks: 12,
        };
        let json = serde_json::to_value(&album).unwrap();
        assert_eq!(json["type"], "album");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_artist_genres_default_empty() {
        let json = r#"{"id": "a1", "name": "Boards", "popularity": 70}"#;
        let artist: Artist = serde_json::from_str(json).unwrap();
        assert!(artist.genres.is_empty());
        assert!(artist.image_url.is_none());
    }

    #[test]
    fn test_snapshot_serde_roundtrip() {
        let snapshot = Snapshot {
            display_name: "test user".to_string(),
            image_url: None,
            artists: vec![],
            tracks: vec![],
            genres: vec![GenreCount {
                name: "rock".to_string(),
                count: 2,
            }],
            emotion_paragraph: "Shades of radiant joy.".to_string(),
            top_emotions: vec![EmotionScore {
                label: "joy".to_string(),
                score: 0.6,
            }],
            horizon: Horizon::Short,
            last_synced: Utc::now(),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_snapshot_omits_none_image() {
        let snapshot = Snapshot {
            display_name: "u".to_string(),
            image_url: None,
            artists: vec![],
            tracks: vec![],
            genres: vec![],
            emotion_paragraph: String::new(),
            top_emotions: vec![],
            horizon: Horizon::Long,
            last_synced: Utc::now(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("image_url").is_none());
        assert_eq!(json["horizon"], "long_term");
    }
}
