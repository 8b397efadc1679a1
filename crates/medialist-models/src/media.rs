use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type MediaId = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaType::Movie),
            "tv" | "show" | "shows" | "series" => Ok(MediaType::Tv),
            other => Err(format!("Invalid media type: {}. Use 'movie' or 'tv'", other)),
        }
    }
}

/// Availability of a media record on the local server
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaStatus {
    Unknown,
    Pending,
    Processing,
    PartiallyAvailable,
    Available,
}

impl Default for MediaStatus {
    fn default() -> Self {
        MediaStatus::Unknown
    }
}

/// Canonical, deduplicated media record
///
/// Keyed by TMDB id plus media type. TVDB and IMDb ids are optional
/// cross-references used by the resolver's exact-match tiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Media {
    pub id: MediaId,
    pub tmdb_id: u32,
    pub media_type: MediaType,
    pub tvdb_id: Option<u32>,
    pub imdb_id: Option<String>,
    pub status: MediaStatus,
    pub status_4k: MediaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Media record not yet persisted (the store assigns id and timestamps)
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedia {
    pub tmdb_id: u32,
    pub media_type: MediaType,
    pub tvdb_id: Option<u32>,
    pub imdb_id: Option<String>,
    pub status: MediaStatus,
    pub status_4k: MediaStatus,
}

impl NewMedia {
    /// A freshly discovered record whose availability is not known yet
    pub fn unknown(tmdb_id: u32, media_type: MediaType) -> Self {
        Self {
            tmdb_id,
            media_type,
            tvdb_id: None,
            imdb_id: None,
            status: MediaStatus::Unknown,
            status_4k: MediaStatus::Unknown,
        }
    }
}
