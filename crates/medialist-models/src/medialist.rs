use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActorId, MediaId, MediaType, MedialistSource, MedialistSourceType};

pub type MedialistId = u64;

/// A named, owned collection of media references
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medialist {
    pub id: MedialistId,
    pub name: String,
    pub created_by: ActorId,
    pub overview: Option<String>,
    pub backdrop_url: Option<String>,
    pub poster_url: Option<String>,
    pub source: Option<MedialistSource>,
    pub source_type: Option<MedialistSourceType>,
    pub source_url: Option<String>,
    pub source_limit: Option<u32>,
    /// Items of an auto-updating list are owned by the sync process
    pub auto_update: bool,
    pub source_genres: Option<String>,
    pub source_ratings: Option<String>,
    pub source_years: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medialist {
    pub fn is_owned_by(&self, actor_id: ActorId) -> bool {
        self.created_by == actor_id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMedialist {
    pub name: String,
    pub created_by: ActorId,
    pub overview: Option<String>,
    pub backdrop_url: Option<String>,
    pub poster_url: Option<String>,
    pub source: Option<MedialistSource>,
    pub source_type: Option<MedialistSourceType>,
    pub source_url: Option<String>,
    pub source_limit: Option<u32>,
    pub auto_update: bool,
    pub source_genres: Option<String>,
    pub source_ratings: Option<String>,
    pub source_years: Option<String>,
}

/// One entry of a list
///
/// Either `media_id` or `name` is always set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedialistItem {
    pub id: u64,
    pub medialist_id: MedialistId,
    pub added_by: Option<ActorId>,
    pub media_id: Option<MediaId>,
    pub name: Option<String>,
    pub year: Option<u32>,
    pub media_type: Option<MediaType>,
    pub tmdb_id: Option<u32>,
    pub tvdb_id: Option<u32>,
    pub imdb_id: Option<String>,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMedialistItem {
    pub medialist_id: MedialistId,
    pub added_by: Option<ActorId>,
    pub media_id: Option<MediaId>,
    pub name: Option<String>,
    pub year: Option<u32>,
    pub media_type: Option<MediaType>,
    pub tmdb_id: Option<u32>,
    pub tvdb_id: Option<u32>,
    pub imdb_id: Option<String>,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
}

impl NewMedialistItem {
    /// An item must be identifiable by a media reference or a name
    pub fn is_identifiable(&self) -> bool {
        self.media_id.is_some()
            || self.name.as_deref().map(|n| !n.trim().is_empty()).unwrap_or(false)
    }
}
