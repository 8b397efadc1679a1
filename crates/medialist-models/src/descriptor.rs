use serde::{Deserialize, Serialize};

use crate::{ActorId, MediaType};

/// Loosely specified item to add to a list
///
/// Any mix of TMDB (primary), TVDB (secondary) and IMDb (public) ids, or a
/// free-text name and year. `user_id` requests that the item be recorded on
/// behalf of another actor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub tmdb_id: Option<u32>,
    #[serde(default)]
    pub tvdb_id: Option<u32>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
    #[serde(default)]
    pub user_id: Option<ActorId>,
}

impl ItemDescriptor {
    /// Non-blank free-text name, if any
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn has_name(&self) -> bool {
        self.display_name().is_some()
    }

    /// IMDb id with blanks treated as absent
    pub fn imdb(&self) -> Option<&str> {
        self.imdb_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_not_a_name() {
        let descriptor = ItemDescriptor {
            name: Some("   ".to_string()),
            ..ItemDescriptor::default()
        };
        assert!(!descriptor.has_name());
    }

    #[test]
    fn test_deserialize_partial_request() {
        let descriptor: ItemDescriptor =
            serde_json::from_str(r#"{"tmdb_id": 603, "media_type": "movie"}"#).unwrap();
        assert_eq!(descriptor.tmdb_id, Some(603));
        assert_eq!(descriptor.media_type, Some(MediaType::Movie));
        assert!(descriptor.name.is_none());
        assert!(descriptor.imdb().is_none());
    }
}
