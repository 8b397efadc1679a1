use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MediaType;

/// External catalog a list can be sourced from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MedialistSource {
    Tmdb,
    Tvdb,
    Imdb,
    Trakt,
}

impl MedialistSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedialistSource::Tmdb => "tmdb",
            MedialistSource::Tvdb => "tvdb",
            MedialistSource::Imdb => "imdb",
            MedialistSource::Trakt => "trakt",
        }
    }
}

impl fmt::Display for MedialistSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of catalog object a source URL points at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MedialistSourceType {
    ImdbList,
    ImdbChart,
    ImdbSearch,
    TraktUserlist,
    TraktChartmovie,
    TraktCharttv,
    TmdbChartmovie,
    TmdbCharttv,
    TmdbUserlist,
}

impl MedialistSourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedialistSourceType::ImdbList => "imdb_list",
            MedialistSourceType::ImdbChart => "imdb_chart",
            MedialistSourceType::ImdbSearch => "imdb_search",
            MedialistSourceType::TraktUserlist => "trakt_userlist",
            MedialistSourceType::TraktChartmovie => "trakt_chartmovie",
            MedialistSourceType::TraktCharttv => "trakt_charttv",
            MedialistSourceType::TmdbChartmovie => "tmdb_chartmovie",
            MedialistSourceType::TmdbCharttv => "tmdb_charttv",
            MedialistSourceType::TmdbUserlist => "tmdb_userlist",
        }
    }

    /// Media type implied by chart sources; lists and searches can mix both
    pub fn implied_media_type(&self) -> Option<MediaType> {
        match self {
            MedialistSourceType::TraktChartmovie | MedialistSourceType::TmdbChartmovie => {
                Some(MediaType::Movie)
            }
            MedialistSourceType::TraktCharttv | MedialistSourceType::TmdbCharttv => {
                Some(MediaType::Tv)
            }
            _ => None,
        }
    }
}

impl fmt::Display for MedialistSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_wire_names_match_as_str() {
        let all = [
            MedialistSourceType::ImdbList,
            MedialistSourceType::ImdbChart,
            MedialistSourceType::ImdbSearch,
            MedialistSourceType::TraktUserlist,
            MedialistSourceType::TraktChartmovie,
            MedialistSourceType::TraktCharttv,
            MedialistSourceType::TmdbChartmovie,
            MedialistSourceType::TmdbCharttv,
            MedialistSourceType::TmdbUserlist,
        ];
        for source_type in all {
            let json = serde_json::to_string(&source_type).unwrap();
            assert_eq!(json, format!("\"{}\"", source_type.as_str()));
        }
    }

    #[test]
    fn test_implied_media_type() {
        assert_eq!(MedialistSourceType::TraktCharttv.implied_media_type(), Some(MediaType::Tv));
        assert_eq!(MedialistSourceType::TmdbChartmovie.implied_media_type(), Some(MediaType::Movie));
        assert_eq!(MedialistSourceType::ImdbList.implied_media_type(), None);
    }
}
