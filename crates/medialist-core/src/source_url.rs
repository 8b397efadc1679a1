//! Source URL classification
//!
//! Maps an arbitrary URL to the catalog it points at (IMDb, Trakt, TMDB), the
//! kind of catalog object (user list, chart, search) and the parameters
//! embedded in it. Entries are scanned top to bottom and the first match
//! wins, so the order of [`SOURCE_PATTERNS`] is significant.

use medialist_models::{MediaType, MedialistSource, MedialistSourceType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;
use url::Url;

/// Named groups a source pattern may capture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCaptures {
    pub list_id: Option<String>,
    pub username: Option<String>,
    pub params: Option<String>,
    pub timeframe: Option<String>,
}

/// Matching strategy behind a table entry
pub trait UrlMatcher: Send + Sync {
    /// `None` when the input does not match at all
    fn captures(&self, input: &str) -> Option<SourceCaptures>;
}

/// `UrlMatcher` backed by a compiled regular expression
///
/// Recognized group names: `list_id`, `username`, `params`, `timeframe`.
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl UrlMatcher for RegexMatcher {
    fn captures(&self, input: &str) -> Option<SourceCaptures> {
        let caps = self.regex.captures(input)?;
        let group = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Some(SourceCaptures {
            list_id: group("list_id"),
            username: group("username"),
            params: group("params"),
            timeframe: group("timeframe"),
        })
    }
}

pub struct SourcePattern {
    pub source: MedialistSource,
    pub source_type: MedialistSourceType,
    pub matcher: Box<dyn UrlMatcher>,
}

impl SourcePattern {
    fn regex(source: MedialistSource, source_type: MedialistSourceType, pattern: &str) -> Self {
        Self {
            source,
            source_type,
            matcher: Box::new(RegexMatcher::new(pattern).unwrap()),
        }
    }
}

impl std::fmt::Debug for SourcePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourcePattern")
            .field("source", &self.source)
            .field("source_type", &self.source_type)
            .finish_non_exhaustive()
    }
}

/// Declared classification table
pub static SOURCE_PATTERNS: Lazy<Vec<SourcePattern>> = Lazy::new(|| {
    use MedialistSource::*;
    use MedialistSourceType::*;
    vec![
        SourcePattern::regex(
            Imdb,
            ImdbSearch,
            r"^https?://www\.imdb\.com/search/title[?]?(?P<params>.*)",
        ),
        // Not anchored: IMDb list links are often pasted with a prefix
        SourcePattern::regex(
            Imdb,
            ImdbList,
            r"https?://www\.imdb\.com/list/(?P<list_id>\w*)/?\??(?P<params>.*)",
        ),
        SourcePattern::regex(Imdb, ImdbChart, r"^https?://www\.imdb\.com/chart/(?P<list_id>.*)"),
        SourcePattern::regex(
            Trakt,
            TraktUserlist,
            r"^https?://trakt\.tv/users/(?P<username>.*)/lists/(?P<list_id>.*)\?(?P<params>.*)",
        ),
        SourcePattern::regex(
            Trakt,
            TraktCharttv,
            r"^https?://trakt\.tv/shows/(?P<list_id>\w*)/?(?P<timeframe>\w*)",
        ),
        SourcePattern::regex(
            Trakt,
            TraktChartmovie,
            r"^https?://trakt\.tv/movies/(?P<list_id>\w*)/?(?P<timeframe>\w*)",
        ),
        SourcePattern::regex(
            Tmdb,
            TmdbCharttv,
            r"^https?://(?:www\.)?themoviedb\.org/tv/(?P<list_id>\w*)/?(?P<timeframe>\w*)",
        ),
        SourcePattern::regex(
            Tmdb,
            TmdbChartmovie,
            r"^https?://(?:www\.)?themoviedb\.org/movie/(?P<list_id>\w*)/?(?P<timeframe>\w*)",
        ),
        SourcePattern::regex(
            Tmdb,
            TmdbUserlist,
            r"^https?://(?:www\.)?themoviedb\.org/list/(?P<list_id>\d+)\??(?P<params>.*)",
        ),
    ]
});

/// Classified source URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceUrlInfo {
    pub source: MedialistSource,
    pub source_type: MedialistSourceType,
    /// Set for chart sources, which only ever hold one kind
    pub media_type: Option<MediaType>,
    /// Scheme and host, when the input parses as a URL
    pub base_url: Option<String>,
    pub url_path: Option<String>,
    /// Raw query string, when the input parses as a URL
    pub url_params: Option<String>,
    pub list_id: Option<String>,
    pub username: Option<String>,
    pub params: Option<String>,
    pub timeframe: Option<String>,
}

/// Catalog family of a URL, judged by its hostname alone
pub fn source_family(url: &str) -> Option<MedialistSource> {
    let parsed = Url::parse(url).ok()?;
    family_of(&parsed)
}

fn family_of(url: &Url) -> Option<MedialistSource> {
    match url.host_str()? {
        "themoviedb.org" | "www.themoviedb.org" | "tmdb.org" | "www.tmdb.org" => {
            Some(MedialistSource::Tmdb)
        }
        "trakt.tv" | "www.trakt.tv" | "api.trakt.tv" => Some(MedialistSource::Trakt),
        "www.imdb.com" | "imdb.com" => Some(MedialistSource::Imdb),
        _ => None,
    }
}

/// Classify a URL against the declared table
pub fn classify(url: &str) -> Option<SourceUrlInfo> {
    classify_with(&SOURCE_PATTERNS, url)
}

/// Classify a URL against an arbitrary ordered table
pub fn classify_with(patterns: &[SourcePattern], url: &str) -> Option<SourceUrlInfo> {
    let parsed = Url::parse(url).ok();

    // First declared entry wins, whatever the host
    let (entry, captures) = patterns
        .iter()
        .find_map(|p| p.matcher.captures(url).map(|caps| (p, caps)))?;

    debug!("Classified {} as {} {}", url, entry.source, entry.source_type);

    let base_url = parsed.as_ref().and_then(|u| {
        u.host_str().map(|host| match u.port() {
            Some(port) => format!("{}://{}:{}", u.scheme(), host, port),
            None => format!("{}://{}", u.scheme(), host),
        })
    });

    Some(SourceUrlInfo {
        source: entry.source,
        source_type: entry.source_type,
        media_type: entry.source_type.implied_media_type(),
        base_url,
        url_path: parsed.as_ref().map(|u| u.path().to_string()),
        url_params: parsed.as_ref().and_then(|u| u.query()).map(str::to_string),
        list_id: captures.list_id,
        username: captures.username,
        params: captures.params,
        timeframe: captures.timeframe,
    })
}
