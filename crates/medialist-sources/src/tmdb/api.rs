use medialist_models::MediaType;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{ProviderError, ProviderMedia};

const PROVIDER: &str = "tmdb";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbExternalIds {
    pub imdb_id: Option<String>,
    pub tvdb_id: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TmdbMovieDetails {
    id: u32,
    title: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    external_ids: TmdbExternalIds,
}

#[derive(Debug, Serialize, Deserialize)]
struct TmdbTvDetails {
    id: u32,
    name: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    external_ids: TmdbExternalIds,
}

#[derive(Debug, Serialize, Deserialize)]
struct TmdbFindEntry {
    id: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct TmdbFindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbFindEntry>,
    #[serde(default)]
    tv_results: Vec<TmdbFindEntry>,
}

/// Connection settings shared by every call
#[derive(Debug, Clone)]
pub struct TmdbEndpoint<'a> {
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub language: &'a str,
}

/// Year from a TMDB date string ("1999-03-30"); empty dates are common
fn year_from_date(date: Option<&str>) -> Option<u32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

/// IMDb ids come back as "" for titles without one
fn clean_imdb_id(imdb_id: Option<String>) -> Option<String> {
    imdb_id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())
}

fn parse_details(body: &str, media_type: MediaType) -> Result<ProviderMedia, ProviderError> {
    let decode = |e: serde_json::Error| ProviderError::Decode {
        provider: PROVIDER,
        message: e.to_string(),
    };

    let media = match media_type {
        MediaType::Movie => {
            let movie: TmdbMovieDetails = serde_json::from_str(body).map_err(decode)?;
            ProviderMedia {
                tmdb_id: movie.id,
                media_type,
                tvdb_id: movie.external_ids.tvdb_id,
                imdb_id: clean_imdb_id(movie.external_ids.imdb_id),
                title: movie.title,
                year: year_from_date(movie.release_date.as_deref()),
            }
        }
        MediaType::Tv => {
            let show: TmdbTvDetails = serde_json::from_str(body).map_err(decode)?;
            ProviderMedia {
                tmdb_id: show.id,
                media_type,
                tvdb_id: show.external_ids.tvdb_id,
                imdb_id: clean_imdb_id(show.external_ids.imdb_id),
                title: show.name,
                year: year_from_date(show.first_air_date.as_deref()),
            }
        }
    };
    Ok(media)
}

/// First match of a /find response; movies win over shows
fn parse_find(body: &str) -> Result<Option<(u32, MediaType)>, ProviderError> {
    let found: TmdbFindResponse = serde_json::from_str(body).map_err(|e| ProviderError::Decode {
        provider: PROVIDER,
        message: e.to_string(),
    })?;

    if let Some(movie) = found.movie_results.first() {
        return Ok(Some((movie.id, MediaType::Movie)));
    }
    Ok(found.tv_results.first().map(|show| (show.id, MediaType::Tv)))
}

/// GET a TMDB resource; 404 is reported as `None`
async fn get_json(
    client: &Client,
    url: &str,
    endpoint: &TmdbEndpoint<'_>,
    extra: &[(&str, &str)],
) -> Result<Option<String>, ProviderError> {
    let mut query: Vec<(&str, &str)> =
        vec![("api_key", endpoint.api_key), ("language", endpoint.language)];
    query.extend_from_slice(extra);

    let response = client
        .get(url)
        .query(&query)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| ProviderError::Http { provider: PROVIDER, source })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        debug!("TMDB: {} not found", url);
        return Ok(None);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("TMDB request failed: HTTP {} - {}", status, body);
        return Err(ProviderError::Status {
            provider: PROVIDER,
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::Http { provider: PROVIDER, source })?;
    Ok(Some(body))
}

/// Movie or TV details including external ids
pub async fn get_details(
    client: &Client,
    endpoint: &TmdbEndpoint<'_>,
    tmdb_id: u32,
    media_type: MediaType,
) -> Result<Option<ProviderMedia>, ProviderError> {
    let url = format!(
        "{}/{}/{}",
        endpoint.base_url.trim_end_matches('/'),
        media_type.as_str(),
        tmdb_id
    );
    match get_json(client, &url, endpoint, &[("append_to_response", "external_ids")]).await? {
        Some(body) => parse_details(&body, media_type).map(Some),
        None => Ok(None),
    }
}

/// Look up an IMDb id via /find, then fetch the details for its cross-reference ids
pub async fn find_by_imdb_id(
    client: &Client,
    endpoint: &TmdbEndpoint<'_>,
    imdb_id: &str,
) -> Result<Option<ProviderMedia>, ProviderError> {
    let url = format!(
        "{}/find/{}",
        endpoint.base_url.trim_end_matches('/'),
        urlencoding::encode(imdb_id)
    );
    let body = match get_json(client, &url, endpoint, &[("external_source", "imdb_id")]).await? {
        Some(body) => body,
        None => return Ok(None),
    };

    match parse_find(&body)? {
        Some((tmdb_id, media_type)) => {
            debug!("TMDB: {} maps to {} {}", imdb_id, media_type, tmdb_id);
            get_details(client, endpoint, tmdb_id, media_type).await
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_details() {
        let body = r#"{
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "external_ids": {"imdb_id": "tt0133093", "tvdb_id": null}
        }"#;
        let media = parse_details(body, MediaType::Movie).unwrap();
        assert_eq!(media.tmdb_id, 603);
        assert_eq!(media.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(media.tvdb_id, None);
        assert_eq!(media.year, Some(1999));
        assert_eq!(media.title.as_deref(), Some("The Matrix"));
    }

    #[test]
    fn test_parse_tv_details_with_blank_fields() {
        let body = r#"{
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "",
            "external_ids": {"imdb_id": "", "tvdb_id": 121361}
        }"#;
        let media = parse_details(body, MediaType::Tv).unwrap();
        assert_eq!(media.media_type, MediaType::Tv);
        assert_eq!(media.tvdb_id, Some(121361));
        assert_eq!(media.imdb_id, None);
        assert_eq!(media.year, None);
    }

    #[test]
    fn test_parse_details_without_external_ids() {
        let media = parse_details(r#"{"id": 5, "title": "Four Rooms"}"#, MediaType::Movie).unwrap();
        assert_eq!(media.tmdb_id, 5);
        assert!(media.imdb_id.is_none());
    }

    #[test]
    fn test_parse_find_prefers_movies() {
        let body = r#"{"movie_results": [{"id": 603}], "tv_results": [{"id": 1}]}"#;
        assert_eq!(parse_find(body).unwrap(), Some((603, MediaType::Movie)));

        let body = r#"{"movie_results": [], "tv_results": [{"id": 1399}]}"#;
        assert_eq!(parse_find(body).unwrap(), Some((1399, MediaType::Tv)));

        assert_eq!(parse_find("{}").unwrap(), None);
    }

    #[test]
    fn test_parse_garbage_is_decode_error() {
        let err = parse_details("not json", MediaType::Movie).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }
}
