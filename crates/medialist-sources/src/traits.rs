use async_trait::async_trait;
use medialist_models::MediaType;
use serde::{Deserialize, Serialize};

use crate::ProviderError;

/// Normalized record returned by a metadata provider
///
/// `tmdb_id` is always present; the cross-reference ids are whatever the
/// provider knows about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderMedia {
    pub tmdb_id: u32,
    pub media_type: MediaType,
    pub tvdb_id: Option<u32>,
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub year: Option<u32>,
}

/// Black-box lookup service used as the resolver's last resort
///
/// Both methods return `Ok(None)` when the provider has no such title; an
/// `Err` means the provider could not answer.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Name used in logs and errors
    fn provider_name(&self) -> &str;

    /// Full metadata by TMDB id and media type
    async fn fetch_by_primary_id(
        &self,
        tmdb_id: u32,
        media_type: MediaType,
    ) -> Result<Option<ProviderMedia>, ProviderError>;

    /// Full metadata by IMDb id
    async fn fetch_by_public_id(
        &self,
        imdb_id: &str,
    ) -> Result<Option<ProviderMedia>, ProviderError>;
}
