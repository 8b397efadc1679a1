use async_trait::async_trait;
use medialist_models::MediaType;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::tmdb::api::{self, TmdbEndpoint};
use crate::{MetadataProvider, ProviderError, ProviderMedia};

/// Create a reqwest Client for TMDB requests
pub fn create_tmdb_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent(concat!("medialist/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: String, language: String, timeout: Duration) -> Self {
        Self {
            client: Arc::new(create_tmdb_client(timeout)),
            base_url,
            api_key,
            language,
        }
    }

    fn endpoint(&self) -> TmdbEndpoint<'_> {
        TmdbEndpoint {
            base_url: &self.base_url,
            api_key: &self.api_key,
            language: &self.language,
        }
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    fn provider_name(&self) -> &str {
        "tmdb"
    }

    async fn fetch_by_primary_id(
        &self,
        tmdb_id: u32,
        media_type: MediaType,
    ) -> Result<Option<ProviderMedia>, ProviderError> {
        debug!("TMDB: fetching {} {}", media_type, tmdb_id);
        api::get_details(&self.client, &self.endpoint(), tmdb_id, media_type).await
    }

    async fn fetch_by_public_id(
        &self,
        imdb_id: &str,
    ) -> Result<Option<ProviderMedia>, ProviderError> {
        debug!("TMDB: finding {}", imdb_id);
        api::find_by_imdb_id(&self.client, &self.endpoint(), imdb_id).await
    }
}
