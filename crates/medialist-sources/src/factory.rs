//! Provider creation from configuration and stored credentials

use anyhow::Result;
use medialist_config::{Config, CredentialStore};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{MetadataProvider, ProviderError, TmdbClient};

/// Build the configured metadata provider
///
/// Returns `None` when the provider is disabled. An enabled provider without
/// an API key is a configuration error.
pub fn create_provider(
    config: &Config,
    credentials: &CredentialStore,
) -> Result<Option<Arc<dyn MetadataProvider>>> {
    if !config.provider.enabled {
        debug!("Metadata provider disabled in configuration");
        return Ok(None);
    }

    let api_key = credentials.get_tmdb_api_key().ok_or_else(|| {
        warn!("TMDB is enabled but no API key is stored");
        ProviderError::NotConfigured(
            "missing tmdb_api_key (run `medialist config tmdb`)".to_string(),
        )
    })?;

    let client = TmdbClient::new(
        api_key.clone(),
        config.provider.base_url.clone(),
        config.provider.language.clone(),
        config.provider.timeout(),
    );
    Ok(Some(Arc::new(client)))
}
