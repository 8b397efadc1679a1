//! Identifier resolution
//!
//! Turns a loosely specified descriptor into a canonical media record. Local
//! exact-match lookups come first; the metadata provider is only consulted
//! when none of them hit, and a record it returns is persisted so the next
//! request for the same title resolves locally.

use medialist_models::{ItemDescriptor, Media, NewMedia};
use medialist_sources::{MetadataProvider, ProviderError, ProviderMedia};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::MedialistError;
use crate::store::{MediaRepository, StoreError};

pub struct IdentifierResolver {
    media: Arc<dyn MediaRepository>,
    provider: Option<Arc<dyn MetadataProvider>>,
    provider_timeout: Duration,
}

impl IdentifierResolver {
    pub fn new(
        media: Arc<dyn MediaRepository>,
        provider: Option<Arc<dyn MetadataProvider>>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            media,
            provider,
            provider_timeout,
        }
    }

    /// Resolve a descriptor to canonical media
    ///
    /// Tiers are tried in order and never combined:
    /// 1. stored media by TMDB id (and media type when given)
    /// 2. stored media by TVDB id
    /// 3. stored media by IMDb id
    /// 4. provider lookup by TMDB id, needs a media type
    /// 5. provider lookup by IMDb id
    ///
    /// `Ok(None)` means nothing resolved but the descriptor has a name to
    /// fall back on; without a name that is `InsufficientDetail`.
    pub async fn resolve(
        &self,
        descriptor: &ItemDescriptor,
    ) -> Result<Option<Media>, MedialistError> {
        if let Some(tmdb_id) = descriptor.tmdb_id {
            let stored = self
                .media
                .find_media_by_tmdb(tmdb_id, descriptor.media_type)
                .await?;
            if let Some(media) = stored {
                debug!("Resolver: TMDB id {} matched stored media {}", tmdb_id, media.id);
                return Ok(Some(media));
            }
        }

        if let Some(tvdb_id) = descriptor.tvdb_id {
            if let Some(media) = self.media.find_media_by_tvdb(tvdb_id).await? {
                debug!("Resolver: TVDB id {} matched stored media {}", tvdb_id, media.id);
                return Ok(Some(media));
            }
        }

        if let Some(imdb_id) = descriptor.imdb() {
            if let Some(media) = self.media.find_media_by_imdb(imdb_id).await? {
                debug!("Resolver: IMDb id {} matched stored media {}", imdb_id, media.id);
                return Ok(Some(media));
            }
        }

        if let Some(provider) = &self.provider {
            if let (Some(tmdb_id), Some(media_type)) = (descriptor.tmdb_id, descriptor.media_type) {
                let fetched = self
                    .call_provider(
                        provider.as_ref(),
                        descriptor,
                        provider.fetch_by_primary_id(tmdb_id, media_type),
                    )
                    .await?;
                if let Some(record) = fetched {
                    return self.persist(record, descriptor).await.map(Some);
                }
            }

            if let Some(imdb_id) = descriptor.imdb() {
                let fetched = self
                    .call_provider(
                        provider.as_ref(),
                        descriptor,
                        provider.fetch_by_public_id(imdb_id),
                    )
                    .await?;
                if let Some(record) = fetched {
                    return self.persist(record, descriptor).await.map(Some);
                }
            }
        } else {
            debug!("Resolver: no metadata provider configured, skipping remote tiers");
        }

        if !descriptor.has_name() {
            return Err(MedialistError::InsufficientDetail);
        }

        debug!(
            "Resolver: '{}' left unresolved, keeping the free-text name",
            descriptor.display_name().unwrap_or_default()
        );
        Ok(None)
    }

    /// Bounded provider call
    ///
    /// A timeout counts as "not found" when the descriptor still has a name
    /// to fall back on. Any other provider failure is returned as is.
    async fn call_provider<F>(
        &self,
        provider: &dyn MetadataProvider,
        descriptor: &ItemDescriptor,
        call: F,
    ) -> Result<Option<ProviderMedia>, MedialistError>
    where
        F: Future<Output = Result<Option<ProviderMedia>, ProviderError>>,
    {
        match tokio::time::timeout(self.provider_timeout, call).await {
            Ok(Ok(record)) => Ok(record),
            Ok(Err(e)) => {
                warn!("Resolver: {} lookup failed: {}", provider.provider_name(), e);
                Err(MedialistError::Upstream(e))
            }
            Err(_) => {
                let err = ProviderError::Timeout {
                    provider: provider.provider_name().to_string(),
                    timeout: self.provider_timeout,
                };
                if descriptor.has_name() {
                    warn!("Resolver: {}, continuing with the item name", err);
                    Ok(None)
                } else {
                    warn!("Resolver: {}", err);
                    Err(MedialistError::Upstream(err))
                }
            }
        }
    }

    async fn persist(
        &self,
        record: ProviderMedia,
        descriptor: &ItemDescriptor,
    ) -> Result<Media, MedialistError> {
        // The provider knows what kind the title is; the descriptor only guesses
        let media_type = record.media_type;
        if let Some(requested) = descriptor.media_type.filter(|t| *t != media_type) {
            warn!(
                "Resolver: TMDB {} is {} but the item was described as {}, storing as {}",
                record.tmdb_id, media_type, requested, media_type
            );
        }
        let new_media = NewMedia {
            tvdb_id: descriptor.tvdb_id.or(record.tvdb_id),
            imdb_id: record
                .imdb_id
                .clone()
                .or_else(|| descriptor.imdb().map(str::to_string)),
            ..NewMedia::unknown(record.tmdb_id, media_type)
        };

        match self.media.insert_media(new_media).await {
            Ok(media) => {
                info!(
                    "Resolver: created media {} for TMDB {} {}",
                    media.id, media.tmdb_id, media.media_type
                );
                Ok(media)
            }
            Err(StoreError::Conflict(message)) => {
                // Another request created the same title first
                debug!("Resolver: {}, reusing stored record", message);
                self.media
                    .find_media_by_tmdb(record.tmdb_id, Some(media_type))
                    .await?
                    .ok_or_else(|| StoreError::Conflict(message).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
