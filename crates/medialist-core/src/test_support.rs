//! Hand-written provider fake shared by the unit tests

use async_trait::async_trait;
use medialist_models::MediaType;
use medialist_sources::{MetadataProvider, ProviderError, ProviderMedia};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Metadata provider that serves a fixed set of records and counts calls
#[derive(Default)]
pub struct CountingProvider {
    records: Vec<ProviderMedia>,
    delay: Option<Duration>,
    fail: bool,
    primary_calls: AtomicUsize,
    public_calls: AtomicUsize,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, tmdb_id: u32, media_type: MediaType, imdb_id: Option<&str>) -> Self {
        self.with_full_record(ProviderMedia {
            tmdb_id,
            media_type,
            tvdb_id: None,
            imdb_id: imdb_id.map(str::to_string),
            title: None,
            year: None,
        })
    }

    pub fn with_full_record(mut self, record: ProviderMedia) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn primary_calls(&self) -> usize {
        self.primary_calls.load(Ordering::SeqCst)
    }

    pub fn public_calls(&self) -> usize {
        self.public_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.primary_calls() + self.public_calls()
    }

    async fn answer(
        &self,
        found: Option<&ProviderMedia>,
    ) -> Result<Option<ProviderMedia>, ProviderError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ProviderError::Status {
                provider: "fake",
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(found.cloned())
    }
}

#[async_trait]
impl MetadataProvider for CountingProvider {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn fetch_by_primary_id(
        &self,
        tmdb_id: u32,
        media_type: MediaType,
    ) -> Result<Option<ProviderMedia>, ProviderError> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        let found = self
            .records
            .iter()
            .find(|r| r.tmdb_id == tmdb_id && r.media_type == media_type);
        self.answer(found).await
    }

    async fn fetch_by_public_id(
        &self,
        imdb_id: &str,
    ) -> Result<Option<ProviderMedia>, ProviderError> {
        self.public_calls.fetch_add(1, Ordering::SeqCst);
        let found = self
            .records
            .iter()
            .find(|r| r.imdb_id.as_deref() == Some(imdb_id));
        self.answer(found).await
    }
}
