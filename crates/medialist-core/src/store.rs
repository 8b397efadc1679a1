//! Persistence collaborators
//!
//! The core only issues exact-match lookups, inserts and cascade deletes
//! through these traits. Implementations must enforce unique list names and
//! unique media per (TMDB id, media type); concurrent resolutions of the same
//! new title rely on that constraint rather than on in-process locking.

use async_trait::async_trait;
use medialist_models::{
    Actor, ActorId, Media, MediaType, Medialist, MedialistId, MedialistItem, NewMedia, NewMedialist,
    NewMedialistItem, Permission,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("{0} does not exist")]
    Missing(String),

    #[error("invalid record: {0}")]
    Invalid(String),

    #[error("store snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store snapshot encoding failed: {0}")]
    Encode(String),
}

/// Sort column for list queries (always newest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListSort {
    #[default]
    Created,
    Modified,
}

/// Storage-level list query; permission scoping happens in `lists`
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Case-insensitive substring of the list name
    pub name_contains: Option<String>,
    pub created_by: Option<ActorId>,
    pub sort: ListSort,
    pub take: usize,
    pub skip: usize,
}

#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Exact lookup by TMDB id; `None` media type matches either kind
    async fn find_media_by_tmdb(
        &self,
        tmdb_id: u32,
        media_type: Option<MediaType>,
    ) -> Result<Option<Media>, StoreError>;

    async fn find_media_by_tvdb(&self, tvdb_id: u32) -> Result<Option<Media>, StoreError>;

    async fn find_media_by_imdb(&self, imdb_id: &str) -> Result<Option<Media>, StoreError>;

    /// Fails with `Conflict` when (tmdb_id, media_type) already exists
    async fn insert_media(&self, media: NewMedia) -> Result<Media, StoreError>;
}

#[async_trait]
pub trait MedialistRepository: Send + Sync {
    /// Fails with `Conflict` when the name is taken
    async fn insert_list(&self, list: NewMedialist) -> Result<Medialist, StoreError>;

    async fn find_list(&self, id: MedialistId) -> Result<Option<Medialist>, StoreError>;

    async fn find_list_by_name(&self, name: &str) -> Result<Option<Medialist>, StoreError>;

    /// Matching page plus the total number of matches
    async fn query_lists(&self, query: &ListQuery) -> Result<(Vec<Medialist>, usize), StoreError>;

    async fn count_lists(&self) -> Result<usize, StoreError>;

    /// Removes the list and its items; false if it did not exist
    async fn delete_list(&self, id: MedialistId) -> Result<bool, StoreError>;

    /// Fails with `Missing` when the parent list is gone
    async fn insert_item(&self, item: NewMedialistItem) -> Result<MedialistItem, StoreError>;

    async fn items_for_list(&self, id: MedialistId) -> Result<Vec<MedialistItem>, StoreError>;
}

#[async_trait]
pub trait ActorDirectory: Send + Sync {
    async fn find_actor(&self, id: ActorId) -> Result<Option<Actor>, StoreError>;

    async fn insert_actor(
        &self,
        display_name: &str,
        permissions: &[Permission],
    ) -> Result<Actor, StoreError>;

    async fn list_actors(&self) -> Result<Vec<Actor>, StoreError>;
}
