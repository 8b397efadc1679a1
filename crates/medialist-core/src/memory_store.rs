use async_trait::async_trait;
use chrono::Utc;
use medialist_models::{
    Actor, ActorId, Media, MediaId, MediaType, Medialist, MedialistId, MedialistItem, NewMedia,
    NewMedialist, NewMedialistItem, Permission,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{
    ActorDirectory, ListQuery, ListSort, MediaRepository, MedialistRepository, StoreError,
};

/// Everything the store holds; this is what the snapshot file contains
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreState {
    next_id: u64,
    actors: BTreeMap<ActorId, Actor>,
    media: BTreeMap<MediaId, Media>,
    lists: BTreeMap<MedialistId, Medialist>,
    items: BTreeMap<u64, MedialistItem>,
}

impl StoreState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Process-local store behind a single lock
///
/// Every write takes the write lock, so the uniqueness checks on list names
/// and (tmdb_id, media_type) cannot interleave with another insert.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the current state for persisting
    pub async fn snapshot_state(&self) -> StoreState {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl MediaRepository for InMemoryStore {
    async fn find_media_by_tmdb(
        &self,
        tmdb_id: u32,
        media_type: Option<MediaType>,
    ) -> Result<Option<Media>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .media
            .values()
            .find(|m| m.tmdb_id == tmdb_id && media_type.map_or(true, |t| m.media_type == t))
            .cloned())
    }

    async fn find_media_by_tvdb(&self, tvdb_id: u32) -> Result<Option<Media>, StoreError> {
        let state = self.state.read().await;
        Ok(state.media.values().find(|m| m.tvdb_id == Some(tvdb_id)).cloned())
    }

    async fn find_media_by_imdb(&self, imdb_id: &str) -> Result<Option<Media>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .media
            .values()
            .find(|m| m.imdb_id.as_deref() == Some(imdb_id))
            .cloned())
    }

    async fn insert_media(&self, media: NewMedia) -> Result<Media, StoreError> {
        let mut state = self.state.write().await;
        let duplicate = state
            .media
            .values()
            .any(|m| m.tmdb_id == media.tmdb_id && m.media_type == media.media_type);
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "media ({}, {})",
                media.tmdb_id, media.media_type
            )));
        }

        let now = Utc::now();
        let id = state.allocate_id();
        let media = Media {
            id,
            tmdb_id: media.tmdb_id,
            media_type: media.media_type,
            tvdb_id: media.tvdb_id,
            imdb_id: media.imdb_id,
            status: media.status,
            status_4k: media.status_4k,
            created_at: now,
            updated_at: now,
        };
        state.media.insert(id, media.clone());
        debug!("Store: inserted media {} (tmdb {})", id, media.tmdb_id);
        Ok(media)
    }
}

#[async_trait]
impl MedialistRepository for InMemoryStore {
    async fn insert_list(&self, list: NewMedialist) -> Result<Medialist, StoreError> {
        let mut state = self.state.write().await;
        if state.lists.values().any(|l| l.name == list.name) {
            return Err(StoreError::Conflict(format!("medialist name '{}'", list.name)));
        }

        let now = Utc::now();
        let id = state.allocate_id();
        let list = Medialist {
            id,
            name: list.name,
            created_by: list.created_by,
            overview: list.overview,
            backdrop_url: list.backdrop_url,
            poster_url: list.poster_url,
            source: list.source,
            source_type: list.source_type,
            source_url: list.source_url,
            source_limit: list.source_limit,
            auto_update: list.auto_update,
            source_genres: list.source_genres,
            source_ratings: list.source_ratings,
            source_years: list.source_years,
            created_at: now,
            updated_at: now,
        };
        state.lists.insert(id, list.clone());
        Ok(list)
    }

    async fn find_list(&self, id: MedialistId) -> Result<Option<Medialist>, StoreError> {
        Ok(self.state.read().await.lists.get(&id).cloned())
    }

    async fn find_list_by_name(&self, name: &str) -> Result<Option<Medialist>, StoreError> {
        let state = self.state.read().await;
        Ok(state.lists.values().find(|l| l.name == name).cloned())
    }

    async fn query_lists(&self, query: &ListQuery) -> Result<(Vec<Medialist>, usize), StoreError> {
        let state = self.state.read().await;
        let needle = query
            .name_contains
            .as_deref()
            .map(|n| n.to_lowercase())
            .filter(|n| !n.is_empty());

        let mut matches: Vec<&Medialist> = state
            .lists
            .values()
            .filter(|l| needle.as_deref().map_or(true, |n| l.name.to_lowercase().contains(n)))
            .filter(|l| query.created_by.map_or(true, |owner| l.created_by == owner))
            .collect();

        // Newest first; id breaks ties between lists created in the same instant
        match query.sort {
            ListSort::Created => {
                matches.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)))
            }
            ListSort::Modified => {
                matches.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)))
            }
        }

        let total = matches.len();
        let page = matches
            .into_iter()
            .skip(query.skip)
            .take(query.take)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn count_lists(&self) -> Result<usize, StoreError> {
        Ok(self.state.read().await.lists.len())
    }

    async fn delete_list(&self, id: MedialistId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        if state.lists.remove(&id).is_none() {
            return Ok(false);
        }
        let before = state.items.len();
        state.items.retain(|_, item| item.medialist_id != id);
        debug!("Store: deleted medialist {} and {} item(s)", id, before - state.items.len());
        Ok(true)
    }

    async fn insert_item(&self, item: NewMedialistItem) -> Result<MedialistItem, StoreError> {
        if !item.is_identifiable() {
            return Err(StoreError::Invalid(
                "medialist item needs a media reference or a name".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        if !state.lists.contains_key(&item.medialist_id) {
            return Err(StoreError::Missing(format!("medialist {}", item.medialist_id)));
        }

        let now = Utc::now();
        let id = state.allocate_id();
        let item = MedialistItem {
            id,
            medialist_id: item.medialist_id,
            added_by: item.added_by,
            media_id: item.media_id,
            name: item.name,
            year: item.year,
            media_type: item.media_type,
            tmdb_id: item.tmdb_id,
            tvdb_id: item.tvdb_id,
            imdb_id: item.imdb_id,
            season_number: item.season_number,
            episode_number: item.episode_number,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(id, item.clone());
        Ok(item)
    }

    async fn items_for_list(&self, id: MedialistId) -> Result<Vec<MedialistItem>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.medialist_id == id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ActorDirectory for InMemoryStore {
    async fn find_actor(&self, id: ActorId) -> Result<Option<Actor>, StoreError> {
        Ok(self.state.read().await.actors.get(&id).cloned())
    }

    async fn insert_actor(
        &self,
        display_name: &str,
        permissions: &[Permission],
    ) -> Result<Actor, StoreError> {
        let mut state = self.state.write().await;
        let id = state.allocate_id();
        let actor = Actor::new(id, display_name).with_permissions(permissions);
        state.actors.insert(id, actor.clone());
        Ok(actor)
    }

    async fn list_actors(&self) -> Result<Vec<Actor>, StoreError> {
        Ok(self.state.read().await.actors.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_list(name: &str, owner: ActorId) -> NewMedialist {
        NewMedialist {
            name: name.to_string(),
            created_by: owner,
            ..NewMedialist::default()
        }
    }

    #[tokio::test]
    async fn test_media_uniqueness_per_tmdb_and_type() {
        let store = InMemoryStore::new();
        store.insert_media(NewMedia::unknown(603, MediaType::Movie)).await.unwrap();

        let err = store.insert_media(NewMedia::unknown(603, MediaType::Movie)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Same TMDB id for a show is a different title
        store.insert_media(NewMedia::unknown(603, MediaType::Tv)).await.unwrap();
        assert_eq!(store.snapshot_state().await.media_count(), 2);
    }

    #[tokio::test]
    async fn test_find_media_by_tmdb_any_type() {
        let store = InMemoryStore::new();
        store.insert_media(NewMedia::unknown(1399, MediaType::Tv)).await.unwrap();

        assert!(store.find_media_by_tmdb(1399, None).await.unwrap().is_some());
        assert!(store.find_media_by_tmdb(1399, Some(MediaType::Tv)).await.unwrap().is_some());
        assert!(store.find_media_by_tmdb(1399, Some(MediaType::Movie)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_media_by_cross_reference_ids() {
        let store = InMemoryStore::new();
        let mut media = NewMedia::unknown(1399, MediaType::Tv);
        media.tvdb_id = Some(121361);
        media.imdb_id = Some("tt0944947".to_string());
        let inserted = store.insert_media(media).await.unwrap();

        assert_eq!(store.find_media_by_tvdb(121361).await.unwrap().unwrap().id, inserted.id);
        assert_eq!(store.find_media_by_imdb("tt0944947").await.unwrap().unwrap().id, inserted.id);
        assert!(store.find_media_by_imdb("tt0000001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_name_is_unique() {
        let store = InMemoryStore::new();
        store.insert_list(new_list("Favorites", 1)).await.unwrap();
        let err = store.insert_list(new_list("Favorites", 2)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_list_cascades_items() {
        let store = InMemoryStore::new();
        let keep = store.insert_list(new_list("Keep", 1)).await.unwrap();
        let drop = store.insert_list(new_list("Drop", 1)).await.unwrap();
        for list_id in [keep.id, drop.id, drop.id] {
            store
                .insert_item(NewMedialistItem {
                    medialist_id: list_id,
                    name: Some("Heat".to_string()),
                    ..NewMedialistItem::default()
                })
                .await
                .unwrap();
        }

        assert!(store.delete_list(drop.id).await.unwrap());
        assert!(!store.delete_list(drop.id).await.unwrap());
        assert!(store.items_for_list(drop.id).await.unwrap().is_empty());
        assert_eq!(store.items_for_list(keep.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_item_requires_list() {
        let store = InMemoryStore::new();
        let err = store
            .insert_item(NewMedialistItem {
                medialist_id: 42,
                name: Some("Heat".to_string()),
                ..NewMedialistItem::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));
    }

    #[tokio::test]
    async fn test_insert_item_requires_media_or_name() {
        let store = InMemoryStore::new();
        let list = store.insert_list(new_list("Weekend", 1)).await.unwrap();

        for name in [None, Some("  ".to_string())] {
            let err = store
                .insert_item(NewMedialistItem {
                    medialist_id: list.id,
                    name,
                    tmdb_id: Some(603),
                    ..NewMedialistItem::default()
                })
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::Invalid(_)));
        }
        assert!(store.items_for_list(list.id).await.unwrap().is_empty());

        let media = store.insert_media(NewMedia::unknown(603, MediaType::Movie)).await.unwrap();
        store
            .insert_item(NewMedialistItem {
                medialist_id: list.id,
                media_id: Some(media.id),
                ..NewMedialistItem::default()
            })
            .await
            .unwrap();
        assert_eq!(store.items_for_list(list.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_query_lists_filters_and_pages() {
        let store = InMemoryStore::new();
        for (name, owner) in [("Sci-Fi Classics", 1), ("Horror", 1), ("Sci-fi Modern", 2), ("Comedy", 2)] {
            store.insert_list(new_list(name, owner)).await.unwrap();
        }

        let query = ListQuery {
            name_contains: Some("sci-fi".to_string()),
            take: 10,
            ..ListQuery::default()
        };
        let (lists, total) = store.query_lists(&query).await.unwrap();
        assert_eq!(total, 2);
        // Newest first
        assert_eq!(lists[0].name, "Sci-fi Modern");

        let query = ListQuery {
            created_by: Some(2),
            take: 1,
            skip: 1,
            ..ListQuery::default()
        };
        let (lists, total) = store.query_lists(&query).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Sci-fi Modern");
    }

    #[tokio::test]
    async fn test_actor_directory() {
        let store = InMemoryStore::new();
        let actor = store.insert_actor("alice", &[Permission::CreateMedialist]).await.unwrap();
        let found = store.find_actor(actor.id).await.unwrap().unwrap();
        assert!(found.has_permission(Permission::CreateMedialist));
        assert!(store.find_actor(actor.id + 100).await.unwrap().is_none());
        assert_eq!(store.list_actors().await.unwrap().len(), 1);
    }
}
