//! Add-item reconciliation
//!
//! Permission gate, then identifier resolution, then one item insert. The
//! sequence is best effort: a media record created by the resolver stays
//! even if the item insert fails afterwards.

use medialist_models::{Actor, ItemDescriptor, Medialist, NewMedialistItem};
use medialist_sources::MetadataProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::error::MedialistError;
use crate::permissions::authorize_add_item;
use crate::resolver::IdentifierResolver;
use crate::store::{ActorDirectory, MediaRepository, MedialistRepository};

/// Collaborators an add-item request runs against
#[derive(Clone)]
pub struct ReconcileContext {
    pub media: Arc<dyn MediaRepository>,
    pub lists: Arc<dyn MedialistRepository>,
    pub actors: Arc<dyn ActorDirectory>,
    /// `None` disables the provider tiers of the resolver
    pub provider: Option<Arc<dyn MetadataProvider>>,
    pub provider_timeout: Duration,
}

impl ReconcileContext {
    pub fn resolver(&self) -> IdentifierResolver {
        IdentifierResolver::new(self.media.clone(), self.provider.clone(), self.provider_timeout)
    }
}

/// Add one item to `list` on behalf of `caller` (or the actor it delegates to)
///
/// Returns the list unchanged; the new item is visible through
/// `MedialistRepository::items_for_list`.
pub async fn add_item(
    ctx: &ReconcileContext,
    list: &Medialist,
    descriptor: &ItemDescriptor,
    caller: &Actor,
) -> Result<Medialist, MedialistError> {
    let actor = authorize_add_item(list, descriptor.user_id, caller, ctx.actors.as_ref()).await?;

    let media = ctx.resolver().resolve(descriptor).await?;

    let mut item = NewMedialistItem {
        medialist_id: list.id,
        added_by: Some(actor.id),
        name: descriptor.display_name().map(str::to_string),
        year: descriptor.year,
        season_number: descriptor.season,
        episode_number: descriptor.episode,
        ..NewMedialistItem::default()
    };
    match &media {
        Some(media) => {
            item.media_id = Some(media.id);
            item.media_type = Some(media.media_type);
            item.tmdb_id = Some(media.tmdb_id);
            item.tvdb_id = media.tvdb_id;
            item.imdb_id = media.imdb_id.clone();
        }
        None => {
            item.media_type = descriptor.media_type;
            item.tmdb_id = descriptor.tmdb_id;
            item.tvdb_id = descriptor.tvdb_id;
            item.imdb_id = descriptor.imdb().map(str::to_string);
        }
    }

    let item = ctx.lists.insert_item(item).await?;
    info!(
        "Added item {} to medialist {} for actor {} (media: {:?})",
        item.id, list.id, actor.id, item.media_id
    );

    Ok(list.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DenyReason;
    use crate::memory_store::InMemoryStore;
    use crate::test_support::CountingProvider;
    use medialist_models::{MediaType, NewMedialist, Permission};

    struct Fixture {
        store: Arc<InMemoryStore>,
        provider: Arc<CountingProvider>,
        ctx: ReconcileContext,
    }

    fn fixture(provider: CountingProvider) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let provider = Arc::new(provider);
        let ctx = ReconcileContext {
            media: store.clone(),
            lists: store.clone(),
            actors: store.clone(),
            provider: Some(provider.clone()),
            provider_timeout: Duration::from_millis(200),
        };
        Fixture { store, provider, ctx }
    }

    async fn list_for(store: &InMemoryStore, owner: &Actor, auto_update: bool) -> Medialist {
        store
            .insert_list(NewMedialist {
                name: format!("{}'s list", owner.display_name),
                created_by: owner.id,
                auto_update,
                ..NewMedialist::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_matrix_by_tmdb_id() {
        let f = fixture(CountingProvider::new().with_record(603, MediaType::Movie, Some("tt0133093")));
        let owner = f.store.insert_actor("owner", &[]).await.unwrap();
        let list = list_for(&f.store, &owner, false).await;

        let descriptor = ItemDescriptor {
            tmdb_id: Some(603),
            media_type: Some(MediaType::Movie),
            ..ItemDescriptor::default()
        };
        let returned = add_item(&f.ctx, &list, &descriptor, &owner).await.unwrap();
        assert_eq!(returned, list);

        let state = f.store.snapshot_state().await;
        assert_eq!(state.media_count(), 1);
        let media = f.store.find_media_by_tmdb(603, Some(MediaType::Movie)).await.unwrap().unwrap();
        assert_eq!(media.imdb_id.as_deref(), Some("tt0133093"));

        let items = f.store.items_for_list(list.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].media_id, Some(media.id));
        assert_eq!(items[0].imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(items[0].media_type, Some(MediaType::Movie));
        assert_eq!(items[0].added_by, Some(owner.id));
        assert_eq!(f.provider.primary_calls(), 1);
    }

    #[tokio::test]
    async fn test_second_add_reuses_media() {
        let f = fixture(CountingProvider::new().with_record(603, MediaType::Movie, Some("tt0133093")));
        let owner = f.store.insert_actor("owner", &[]).await.unwrap();
        let list = list_for(&f.store, &owner, false).await;
        let descriptor = ItemDescriptor {
            tmdb_id: Some(603),
            media_type: Some(MediaType::Movie),
            ..ItemDescriptor::default()
        };

        add_item(&f.ctx, &list, &descriptor, &owner).await.unwrap();
        add_item(&f.ctx, &list, &descriptor, &owner).await.unwrap();

        assert_eq!(f.provider.primary_calls(), 1);
        assert_eq!(f.store.snapshot_state().await.media_count(), 1);
        let items = f.store.items_for_list(list.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].media_id, items[1].media_id);
    }

    #[tokio::test]
    async fn test_name_only_item() {
        let f = fixture(CountingProvider::new());
        let owner = f.store.insert_actor("owner", &[]).await.unwrap();
        let list = list_for(&f.store, &owner, false).await;

        let descriptor = ItemDescriptor {
            name: Some("Heat".to_string()),
            year: Some(1995),
            ..ItemDescriptor::default()
        };
        add_item(&f.ctx, &list, &descriptor, &owner).await.unwrap();

        assert_eq!(f.store.snapshot_state().await.media_count(), 0);
        let items = f.store.items_for_list(list.id).await.unwrap();
        assert_eq!(items[0].media_id, None);
        assert_eq!(items[0].name.as_deref(), Some("Heat"));
        assert_eq!(items[0].year, Some(1995));
        assert_eq!(items[0].tmdb_id, None);
        assert_eq!(f.provider.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_unresolved_ids_are_kept_on_item() {
        let f = fixture(CountingProvider::new());
        let owner = f.store.insert_actor("owner", &[]).await.unwrap();
        let list = list_for(&f.store, &owner, false).await;

        let descriptor = ItemDescriptor {
            name: Some("Some Show".to_string()),
            tvdb_id: Some(5),
            season: Some(2),
            episode: Some(3),
            ..ItemDescriptor::default()
        };
        add_item(&f.ctx, &list, &descriptor, &owner).await.unwrap();

        let items = f.store.items_for_list(list.id).await.unwrap();
        assert_eq!(items[0].tvdb_id, Some(5));
        assert_eq!(items[0].season_number, Some(2));
        assert_eq!(items[0].episode_number, Some(3));
    }

    #[tokio::test]
    async fn test_auto_update_list_rejects_admin() {
        let f = fixture(CountingProvider::new());
        let admin = f.store.insert_actor("admin", &[Permission::Admin]).await.unwrap();
        let list = list_for(&f.store, &admin, true).await;

        let descriptor = ItemDescriptor {
            name: Some("Heat".to_string()),
            ..ItemDescriptor::default()
        };
        let err = add_item(&f.ctx, &list, &descriptor, &admin).await.unwrap_err();
        assert!(matches!(err, MedialistError::PermissionDenied(DenyReason::AutoManaged)));
        assert!(f.store.items_for_list(list.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_owner_rejected() {
        let f = fixture(CountingProvider::new());
        let owner = f.store.insert_actor("owner", &[]).await.unwrap();
        let other = f.store.insert_actor("other", &[Permission::ViewMedialist]).await.unwrap();
        let list = list_for(&f.store, &owner, false).await;

        let descriptor = ItemDescriptor {
            name: Some("Heat".to_string()),
            ..ItemDescriptor::default()
        };
        let err = add_item(&f.ctx, &list, &descriptor, &other).await.unwrap_err();
        assert!(matches!(err, MedialistError::PermissionDenied(DenyReason::NotListOwner)));
    }

    #[tokio::test]
    async fn test_delegation_denied_before_resolution() {
        let f = fixture(CountingProvider::new().with_record(603, MediaType::Movie, None));
        let owner = f.store.insert_actor("owner", &[]).await.unwrap();
        let target = f.store.insert_actor("target", &[]).await.unwrap();
        let list = list_for(&f.store, &owner, false).await;

        let descriptor = ItemDescriptor {
            tmdb_id: Some(603),
            media_type: Some(MediaType::Movie),
            user_id: Some(target.id),
            ..ItemDescriptor::default()
        };
        let err = add_item(&f.ctx, &list, &descriptor, &owner).await.unwrap_err();
        assert!(matches!(err, MedialistError::PermissionDenied(DenyReason::CannotActAsOther)));
        assert_eq!(f.provider.total_calls(), 0);
        assert_eq!(f.store.snapshot_state().await.media_count(), 0);
    }

    #[tokio::test]
    async fn test_delegated_item_is_recorded_for_target() {
        let f = fixture(CountingProvider::new());
        let manager = f.store.insert_actor("manager", &[Permission::ManageMedialist]).await.unwrap();
        let target = f.store.insert_actor("target", &[]).await.unwrap();
        let list = list_for(&f.store, &target, false).await;

        let descriptor = ItemDescriptor {
            name: Some("Heat".to_string()),
            user_id: Some(target.id),
            ..ItemDescriptor::default()
        };
        add_item(&f.ctx, &list, &descriptor, &manager).await.unwrap();

        let items = f.store.items_for_list(list.id).await.unwrap();
        assert_eq!(items[0].added_by, Some(target.id));
    }

    #[tokio::test]
    async fn test_insufficient_detail() {
        let f = fixture(CountingProvider::new());
        let owner = f.store.insert_actor("owner", &[]).await.unwrap();
        let list = list_for(&f.store, &owner, false).await;

        let err = add_item(&f.ctx, &list, &ItemDescriptor::default(), &owner).await.unwrap_err();
        assert!(matches!(err, MedialistError::InsufficientDetail));
        assert!(f.store.items_for_list(list.id).await.unwrap().is_empty());
    }
}
