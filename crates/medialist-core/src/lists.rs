//! List management: create, query, fetch, delete
//!
//! The operations an HTTP layer would route to. Each takes the acting actor
//! and applies the list-level permission rules before touching the store.

use medialist_config::ListsConfig;
use medialist_models::{
    Actor, ActorId, ItemDescriptor, Medialist, MedialistId, MedialistItem, NewMedialist,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::MedialistError;
use crate::orchestrator::{add_item, ReconcileContext};
use crate::permissions::{can_view_all, check_create, check_delete, check_view, check_view_owner};
use crate::source_url::classify;
use crate::store::{ListQuery, ListSort, MedialistRepository, StoreError};

/// Body of a create-list request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewListRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_limit: Option<u32>,
    #[serde(default)]
    pub auto_update: Option<bool>,
}

/// Query parameters of a list search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilter {
    /// Substring of the list name
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub created_by: Option<ActorId>,
    #[serde(default)]
    pub sort_modified: bool,
    #[serde(default)]
    pub take: Option<usize>,
    #[serde(default)]
    pub skip: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub pages: usize,
    pub page_size: usize,
    pub results: usize,
    pub page: usize,
}

impl PageInfo {
    pub fn new(total: usize, page_size: usize, skip: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            pages: total.div_ceil(page_size),
            page_size,
            results: total,
            page: skip.div_ceil(page_size) + 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListPage {
    pub page_info: PageInfo,
    pub results: Vec<Medialist>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListWithItems {
    #[serde(flatten)]
    pub list: Medialist,
    pub items: Vec<MedialistItem>,
}

/// Keep a requested item limit only when it is within `2..=max`
pub fn accepted_source_limit(limit: Option<u32>, max: u32) -> Option<u32> {
    limit.filter(|l| (2..=max).contains(l))
}

pub async fn create_list(
    lists: &dyn MedialistRepository,
    caller: &Actor,
    request: NewListRequest,
    config: &ListsConfig,
) -> Result<Medialist, MedialistError> {
    check_create(caller)?;

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| MedialistError::Validation("Name is required for medialist".to_string()))?
        .to_string();

    let source_url = request.source_url.filter(|u| !u.trim().is_empty());
    let classified = match &source_url {
        Some(url) => Some(
            classify(url)
                .ok_or_else(|| MedialistError::Validation("Source url invalid".to_string()))?,
        ),
        None => None,
    };

    if lists.find_list_by_name(&name).await?.is_some() {
        return Err(duplicate_name());
    }

    let new_list = NewMedialist {
        name,
        created_by: caller.id,
        overview: request.overview,
        backdrop_url: request.backdrop_url,
        poster_url: request.poster_url,
        source: classified.as_ref().map(|info| info.source),
        source_type: classified.as_ref().map(|info| info.source_type),
        source_url,
        source_limit: accepted_source_limit(request.source_limit, config.max_source_items),
        auto_update: request.auto_update.unwrap_or(false),
        ..NewMedialist::default()
    };

    let list = match lists.insert_list(new_list).await {
        Ok(list) => list,
        Err(StoreError::Conflict(_)) => return Err(duplicate_name()),
        Err(e) => return Err(e.into()),
    };
    info!("Created medialist {} '{}' for actor {}", list.id, list.name, caller.id);
    Ok(list)
}

fn duplicate_name() -> MedialistError {
    MedialistError::Validation("Medialist already exists".to_string())
}

/// Search lists visible to the caller
///
/// Callers who may not view every list are scoped to their own; asking for
/// another actor's lists is refused.
pub async fn query_lists(
    lists: &dyn MedialistRepository,
    caller: &Actor,
    filter: ListFilter,
    config: &ListsConfig,
) -> Result<ListPage, MedialistError> {
    let created_by = if can_view_all(caller) {
        filter.created_by
    } else {
        if let Some(owner) = filter.created_by {
            check_view_owner(caller, owner)?;
        }
        Some(caller.id)
    };

    let take = filter.take.unwrap_or(config.default_page_size).max(1);
    let skip = filter.skip.unwrap_or(0);
    let query = ListQuery {
        name_contains: filter.filter,
        created_by,
        sort: if filter.sort_modified {
            ListSort::Modified
        } else {
            ListSort::Created
        },
        take,
        skip,
    };
    debug!("Querying medialists: {:?}", query);

    let (results, total) = lists.query_lists(&query).await?;
    Ok(ListPage {
        page_info: PageInfo::new(total, take, skip),
        results,
    })
}

pub async fn get_list(
    lists: &dyn MedialistRepository,
    caller: &Actor,
    id: MedialistId,
) -> Result<ListWithItems, MedialistError> {
    let list = find_list(lists, id).await?;
    check_view(caller, &list)?;
    let items = lists.items_for_list(id).await?;
    Ok(ListWithItems { list, items })
}

pub async fn delete_list(
    lists: &dyn MedialistRepository,
    caller: &Actor,
    id: MedialistId,
) -> Result<Medialist, MedialistError> {
    let list = find_list(lists, id).await?;
    check_delete(caller, &list)?;
    if !lists.delete_list(id).await? {
        return Err(MedialistError::NotFound(format!("Medialist {}", id)));
    }
    info!("Deleted medialist {} '{}'", list.id, list.name);
    Ok(list)
}

pub async fn count_lists(lists: &dyn MedialistRepository) -> Result<usize, MedialistError> {
    Ok(lists.count_lists().await?)
}

/// Look up a list by id and add an item to it
pub async fn add_item_to_list(
    ctx: &ReconcileContext,
    id: MedialistId,
    descriptor: &ItemDescriptor,
    caller: &Actor,
) -> Result<Medialist, MedialistError> {
    let list = find_list(ctx.lists.as_ref(), id).await?;
    add_item(ctx, &list, descriptor, caller).await
}

async fn find_list(
    lists: &dyn MedialistRepository,
    id: MedialistId,
) -> Result<Medialist, MedialistError> {
    lists
        .find_list(id)
        .await?
        .ok_or_else(|| MedialistError::NotFound(format!("Medialist {}", id)))
}
