pub mod error;
pub mod lists;
pub mod memory_store;
pub mod orchestrator;
pub mod permissions;
pub mod resolver;
pub mod snapshot;
pub mod source_url;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{DenyReason, MedialistError};
pub use lists::{
    add_item_to_list, count_lists, create_list, delete_list, get_list, query_lists, ListFilter,
    ListPage, ListWithItems, NewListRequest, PageInfo,
};
pub use memory_store::{InMemoryStore, StoreState};
pub use orchestrator::{add_item, ReconcileContext};
pub use permissions::{authorize_add_item, evaluate_add_item, AddItemFacts, Decision};
pub use resolver::IdentifierResolver;
pub use snapshot::StoreSnapshot;
pub use source_url::{classify, source_family, SourceUrlInfo};
pub use store::{
    ActorDirectory, ListQuery, ListSort, MediaRepository, MedialistRepository, StoreError,
};
