use medialist_sources::ProviderError;
use std::fmt;
use thiserror::Error;

use crate::store::StoreError;

/// Why a permission check refused the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Items of an auto-updating list are managed by its source
    AutoManaged,
    CannotActAsOther,
    ActorNotFound,
    NotListOwner,
    CannotView,
    CannotViewOthers,
    CannotDelete,
    CannotCreate,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DenyReason::AutoManaged => "Medialist cannot be manually changed.",
            DenyReason::CannotActAsOther => "You do not have permission to modify the request user.",
            DenyReason::ActorNotFound => "The requested user does not exist.",
            DenyReason::NotListOwner => "You do not have permission to add on to this medialist.",
            DenyReason::CannotView => "You do not have permission to view this list.",
            DenyReason::CannotViewOthers => {
                "You do not have permission to view medialists created by other users."
            }
            DenyReason::CannotDelete => "You do not have permission to delete this medialist.",
            DenyReason::CannotCreate => "You do not have permission to create medialists.",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Error)]
pub enum MedialistError {
    #[error("{0}")]
    PermissionDenied(DenyReason),

    #[error("Cannot add to medialist without a name or found media.")]
    InsufficientDetail,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("metadata provider failed: {0}")]
    Upstream(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MedialistError {
    /// HTTP status a routing layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            MedialistError::PermissionDenied(_)
            | MedialistError::InsufficientDetail
            | MedialistError::Validation(_) => 403,
            MedialistError::NotFound(_) => 404,
            MedialistError::Upstream(_) | MedialistError::Store(_) => 500,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, MedialistError::PermissionDenied(_))
    }
}
