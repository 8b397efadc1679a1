//! Permission gate
//!
//! Each decision is an ordered table of named rules evaluated over a plain
//! facts struct; the first rule that applies decides. Facts are gathered up
//! front so the tables can be tested without any store.

use medialist_models::{Actor, ActorId, Medialist, Permission};
use tracing::debug;

use crate::error::{DenyReason, MedialistError};
use crate::store::ActorDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Deny(DenyReason),
    /// Proceed as the caller
    Allow,
    /// Proceed on behalf of another actor
    ActAs(ActorId),
}

pub struct Rule<F> {
    pub name: &'static str,
    pub applies: fn(&F) -> bool,
    pub outcome: fn(&F) -> Decision,
}

/// First applicable rule wins; `fallback` when none applies
pub fn evaluate<F>(rules: &[Rule<F>], facts: &F, fallback: Decision) -> Decision {
    for rule in rules {
        if (rule.applies)(facts) {
            let decision = (rule.outcome)(facts);
            debug!("Permission rule '{}' decided {:?}", rule.name, decision);
            return decision;
        }
    }
    fallback
}

/// Everything the add-item rules look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemFacts {
    pub auto_update: bool,
    pub caller_id: ActorId,
    pub owner_id: ActorId,
    /// Actor the caller asked to act as, if any
    pub requested_actor: Option<ActorId>,
    pub can_manage_lists: bool,
    pub can_manage_users: bool,
}

impl AddItemFacts {
    pub fn gather(list: &Medialist, requested_actor: Option<ActorId>, caller: &Actor) -> Self {
        Self {
            auto_update: list.auto_update,
            caller_id: caller.id,
            owner_id: list.created_by,
            requested_actor,
            can_manage_lists: caller.has_permission(Permission::ManageMedialist),
            can_manage_users: caller.has_permission(Permission::ManageUsers),
        }
    }

    /// Delegation only counts when it names someone other than the caller
    fn delegate(&self) -> Option<ActorId> {
        self.requested_actor.filter(|id| *id != self.caller_id)
    }
}

pub static ADD_ITEM_RULES: [Rule<AddItemFacts>; 4] = [
    Rule {
        name: "auto-managed list",
        applies: |f| f.auto_update,
        outcome: |_| Decision::Deny(DenyReason::AutoManaged),
    },
    Rule {
        name: "delegation without privilege",
        applies: |f| f.delegate().is_some() && !f.can_manage_users && !f.can_manage_lists,
        outcome: |_| Decision::Deny(DenyReason::CannotActAsOther),
    },
    Rule {
        name: "delegation",
        applies: |f| f.delegate().is_some(),
        outcome: |f| f.delegate().map_or(Decision::Allow, Decision::ActAs),
    },
    Rule {
        name: "not list owner",
        applies: |f| f.caller_id != f.owner_id && !f.can_manage_lists,
        outcome: |_| Decision::Deny(DenyReason::NotListOwner),
    },
];

pub fn evaluate_add_item(facts: &AddItemFacts) -> Decision {
    evaluate(&ADD_ITEM_RULES, facts, Decision::Allow)
}

/// Decide who an add-item request is recorded against
///
/// The only side effect is the actor lookup when the request delegates.
pub async fn authorize_add_item(
    list: &Medialist,
    requested_actor: Option<ActorId>,
    caller: &Actor,
    directory: &dyn ActorDirectory,
) -> Result<Actor, MedialistError> {
    let facts = AddItemFacts::gather(list, requested_actor, caller);
    match evaluate_add_item(&facts) {
        Decision::Deny(reason) => {
            debug!("Actor {} may not add to medialist {}: {}", caller.id, list.id, reason);
            Err(MedialistError::PermissionDenied(reason))
        }
        Decision::Allow => Ok(caller.clone()),
        Decision::ActAs(id) => directory
            .find_actor(id)
            .await?
            .ok_or(MedialistError::PermissionDenied(DenyReason::ActorNotFound)),
    }
}

/// Facts for list-level read, delete and create checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAccessFacts {
    pub caller_id: ActorId,
    /// Owner of the list, or of the lists being asked for
    pub owner_id: ActorId,
    pub can_manage_lists: bool,
    pub can_view_lists: bool,
    pub can_create_lists: bool,
}

impl ListAccessFacts {
    pub fn gather(caller: &Actor, owner_id: ActorId) -> Self {
        Self {
            caller_id: caller.id,
            owner_id,
            can_manage_lists: caller.has_permission(Permission::ManageMedialist),
            can_view_lists: caller.has_permission(Permission::ViewMedialist),
            can_create_lists: caller.has_permission(Permission::CreateMedialist),
        }
    }

    fn is_owner(&self) -> bool {
        self.caller_id == self.owner_id
    }
}

pub static VIEW_RULES: [Rule<ListAccessFacts>; 2] = [
    Rule {
        name: "owner",
        applies: |f| f.is_owner(),
        outcome: |_| Decision::Allow,
    },
    Rule {
        name: "list viewer",
        applies: |f| f.can_manage_lists || f.can_view_lists,
        outcome: |_| Decision::Allow,
    },
];

pub static DELETE_RULES: [Rule<ListAccessFacts>; 2] = [
    Rule {
        name: "owner",
        applies: |f| f.is_owner(),
        outcome: |_| Decision::Allow,
    },
    Rule {
        name: "list manager",
        applies: |f| f.can_manage_lists,
        outcome: |_| Decision::Allow,
    },
];

pub static CREATE_RULES: [Rule<ListAccessFacts>; 1] = [Rule {
    name: "list creator",
    applies: |f| f.can_manage_lists || f.can_create_lists,
    outcome: |_| Decision::Allow,
}];

fn into_result(decision: Decision) -> Result<(), MedialistError> {
    match decision {
        Decision::Deny(reason) => Err(MedialistError::PermissionDenied(reason)),
        Decision::Allow | Decision::ActAs(_) => Ok(()),
    }
}

pub fn check_view(caller: &Actor, list: &Medialist) -> Result<(), MedialistError> {
    let facts = ListAccessFacts::gather(caller, list.created_by);
    into_result(evaluate(&VIEW_RULES, &facts, Decision::Deny(DenyReason::CannotView)))
}

/// Asking for lists owned by `owner_id`
pub fn check_view_owner(caller: &Actor, owner_id: ActorId) -> Result<(), MedialistError> {
    let facts = ListAccessFacts::gather(caller, owner_id);
    into_result(evaluate(&VIEW_RULES, &facts, Decision::Deny(DenyReason::CannotViewOthers)))
}

pub fn check_delete(caller: &Actor, list: &Medialist) -> Result<(), MedialistError> {
    let facts = ListAccessFacts::gather(caller, list.created_by);
    into_result(evaluate(&DELETE_RULES, &facts, Decision::Deny(DenyReason::CannotDelete)))
}

pub fn check_create(caller: &Actor) -> Result<(), MedialistError> {
    let facts = ListAccessFacts::gather(caller, caller.id);
    into_result(evaluate(&CREATE_RULES, &facts, Decision::Deny(DenyReason::CannotCreate)))
}

/// True when the caller may see every actor's lists
pub fn can_view_all(caller: &Actor) -> bool {
    caller.has_any_permission(&[Permission::ManageMedialist, Permission::ViewMedialist])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::InMemoryStore;
    use chrono::Utc;

    fn facts() -> AddItemFacts {
        AddItemFacts {
            auto_update: false,
            caller_id: 1,
            owner_id: 1,
            requested_actor: None,
            can_manage_lists: false,
            can_manage_users: false,
        }
    }

    fn list(owner: ActorId, auto_update: bool) -> Medialist {
        let now = Utc::now();
        Medialist {
            id: 10,
            name: "Test".to_string(),
            created_by: owner,
            overview: None,
            backdrop_url: None,
            poster_url: None,
            source: None,
            source_type: None,
            source_url: None,
            source_limit: None,
            auto_update,
            source_genres: None,
            source_ratings: None,
            source_years: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_is_allowed() {
        assert_eq!(evaluate_add_item(&facts()), Decision::Allow);
    }

    #[test]
    fn test_auto_update_denies_everyone() {
        let f = AddItemFacts {
            auto_update: true,
            can_manage_lists: true,
            can_manage_users: true,
            ..facts()
        };
        assert_eq!(evaluate_add_item(&f), Decision::Deny(DenyReason::AutoManaged));
    }

    #[test]
    fn test_delegation_requires_privilege() {
        let f = AddItemFacts {
            requested_actor: Some(2),
            ..facts()
        };
        assert_eq!(evaluate_add_item(&f), Decision::Deny(DenyReason::CannotActAsOther));

        let f = AddItemFacts {
            requested_actor: Some(2),
            can_manage_users: true,
            ..facts()
        };
        assert_eq!(evaluate_add_item(&f), Decision::ActAs(2));

        let f = AddItemFacts {
            requested_actor: Some(2),
            can_manage_lists: true,
            ..facts()
        };
        assert_eq!(evaluate_add_item(&f), Decision::ActAs(2));
    }

    #[test]
    fn test_requesting_self_is_not_delegation() {
        let f = AddItemFacts {
            requested_actor: Some(1),
            ..facts()
        };
        assert_eq!(evaluate_add_item(&f), Decision::Allow);
    }

    #[test]
    fn test_non_owner_needs_manage_lists() {
        let f = AddItemFacts {
            owner_id: 5,
            ..facts()
        };
        assert_eq!(evaluate_add_item(&f), Decision::Deny(DenyReason::NotListOwner));

        let f = AddItemFacts {
            owner_id: 5,
            can_manage_lists: true,
            ..facts()
        };
        assert_eq!(evaluate_add_item(&f), Decision::Allow);
    }

    #[tokio::test]
    async fn test_authorize_delegates_to_existing_actor() {
        let store = InMemoryStore::new();
        let manager = store.insert_actor("manager", &[Permission::ManageUsers]).await.unwrap();
        let target = store.insert_actor("target", &[]).await.unwrap();

        let effective = authorize_add_item(&list(manager.id, false), Some(target.id), &manager, &store)
            .await
            .unwrap();
        assert_eq!(effective.id, target.id);
    }

    #[tokio::test]
    async fn test_authorize_missing_delegate() {
        let store = InMemoryStore::new();
        let admin = store.insert_actor("admin", &[Permission::Admin]).await.unwrap();

        let err = authorize_add_item(&list(admin.id, false), Some(999), &admin, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, MedialistError::PermissionDenied(DenyReason::ActorNotFound)));
    }

    #[tokio::test]
    async fn test_authorize_returns_caller() {
        let store = InMemoryStore::new();
        let owner = store.insert_actor("owner", &[]).await.unwrap();
        let effective = authorize_add_item(&list(owner.id, false), None, &owner, &store)
            .await
            .unwrap();
        assert_eq!(effective, owner);
    }

    #[test]
    fn test_list_access_checks() {
        let owner = Actor::new(1, "owner");
        let viewer = Actor::new(2, "viewer").with_permissions(&[Permission::ViewMedialist]);
        let stranger = Actor::new(3, "stranger");
        let manager = Actor::new(4, "manager").with_permissions(&[Permission::ManageMedialist]);
        let l = list(owner.id, false);

        assert!(check_view(&owner, &l).is_ok());
        assert!(check_view(&viewer, &l).is_ok());
        assert!(check_view(&stranger, &l).is_err());

        assert!(check_delete(&owner, &l).is_ok());
        assert!(check_delete(&manager, &l).is_ok());
        let err = check_delete(&viewer, &l).unwrap_err();
        assert!(matches!(err, MedialistError::PermissionDenied(DenyReason::CannotDelete)));

        assert!(check_view_owner(&stranger, stranger.id).is_ok());
        let err = check_view_owner(&stranger, owner.id).unwrap_err();
        assert!(matches!(err, MedialistError::PermissionDenied(DenyReason::CannotViewOthers)));
    }

    #[test]
    fn test_check_create() {
        let creator = Actor::new(1, "creator").with_permissions(&[Permission::CreateMedialist]);
        let admin = Actor::new(2, "admin").with_permissions(&[Permission::Admin]);
        assert!(check_create(&creator).is_ok());
        assert!(check_create(&admin).is_ok());
        let err = check_create(&Actor::new(3, "nobody")).unwrap_err();
        assert!(matches!(err, MedialistError::PermissionDenied(DenyReason::CannotCreate)));
    }
}
