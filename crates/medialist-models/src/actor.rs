use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub type ActorId = u64;

/// Capabilities an actor can hold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Implies every other permission
    Admin,
    /// Manage all actors (act on behalf of other users)
    ManageUsers,
    /// Manage all lists
    ManageMedialist,
    /// View all lists
    ViewMedialist,
    /// Create lists
    CreateMedialist,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Admin => "admin",
            Permission::ManageUsers => "manage_users",
            Permission::ManageMedialist => "manage_medialist",
            Permission::ViewMedialist => "view_medialist",
            Permission::CreateMedialist => "create_medialist",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "admin" => Ok(Permission::Admin),
            "manage_users" => Ok(Permission::ManageUsers),
            "manage_medialist" => Ok(Permission::ManageMedialist),
            "view_medialist" => Ok(Permission::ViewMedialist),
            "create_medialist" => Ok(Permission::CreateMedialist),
            other => Err(format!("Unknown permission: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub display_name: String,
    pub permissions: BTreeSet<Permission>,
}

impl Actor {
    pub fn new(id: ActorId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: &[Permission]) -> Self {
        self.permissions.extend(permissions.iter().copied());
        self
    }

    /// Check a single permission (Admin implies everything)
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&Permission::Admin) || self.permissions.contains(&permission)
    }

    /// True if the actor holds at least one of the given permissions
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_implies_all() {
        let admin = Actor::new(1, "admin").with_permissions(&[Permission::Admin]);
        assert!(admin.has_permission(Permission::ManageMedialist));
        assert!(admin.has_permission(Permission::ManageUsers));
    }

    #[test]
    fn test_has_any_permission() {
        let creator = Actor::new(2, "creator").with_permissions(&[Permission::CreateMedialist]);
        assert!(creator.has_any_permission(&[Permission::ManageMedialist, Permission::CreateMedialist]));
        assert!(!creator.has_any_permission(&[Permission::ManageMedialist, Permission::ViewMedialist]));
        assert!(!Actor::new(3, "nobody").has_any_permission(&[Permission::CreateMedialist]));
    }

    #[test]
    fn test_permission_from_str() {
        assert_eq!("manage-medialist".parse::<Permission>().unwrap(), Permission::ManageMedialist);
        assert!("superuser".parse::<Permission>().is_err());
    }
}
