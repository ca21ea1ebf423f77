//! Tenant-scoped RBAC roles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::permissions::Permission;

/// Role granted to a user within one tenant.
///
/// Roles form a strict hierarchy: `Owner > Admin > Staff`. A role implies
/// every permission of the roles below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Staff,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }

    /// Hierarchy rank; higher means more privileged.
    fn rank(&self) -> u8 {
        match self {
            Role::Owner => 3,
            Role::Admin => 2,
            Role::Staff => 1,
        }
    }

    /// Whether this role is at least as privileged as `other`.
    pub fn at_least(&self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    /// Whether this role is granted the given permission.
    ///
    /// Staff can read; admins can additionally write business records; only
    /// owners manage users and roles.
    pub fn allows(&self, permission: &Permission) -> bool {
        let name = permission.as_str();
        match self {
            Role::Owner => true,
            Role::Admin => !name.starts_with("users.") || name.ends_with(".read"),
            Role::Staff => {
                name.ends_with(".read") || name.starts_with("chat.") || name.starts_with("ai.")
            }
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_ordering() {
        assert!(Role::Owner.at_least(Role::Admin));
        assert!(Role::Admin.at_least(Role::Staff));
        assert!(Role::Staff.at_least(Role::Staff));
        assert!(!Role::Staff.at_least(Role::Admin));
        assert!(!Role::Admin.at_least(Role::Owner));
    }

    #[test]
    fn staff_can_read_but_not_write() {
        assert!(Role::Staff.allows(&Permission::new("invoices.read")));
        assert!(!Role::Staff.allows(&Permission::new("invoices.write")));
    }

    #[test]
    fn admin_cannot_manage_users() {
        assert!(Role::Admin.allows(&Permission::new("invoices.write")));
        assert!(!Role::Admin.allows(&Permission::new("users.assign_role")));
        assert!(Role::Owner.allows(&Permission::new("users.assign_role")));
    }

    #[test]
    fn roles_round_trip_through_serde() {
        let json = serde_json::to_string(&Role::Owner).unwrap();
        assert_eq!(json, "\"owner\"");
        let role: Role = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, Role::Staff);
    }
}
