use serde::Serialize;
use thiserror::Error;

use shopkeeper_core::{TenantId, UserId};

use crate::{Permission, PrincipalId, Role, TenantMembership};

/// A fully resolved principal for authorization decisions.
///
/// Construction of this object is intentionally decoupled from storage and
/// transport: the API layer derives memberships from verified token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub active_tenant_id: TenantId,
    pub membership: TenantMembership,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    #[error("only owners may change roles")]
    RoleChangeRequiresOwner,

    #[error("users may not change their own role")]
    SelfRoleChange,
}

/// Authorize a principal within its active tenant context.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    if principal.active_tenant_id != principal.membership.tenant_id {
        return Err(AuthzError::TenantMismatch);
    }

    if principal.membership.role.allows(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Authorize a role transition.
///
/// Role transitions are owner-only, and an owner may not change their own
/// role (prevents a tenant from locking itself out of ownership by accident
/// and blocks self-escalation in one check).
pub fn authorize_role_change(
    principal: &Principal,
    target_user: UserId,
) -> Result<(), AuthzError> {
    if principal.active_tenant_id != principal.membership.tenant_id {
        return Err(AuthzError::TenantMismatch);
    }
    if principal.membership.role != Role::Owner {
        return Err(AuthzError::RoleChangeRequiresOwner);
    }
    if *principal.principal_id.as_uuid() == *target_user.as_uuid() {
        return Err(AuthzError::SelfRoleChange);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal_with(role: Role) -> Principal {
        let tenant_id = TenantId::new();
        Principal {
            principal_id: PrincipalId::new(),
            active_tenant_id: tenant_id,
            membership: TenantMembership::new(tenant_id, role),
        }
    }

    #[test]
    fn staff_denied_write_permission() {
        let p = principal_with(Role::Staff);
        let err = authorize(&p, &Permission::new("inventory.write")).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("inventory.write".to_string()));
    }

    #[test]
    fn admin_allowed_write_permission() {
        let p = principal_with(Role::Admin);
        assert!(authorize(&p, &Permission::new("inventory.write")).is_ok());
    }

    #[test]
    fn tenant_mismatch_rejected_before_permission_check() {
        let mut p = principal_with(Role::Owner);
        p.active_tenant_id = TenantId::new();
        let err = authorize(&p, &Permission::new("inventory.read")).unwrap_err();
        assert_eq!(err, AuthzError::TenantMismatch);
    }

    #[test]
    fn role_change_requires_owner() {
        let p = principal_with(Role::Admin);
        let err = authorize_role_change(&p, UserId::new()).unwrap_err();
        assert_eq!(err, AuthzError::RoleChangeRequiresOwner);

        let p = principal_with(Role::Owner);
        assert!(authorize_role_change(&p, UserId::new()).is_ok());
    }

    #[test]
    fn owner_cannot_change_own_role() {
        let p = principal_with(Role::Owner);
        let self_id = UserId::from_uuid(*p.principal_id.as_uuid());
        let err = authorize_role_change(&p, self_id).unwrap_err();
        assert_eq!(err, AuthzError::SelfRoleChange);
    }
}
