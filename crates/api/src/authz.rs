//! API-side authorization guard.
//!
//! Enforces role gating at the route boundary, keeping domain records and the
//! store auth-agnostic.

use shopkeeper_auth::{
    authorize, authorize_role_change, AuthzError, Permission, Principal, TenantMembership,
};
use shopkeeper_core::UserId;

use crate::context::{PrincipalContext, TenantContext};

fn resolve(tenant: &TenantContext, principal: &PrincipalContext) -> Principal {
    Principal {
        principal_id: principal.principal_id(),
        active_tenant_id: tenant.tenant_id(),
        membership: TenantMembership::new(tenant.tenant_id(), principal.role()),
    }
}

/// Check one permission in the current request context.
///
/// Intended to be called before touching any collection.
pub fn require(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    permission: &'static str,
) -> Result<(), AuthzError> {
    authorize(&resolve(tenant, principal), &Permission::new(permission))
}

/// Check a role transition (owner-only, never on oneself).
pub fn require_role_change(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    target_user: UserId,
) -> Result<(), AuthzError> {
    authorize_role_change(&resolve(tenant, principal), target_user)
}
