//! User and organization documents.
//!
//! A user's membership in a tenant is one document in that tenant's `users`
//! collection; the per-tenant role map is the set of those documents. Role
//! transitions are owner-only and enforced at the authorization boundary
//! ([`crate::authorize_role_change`]).

use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp, UserId};

use crate::Role;

/// User account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// User is active and can authenticate/transact.
    #[default]
    Active,
    /// User is suspended and cannot authenticate.
    Suspended,
}

/// A user's membership record within one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl User {
    pub fn new(
        tenant_id: TenantId,
        user_id: UserId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            user_id,
            email: email.into(),
            display_name: display_name.into(),
            role,
            status: UserStatus::Active,
            created_at: None,
        }
    }

    /// The record with a new role applied.
    ///
    /// Invariant: suspended users cannot be assigned new roles. Whether the
    /// *actor* may change roles is decided by `authorize_role_change`, not
    /// here.
    pub fn with_role(&self, role: Role) -> DomainResult<Self> {
        if self.status == UserStatus::Suspended {
            return Err(DomainError::invariant(
                "cannot assign a role to a suspended user",
            ));
        }
        let mut user = self.clone();
        user.role = role;
        Ok(user)
    }

    pub fn suspend(&self) -> Self {
        let mut user = self.clone();
        user.status = UserStatus::Suspended;
        user
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn doc_id(&self) -> DocId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    fn stamp_created_at(&mut self, at: Timestamp) {
        self.created_at = Some(at);
    }

    fn validate(&self) -> DomainResult<()> {
        if self.display_name.trim().is_empty() {
            return Err(DomainError::validation("display name must not be empty"));
        }
        if !self.email.contains('@') || self.email.trim().len() < 3 {
            return Err(DomainError::validation("email is malformed"));
        }
        Ok(())
    }
}

/// The tenant itself, as a document in its own `organizations` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Organization {
    pub fn new(tenant_id: TenantId, name: impl Into<String>) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            name: name.into(),
            created_at: None,
        }
    }
}

impl Document for Organization {
    const COLLECTION: &'static str = "organizations";

    fn doc_id(&self) -> DocId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    fn stamp_created_at(&mut self, at: Timestamp) {
        self.created_at = Some(at);
    }

    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation(
                "organization name must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User::new(
            TenantId::new(),
            UserId::new(),
            "pat@example.com",
            "Pat",
            role,
        )
    }

    #[test]
    fn valid_user_passes_validation() {
        assert!(user(Role::Staff).validate().is_ok());
    }

    #[test]
    fn malformed_email_rejected() {
        let mut u = user(Role::Staff);
        u.email = "nope".to_string();
        assert_eq!(
            u.validate(),
            Err(DomainError::validation("email is malformed"))
        );
    }

    #[test]
    fn role_change_produces_new_record() {
        let u = user(Role::Staff);
        let promoted = u.with_role(Role::Admin).unwrap();
        assert_eq!(promoted.role, Role::Admin);
        assert_eq!(u.role, Role::Staff);
    }

    #[test]
    fn suspended_user_cannot_receive_role() {
        let u = user(Role::Staff).suspend();
        let err = u.with_role(Role::Admin).unwrap_err();
        assert_eq!(
            err,
            DomainError::invariant("cannot assign a role to a suspended user")
        );
    }
}
