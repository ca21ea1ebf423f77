use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp, UserId};

/// A notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    /// Short machine tag, e.g. "invoice.paid" or "stock.low".
    pub kind: String,
    pub body: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Notification {
    pub fn new(
        tenant_id: TenantId,
        user_id: UserId,
        kind: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            user_id,
            kind: kind.into(),
            body: body.into(),
            read: false,
            created_at: None,
        }
    }

    pub fn mark_read(&self) -> Self {
        let mut n = self.clone();
        n.read = true;
        n
    }
}

impl Document for Notification {
    const COLLECTION: &'static str = "notifications";

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
        if self.kind.trim().is_empty() {
            return Err(DomainError::validation("notification kind must not be empty"));
        }
        if self.body.trim().is_empty() {
            return Err(DomainError::validation("notification body must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unread() {
        let n = Notification::new(TenantId::new(), UserId::new(), "stock.low", "Beans low");
        assert!(!n.read);
        assert!(n.mark_read().read);
    }

    #[test]
    fn empty_kind_rejected() {
        let n = Notification::new(TenantId::new(), UserId::new(), "", "body");
        assert!(n.validate().is_err());
    }
}
