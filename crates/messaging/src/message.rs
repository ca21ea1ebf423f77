use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp, UserId};

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub conversation_id: DocId,
    pub sender_id: UserId,
    pub body: String,
    /// Read receipts: users who have seen this message.
    #[serde(default)]
    pub read_by: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Message {
    pub fn new(
        tenant_id: TenantId,
        conversation_id: DocId,
        sender_id: UserId,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            conversation_id,
            sender_id,
            body: body.into(),
            read_by: Vec::new(),
            created_at: None,
        }
    }

    pub fn is_read_by(&self, user_id: UserId) -> bool {
        self.sender_id == user_id || self.read_by.contains(&user_id)
    }

    /// Stamp a read receipt. Idempotent.
    pub fn mark_read_by(&self, user_id: UserId) -> Self {
        let mut msg = self.clone();
        if !msg.is_read_by(user_id) {
            msg.read_by.push(user_id);
        }
        msg
    }
}

impl Document for Message {
    const COLLECTION: &'static str = "messages";

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
        if self.body.trim().is_empty() {
            return Err(DomainError::validation("message body must not be empty"));
        }
        if self.body.len() > 10_000 {
            return Err(DomainError::validation("message body too long"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_counts_as_having_read() {
        let sender = UserId::new();
        let msg = Message::new(TenantId::new(), DocId::new(), sender, "hi");
        assert!(msg.is_read_by(sender));
    }

    #[test]
    fn mark_read_is_idempotent() {
        let reader = UserId::new();
        let msg = Message::new(TenantId::new(), DocId::new(), UserId::new(), "hi");
        let msg = msg.mark_read_by(reader).mark_read_by(reader);
        assert_eq!(msg.read_by.len(), 1);
        assert!(msg.is_read_by(reader));
    }

    #[test]
    fn blank_body_rejected() {
        let msg = Message::new(TenantId::new(), DocId::new(), UserId::new(), " \n ");
        assert!(msg.validate().is_err());
    }
}
