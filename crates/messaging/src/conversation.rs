use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp, UserId};

/// A chat thread between users of one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub participants: Vec<UserId>,
    /// Unread message count per participant.
    #[serde(default)]
    pub unread: HashMap<UserId, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Conversation {
    pub fn new(tenant_id: TenantId, participants: Vec<UserId>) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            participants,
            unread: HashMap::new(),
            last_message_at: None,
            created_at: None,
        }
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.participants.contains(&user_id)
    }

    pub fn unread_for(&self, user_id: UserId) -> u32 {
        self.unread.get(&user_id).copied().unwrap_or(0)
    }

    /// Bookkeeping for a posted message: bump `last_message_at` and increment
    /// every participant's unread counter except the sender's.
    pub fn record_post(&self, sender: UserId, at: Timestamp) -> DomainResult<Self> {
        if !self.is_participant(sender) {
            return Err(DomainError::invariant("sender is not a participant"));
        }
        let mut conv = self.clone();
        conv.last_message_at = Some(at);
        for user in &conv.participants {
            if *user != sender {
                let counter = conv.unread.entry(*user).or_insert(0);
                *counter = counter.saturating_add(1);
            }
        }
        Ok(conv)
    }

    /// Zero the reader's unread counter. Counters never underflow; a reader
    /// with nothing unread is a no-op.
    pub fn record_read(&self, reader: UserId) -> DomainResult<Self> {
        if !self.is_participant(reader) {
            return Err(DomainError::invariant("reader is not a participant"));
        }
        let mut conv = self.clone();
        conv.unread.insert(reader, 0);
        Ok(conv)
    }
}

impl Document for Conversation {
    const COLLECTION: &'static str = "conversations";

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
        if self.participants.len() < 2 {
            return Err(DomainError::validation(
                "conversation needs at least two participants",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv() -> (Conversation, UserId, UserId) {
        let a = UserId::new();
        let b = UserId::new();
        (Conversation::new(TenantId::new(), vec![a, b]), a, b)
    }

    #[test]
    fn post_increments_other_participants_only() {
        let (conv, a, b) = conv();
        let conv = conv.record_post(a, Timestamp::now()).unwrap();

        assert_eq!(conv.unread_for(a), 0);
        assert_eq!(conv.unread_for(b), 1);
        assert!(conv.last_message_at.is_some());
    }

    #[test]
    fn read_zeroes_reader_counter() {
        let (conv, a, b) = conv();
        let conv = conv.record_post(a, Timestamp::now()).unwrap();
        let conv = conv.record_post(a, Timestamp::now()).unwrap();
        assert_eq!(conv.unread_for(b), 2);

        let conv = conv.record_read(b).unwrap();
        assert_eq!(conv.unread_for(b), 0);
    }

    #[test]
    fn read_with_nothing_unread_is_noop() {
        let (conv, a, _) = conv();
        let conv = conv.record_read(a).unwrap();
        assert_eq!(conv.unread_for(a), 0);
    }

    #[test]
    fn non_participant_cannot_post() {
        let (conv, _, _) = conv();
        let err = conv.record_post(UserId::new(), Timestamp::now()).unwrap_err();
        assert_eq!(err, DomainError::invariant("sender is not a participant"));
    }

    #[test]
    fn single_participant_conversation_rejected() {
        let conv = Conversation::new(TenantId::new(), vec![UserId::new()]);
        assert!(conv.validate().is_err());
    }
}
