//! Read-receipt batch planning.
//!
//! Marking things read touches several documents (the conversation counter
//! plus every unread message, or many notifications). These planners fold the
//! whole update into one [`WriteBatch`] so readers never observe a half-done
//! state.

use shopkeeper_core::{TenantId, UserId};
use shopkeeper_store::{StoreResult, WriteBatch};

use crate::conversation::Conversation;
use crate::message::Message;
use crate::notification::Notification;

/// Plan the batch that marks `conversation` read for `reader`.
///
/// Zeroes the reader's unread counter and stamps a receipt on every message
/// of the conversation the reader has not seen. Messages from other
/// conversations are ignored.
pub fn plan_mark_conversation_read(
    conversation: &Conversation,
    messages: &[Message],
    reader: UserId,
) -> StoreResult<WriteBatch> {
    let updated = conversation.record_read(reader)?;

    let mut batch = WriteBatch::new(updated.tenant_id);
    for msg in messages {
        if msg.conversation_id != updated.id || msg.is_read_by(reader) {
            continue;
        }
        batch.put(msg.mark_read_by(reader))?;
    }
    batch.put(updated)?;
    Ok(batch)
}

/// Plan the batch that marks every unread notification in `notifications`
/// read. Already-read entries are skipped; an all-read (or empty) input
/// yields an empty batch bound to `tenant_id`.
pub fn plan_mark_all_notifications_read(
    tenant_id: TenantId,
    notifications: &[Notification],
) -> StoreResult<WriteBatch> {
    let mut batch = WriteBatch::new(tenant_id);
    for n in notifications {
        if !n.read {
            batch.put(n.mark_read())?;
        }
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use shopkeeper_core::{DocId, TenantId, Timestamp};
    use shopkeeper_store::{Collection, InMemoryStore};

    use super::*;

    #[test]
    fn mark_conversation_read_batches_counter_and_receipts() {
        let store = Arc::new(InMemoryStore::new());
        let tenant = TenantId::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let conversations: Collection<Conversation> =
            Collection::new(Arc::clone(&store), tenant);
        let messages: Collection<Message> = Collection::new(Arc::clone(&store), tenant);

        let conv = conversations
            .add(Conversation::new(tenant, vec![alice, bob]))
            .unwrap();
        let conv = conversations
            .update(conv.record_post(alice, Timestamp::now()).unwrap())
            .unwrap();
        let m1 = messages
            .add(Message::new(tenant, conv.id, alice, "morning"))
            .unwrap();
        let m2 = messages
            .add(Message::new(tenant, conv.id, alice, "stock came in"))
            .unwrap();

        let all_messages = messages.list().unwrap();
        let batch = plan_mark_conversation_read(&conv, &all_messages, bob).unwrap();
        // Two receipts plus the conversation update.
        assert_eq!(batch.len(), 3);
        store.apply(batch).unwrap();

        let conv = conversations.get(conv.id).unwrap();
        assert_eq!(conv.unread_for(bob), 0);
        assert!(messages.get(m1.id).unwrap().is_read_by(bob));
        assert!(messages.get(m2.id).unwrap().is_read_by(bob));
    }

    #[test]
    fn already_read_messages_get_no_second_receipt() {
        let tenant = TenantId::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let conv = Conversation::new(tenant, vec![alice, bob]);

        let read = Message::new(tenant, conv.id, alice, "seen").mark_read_by(bob);
        let batch = plan_mark_conversation_read(&conv, &[read], bob).unwrap();
        // Only the conversation document itself.
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn messages_from_other_conversations_ignored() {
        let tenant = TenantId::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let conv = Conversation::new(tenant, vec![alice, bob]);

        let stray = Message::new(tenant, DocId::new(), alice, "elsewhere");
        let batch = plan_mark_conversation_read(&conv, &[stray], bob).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn non_participant_reader_rejected() {
        let tenant = TenantId::new();
        let conv = Conversation::new(tenant, vec![UserId::new(), UserId::new()]);
        assert!(plan_mark_conversation_read(&conv, &[], UserId::new()).is_err());
    }

    #[test]
    fn mark_all_notifications_observed_as_one_change() {
        let store = Arc::new(InMemoryStore::new());
        let tenant = TenantId::new();
        let user = UserId::new();
        let notifications: Collection<Notification> =
            Collection::new(Arc::clone(&store), tenant);

        for i in 0..3 {
            notifications
                .add(Notification::new(tenant, user, "invoice.paid", format!("#{i}")))
                .unwrap();
        }

        let live = notifications.watch().unwrap();
        live.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();

        let batch =
            plan_mark_all_notifications_read(tenant, &notifications.list().unwrap()).unwrap();
        assert_eq!(batch.len(), 3);
        store.apply(batch).unwrap();

        let snapshot = live
            .recv_timeout(Duration::from_secs(1))
            .expect("one snapshot for the whole batch")
            .unwrap();
        assert!(snapshot.iter().all(|n: &Notification| n.read));
        assert!(live.try_recv().is_none());
    }

    #[test]
    fn all_read_notifications_yield_empty_batch() {
        let tenant = TenantId::new();
        let user = UserId::new();
        let read = Notification::new(tenant, user, "x", "y").mark_read();
        let batch = plan_mark_all_notifications_read(tenant, &[read]).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn empty_inbox_plans_an_empty_batch_for_the_callers_tenant() {
        let tenant = TenantId::new();
        let batch = plan_mark_all_notifications_read(tenant, &[]).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.tenant_id(), tenant);
    }
}
