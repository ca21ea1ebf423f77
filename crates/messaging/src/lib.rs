//! `shopkeeper-messaging` — conversations, messages and notifications.
//!
//! Unread counters are bookkeeping, not a protocol: posting increments every
//! other participant's counter, marking read zeroes the reader's counter and
//! stamps receipts on the unread messages in one atomic batch.

pub mod conversation;
pub mod message;
pub mod notification;
pub mod receipts;

pub use conversation::Conversation;
pub use message::Message;
pub use notification::Notification;
pub use receipts::{plan_mark_all_notifications_read, plan_mark_conversation_read};
