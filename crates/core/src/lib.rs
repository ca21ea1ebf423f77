//! `shopkeeper-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod document;
pub mod error;
pub mod id;
pub mod timestamp;

pub use document::Document;
pub use error::{DomainError, DomainResult};
pub use id::{DocId, TenantId, UserId};
pub use timestamp::Timestamp;
