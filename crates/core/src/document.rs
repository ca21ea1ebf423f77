//! Document trait: the contract every stored record fulfills.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DomainResult;
use crate::id::{DocId, TenantId};
use crate::timestamp::Timestamp;

/// A tenant-scoped document.
///
/// # Invariants
/// - `tenant_id` is immutable for the lifetime of the document.
/// - `created_at` is stamped by the store at write time when the client left
///   it unset; it is always present on read.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Collection the document lives in (e.g. `"invoices"`).
    const COLLECTION: &'static str;

    fn doc_id(&self) -> DocId;

    fn tenant_id(&self) -> TenantId;

    fn created_at(&self) -> Option<Timestamp>;

    /// Called by the store when `created_at` is unset at write time.
    fn stamp_created_at(&mut self, at: Timestamp);

    /// Schema validation, checked before every write.
    fn validate(&self) -> DomainResult<()>;
}
