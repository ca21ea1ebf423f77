//! Store error model.

use thiserror::Error;

use shopkeeper_core::DomainError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record failed schema validation or violated a domain invariant.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Write targeted a tenant the record does not belong to.
    #[error("tenant isolation: {0}")]
    TenantIsolation(String),

    /// Document does not exist in the scoped collection.
    #[error("document not found")]
    NotFound,

    /// Document id already exists in the scoped collection.
    #[error("document already exists")]
    AlreadyExists,

    /// (De)serialization of a stored document failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// Internal lock poisoning.
    #[error("store lock poisoned")]
    Poisoned,
}
