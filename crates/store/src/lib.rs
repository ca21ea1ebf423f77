//! `shopkeeper-store` — tenant-scoped document store with live queries.
//!
//! The store keeps every document under a `(tenant, collection)` scope and
//! pushes the full updated result set to live-query subscribers after each
//! mutation. Multi-document consistency comes from [`WriteBatch`], the one
//! atomic primitive the store offers.

pub mod batch;
pub mod collection;
pub mod error;
pub mod live;
pub mod memory;

pub use batch::WriteBatch;
pub use collection::Collection;
pub use error::{StoreError, StoreResult};
pub use live::{LiveQuery, Subscription};
pub use memory::InMemoryStore;
