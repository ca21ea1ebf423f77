//! Atomic multi-document writes.

use serde_json::Value as JsonValue;

use shopkeeper_core::{DocId, Document, TenantId, Timestamp};

use crate::error::{StoreError, StoreResult};

/// One operation inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BatchOp {
    Put {
        collection: &'static str,
        doc_id: DocId,
        value: JsonValue,
    },
    Delete {
        collection: &'static str,
        doc_id: DocId,
    },
}

impl BatchOp {
    pub(crate) fn collection(&self) -> &'static str {
        match self {
            BatchOp::Put { collection, .. } | BatchOp::Delete { collection, .. } => collection,
        }
    }
}

/// A set of writes applied atomically under the store lock.
///
/// A batch is bound to one tenant at construction; a record belonging to a
/// different tenant is rejected when it is added, so a mixed-tenant batch can
/// never reach the store. Live-query subscribers observe the whole batch as a
/// single change per touched collection.
#[derive(Debug)]
pub struct WriteBatch {
    tenant_id: TenantId,
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            ops: Vec::new(),
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Queue an insert-or-replace of `doc`.
    ///
    /// Validates the record and stamps `created_at` if the caller left it
    /// unset, mirroring [`crate::Collection::add`].
    pub fn put<T: Document>(&mut self, mut doc: T) -> StoreResult<&mut Self> {
        if doc.tenant_id() != self.tenant_id {
            return Err(StoreError::TenantIsolation(format!(
                "record tenant {} does not match batch tenant {}",
                doc.tenant_id(),
                self.tenant_id
            )));
        }
        if doc.created_at().is_none() {
            doc.stamp_created_at(Timestamp::now());
        }
        doc.validate()?;

        let value = serde_json::to_value(&doc).map_err(|e| StoreError::Codec(e.to_string()))?;
        self.ops.push(BatchOp::Put {
            collection: T::COLLECTION,
            doc_id: doc.doc_id(),
            value,
        });
        Ok(self)
    }

    /// Queue a delete of one document in `T`'s collection.
    pub fn delete<T: Document>(&mut self, doc_id: DocId) -> &mut Self {
        self.ops.push(BatchOp::Delete {
            collection: T::COLLECTION,
            doc_id,
        });
        self
    }

    pub(crate) fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}
