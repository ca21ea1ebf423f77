//! Typed, tenant-scoped view over the store.

use std::marker::PhantomData;
use std::sync::Arc;

use shopkeeper_core::{DocId, Document, TenantId, Timestamp};

use crate::error::{StoreError, StoreResult};
use crate::live::LiveQuery;
use crate::memory::{Expect, InMemoryStore};

/// Handle to one tenant's view of a document collection.
///
/// Every write validates the record first and refuses records carrying a
/// different tenant id than the handle was scoped to.
#[derive(Debug)]
pub struct Collection<T: Document> {
    store: Arc<InMemoryStore>,
    tenant_id: TenantId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tenant_id: self.tenant_id,
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(store: Arc<InMemoryStore>, tenant_id: TenantId) -> Self {
        Self {
            store,
            tenant_id,
            _marker: PhantomData,
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn guard_tenant(&self, doc: &T) -> StoreResult<()> {
        if doc.tenant_id() != self.tenant_id {
            return Err(StoreError::TenantIsolation(format!(
                "record tenant {} does not match collection tenant {}",
                doc.tenant_id(),
                self.tenant_id
            )));
        }
        Ok(())
    }

    fn encode(doc: &T) -> StoreResult<serde_json::Value> {
        serde_json::to_value(doc).map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn decode(value: serde_json::Value) -> StoreResult<T> {
        serde_json::from_value(value).map_err(|e| StoreError::Codec(e.to_string()))
    }

    /// Validate and insert a new document.
    ///
    /// Stamps `created_at` when the client left it unset. Returns the record
    /// as written.
    pub fn add(&self, mut doc: T) -> StoreResult<T> {
        self.guard_tenant(&doc)?;
        if doc.created_at().is_none() {
            doc.stamp_created_at(Timestamp::now());
        }
        doc.validate()?;

        self.store.put(
            self.tenant_id,
            T::COLLECTION,
            doc.doc_id(),
            Self::encode(&doc)?,
            Expect::Create,
        )?;
        Ok(doc)
    }

    /// Validate and replace an existing document.
    ///
    /// `created_at` is inherited from the stored document when the incoming
    /// record leaves it unset; creation time never moves on update.
    pub fn update(&self, mut doc: T) -> StoreResult<T> {
        self.guard_tenant(&doc)?;

        let stored = self
            .store
            .get(self.tenant_id, T::COLLECTION, doc.doc_id())?
            .ok_or(StoreError::NotFound)?;
        if doc.created_at().is_none() {
            let stored: T = Self::decode(stored)?;
            if let Some(at) = stored.created_at() {
                doc.stamp_created_at(at);
            }
        }
        doc.validate()?;

        self.store.put(
            self.tenant_id,
            T::COLLECTION,
            doc.doc_id(),
            Self::encode(&doc)?,
            Expect::Exists,
        )?;
        Ok(doc)
    }

    pub fn delete(&self, doc_id: DocId) -> StoreResult<()> {
        self.store.delete(self.tenant_id, T::COLLECTION, doc_id)
    }

    pub fn get(&self, doc_id: DocId) -> StoreResult<T> {
        let value = self
            .store
            .get(self.tenant_id, T::COLLECTION, doc_id)?
            .ok_or(StoreError::NotFound)?;
        Self::decode(value)
    }

    pub fn list(&self) -> StoreResult<Vec<T>> {
        self.store
            .list(self.tenant_id, T::COLLECTION)?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Open a live query over this tenant's collection.
    pub fn watch(&self) -> StoreResult<LiveQuery<T>> {
        Ok(LiveQuery::new(
            self.store.watch(self.tenant_id, T::COLLECTION)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use shopkeeper_core::{DomainError, DomainResult};

    use super::*;
    use crate::batch::WriteBatch;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: DocId,
        tenant_id: TenantId,
        body: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        created_at: Option<Timestamp>,
    }

    impl Note {
        fn new(tenant_id: TenantId, body: &str) -> Self {
            Self {
                id: DocId::new(),
                tenant_id,
                body: body.to_string(),
                created_at: None,
            }
        }
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

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
                return Err(DomainError::validation("note body must not be empty"));
            }
            Ok(())
        }
    }

    fn collection(tenant_id: TenantId) -> Collection<Note> {
        Collection::new(Arc::new(InMemoryStore::new()), tenant_id)
    }

    #[test]
    fn add_stamps_created_at_and_get_returns_record() {
        let tenant = TenantId::new();
        let notes = collection(tenant);

        let written = notes.add(Note::new(tenant, "hello")).unwrap();
        assert!(written.created_at.is_some());

        let read = notes.get(written.id).unwrap();
        assert_eq!(read, written);
    }

    #[test]
    fn add_rejects_invalid_record() {
        let tenant = TenantId::new();
        let notes = collection(tenant);

        let err = notes.add(Note::new(tenant, "   ")).unwrap_err();
        assert_eq!(
            err,
            StoreError::Domain(DomainError::validation("note body must not be empty"))
        );
        assert!(notes.list().unwrap().is_empty());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let tenant = TenantId::new();
        let notes = collection(tenant);

        let note = notes.add(Note::new(tenant, "one")).unwrap();
        let err = notes.add(note).unwrap_err();
        assert_eq!(err, StoreError::AlreadyExists);
    }

    #[test]
    fn update_preserves_created_at() {
        let tenant = TenantId::new();
        let notes = collection(tenant);

        let written = notes.add(Note::new(tenant, "first")).unwrap();
        let stamped = written.created_at;

        let mut changed = written.clone();
        changed.body = "second".to_string();
        changed.created_at = None;
        let updated = notes.update(changed).unwrap();

        assert_eq!(updated.created_at, stamped);
        assert_eq!(notes.get(written.id).unwrap().body, "second");
    }

    #[test]
    fn update_of_missing_document_is_not_found() {
        let tenant = TenantId::new();
        let notes = collection(tenant);

        let err = notes.update(Note::new(tenant, "ghost")).unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[test]
    fn writes_scoped_to_other_tenant_are_rejected() {
        let tenant = TenantId::new();
        let notes = collection(tenant);

        let foreign = Note::new(TenantId::new(), "intruder");
        match notes.add(foreign) {
            Err(StoreError::TenantIsolation(_)) => {}
            other => panic!("expected tenant isolation error, got {other:?}"),
        }
    }

    #[test]
    fn tenants_do_not_see_each_other() {
        let store = Arc::new(InMemoryStore::new());
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let notes_a: Collection<Note> = Collection::new(Arc::clone(&store), tenant_a);
        let notes_b: Collection<Note> = Collection::new(store, tenant_b);

        let written = notes_a.add(Note::new(tenant_a, "private")).unwrap();

        assert!(notes_b.list().unwrap().is_empty());
        assert_eq!(notes_b.get(written.id).unwrap_err(), StoreError::NotFound);
    }

    #[test]
    fn watch_delivers_initial_snapshot_then_updates() {
        let tenant = TenantId::new();
        let notes = collection(tenant);
        notes.add(Note::new(tenant, "existing")).unwrap();

        let live = notes.watch().unwrap();

        let initial = live
            .recv_timeout(Duration::from_secs(1))
            .expect("initial snapshot")
            .unwrap();
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].body, "existing");

        notes.add(Note::new(tenant, "new")).unwrap();
        let next = live
            .recv_timeout(Duration::from_secs(1))
            .expect("snapshot after add")
            .unwrap();
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn watch_does_not_observe_other_tenants() {
        let store = Arc::new(InMemoryStore::new());
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let notes_a: Collection<Note> = Collection::new(Arc::clone(&store), tenant_a);
        let notes_b: Collection<Note> = Collection::new(store, tenant_b);

        let live_a = notes_a.watch().unwrap();
        // Drain the initial (empty) snapshot.
        live_a.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();

        notes_b.add(Note::new(tenant_b, "elsewhere")).unwrap();
        assert!(live_a.try_recv().is_none());
    }

    #[test]
    fn batch_applies_atomically_with_one_notification() {
        let tenant = TenantId::new();
        let notes = collection(tenant);
        let live = notes.watch().unwrap();
        live.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();

        let keep = notes.add(Note::new(tenant, "keep")).unwrap();
        live.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();
        let drop = notes.add(Note::new(tenant, "drop")).unwrap();
        live.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();

        let mut batch = WriteBatch::new(tenant);
        batch.put(Note::new(tenant, "added")).unwrap();
        batch.delete::<Note>(drop.id);
        notes.store.apply(batch).unwrap();

        let after = live
            .recv_timeout(Duration::from_secs(1))
            .expect("one snapshot for the whole batch")
            .unwrap();
        assert_eq!(after.len(), 2);
        assert!(after.iter().any(|n| n.id == keep.id));
        assert!(after.iter().all(|n| n.body != "drop"));
        // No second notification for the same batch.
        assert!(live.try_recv().is_none());
    }

    #[test]
    fn batch_rejects_foreign_tenant_record() {
        let tenant = TenantId::new();
        let mut batch = WriteBatch::new(tenant);
        match batch.put(Note::new(TenantId::new(), "foreign")) {
            Err(StoreError::TenantIsolation(_)) => {}
            other => panic!("expected tenant isolation error, got {other:?}"),
        }
        assert!(batch.is_empty());
    }

}
