//! In-memory document store.
//!
//! Intended for tests/dev and single-process deployments. Every scope is a
//! `(tenant, collection)` pair; isolation between tenants is structural, a
//! scope can never be addressed without its tenant id.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::mpsc;

use serde_json::Value as JsonValue;

use shopkeeper_core::{DocId, TenantId};

use crate::batch::{BatchOp, WriteBatch};
use crate::error::{StoreError, StoreResult};
use crate::live::Subscription;

type ScopeKey = (TenantId, &'static str);

#[derive(Debug, Default)]
struct Scope {
    docs: BTreeMap<DocId, JsonValue>,
    watchers: Vec<mpsc::Sender<Vec<JsonValue>>>,
}

impl Scope {
    fn snapshot(&self) -> Vec<JsonValue> {
        self.docs.values().cloned().collect()
    }

    /// Fan the current snapshot out to live watchers, dropping dead ones.
    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.watchers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

/// Existence expectation for a raw put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    Create,
    Exists,
}

/// In-memory store with per-scope live-query fan-out.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    scopes: Mutex<HashMap<ScopeKey, Scope>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<ScopeKey, Scope>>> {
        self.scopes.lock().map_err(|_| StoreError::Poisoned)
    }

    pub(crate) fn put(
        &self,
        tenant_id: TenantId,
        collection: &'static str,
        doc_id: DocId,
        value: JsonValue,
        expect: Expect,
    ) -> StoreResult<()> {
        let mut scopes = self.lock()?;
        let scope = scopes.entry((tenant_id, collection)).or_default();

        match expect {
            Expect::Create if scope.docs.contains_key(&doc_id) => {
                return Err(StoreError::AlreadyExists);
            }
            Expect::Exists if !scope.docs.contains_key(&doc_id) => {
                return Err(StoreError::NotFound);
            }
            _ => {}
        }

        scope.docs.insert(doc_id, value);
        scope.notify();
        Ok(())
    }

    pub(crate) fn delete(
        &self,
        tenant_id: TenantId,
        collection: &'static str,
        doc_id: DocId,
    ) -> StoreResult<()> {
        let mut scopes = self.lock()?;
        let scope = scopes.entry((tenant_id, collection)).or_default();
        if scope.docs.remove(&doc_id).is_none() {
            return Err(StoreError::NotFound);
        }
        scope.notify();
        Ok(())
    }

    pub(crate) fn get(
        &self,
        tenant_id: TenantId,
        collection: &'static str,
        doc_id: DocId,
    ) -> StoreResult<Option<JsonValue>> {
        let scopes = self.lock()?;
        Ok(scopes
            .get(&(tenant_id, collection))
            .and_then(|s| s.docs.get(&doc_id).cloned()))
    }

    pub(crate) fn list(
        &self,
        tenant_id: TenantId,
        collection: &'static str,
    ) -> StoreResult<Vec<JsonValue>> {
        let scopes = self.lock()?;
        Ok(scopes
            .get(&(tenant_id, collection))
            .map(Scope::snapshot)
            .unwrap_or_default())
    }

    /// Subscribe to a scope. The current result set is delivered immediately,
    /// then once per mutation of the scope.
    pub(crate) fn watch(
        &self,
        tenant_id: TenantId,
        collection: &'static str,
    ) -> StoreResult<Subscription> {
        let mut scopes = self.lock()?;
        let scope = scopes.entry((tenant_id, collection)).or_default();

        let (tx, rx) = mpsc::channel();
        // Initial snapshot; a send failure here means the subscriber is
        // already gone, which the retain on the next notify cleans up.
        let _ = tx.send(scope.snapshot());
        scope.watchers.push(tx);
        Ok(Subscription::new(rx))
    }

    /// Apply a [`WriteBatch`] atomically.
    ///
    /// All operations land under one lock acquisition; watchers of a touched
    /// collection observe exactly one new snapshot per collection.
    pub fn apply(&self, batch: WriteBatch) -> StoreResult<()> {
        let tenant_id = batch.tenant_id();
        let ops = batch.into_ops();
        if ops.is_empty() {
            return Ok(());
        }

        let mut scopes = self.lock()?;

        let touched: HashSet<&'static str> = ops.iter().map(BatchOp::collection).collect();
        for op in ops {
            let scope = scopes.entry((tenant_id, op.collection())).or_default();
            match op {
                BatchOp::Put { doc_id, value, .. } => {
                    scope.docs.insert(doc_id, value);
                }
                BatchOp::Delete { doc_id, .. } => {
                    scope.docs.remove(&doc_id);
                }
            }
        }

        for collection in touched {
            if let Some(scope) = scopes.get_mut(&(tenant_id, collection)) {
                scope.notify();
            }
        }
        Ok(())
    }
}
