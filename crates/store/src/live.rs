//! Live-query subscriptions.
//!
//! A live query pushes the **full result set** of a scoped collection: once
//! immediately on subscribe, then again after every mutation of that scope.
//! Subscribers that fall away are pruned on the next publish.

use std::marker::PhantomData;
use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use serde_json::Value as JsonValue;

use shopkeeper_core::Document;

use crate::error::StoreError;

/// Raw subscription carrying JSON snapshots of one `(tenant, collection)`.
///
/// Designed for single-threaded consumption; one subscription per consumer.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<Vec<JsonValue>>,
}

impl Subscription {
    pub(crate) fn new(receiver: Receiver<Vec<JsonValue>>) -> Self {
        Self { receiver }
    }

    /// Block until the next snapshot is available.
    pub fn recv(&self) -> Result<Vec<JsonValue>, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a snapshot without blocking.
    pub fn try_recv(&self) -> Result<Vec<JsonValue>, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a snapshot.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Vec<JsonValue>, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Typed live query over a document collection.
///
/// Wraps a [`Subscription`] and decodes each snapshot into records.
#[derive(Debug)]
pub struct LiveQuery<T: Document> {
    inner: Subscription,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> LiveQuery<T> {
    pub(crate) fn new(inner: Subscription) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    fn decode(snapshot: Vec<JsonValue>) -> Result<Vec<T>, StoreError> {
        snapshot
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| StoreError::Codec(e.to_string())))
            .collect()
    }

    /// Block until the next result set is available.
    ///
    /// Returns `None` when the store side of the subscription is gone.
    pub fn recv(&self) -> Option<Result<Vec<T>, StoreError>> {
        self.inner.recv().ok().map(Self::decode)
    }

    /// Block for up to `timeout` waiting for a result set.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Result<Vec<T>, StoreError>> {
        self.inner.recv_timeout(timeout).ok().map(Self::decode)
    }

    /// Try to receive a result set without blocking.
    pub fn try_recv(&self) -> Option<Result<Vec<T>, StoreError>> {
        self.inner.try_recv().ok().map(Self::decode)
    }

    /// Unwrap into the raw subscription, for consumers that need to tell a
    /// timeout apart from a closed store.
    pub fn into_inner(self) -> Subscription {
        self.inner
    }
}
