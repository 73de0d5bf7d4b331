use std::sync::Arc;

use bytes::Bytes;

use crate::error::StoreResult;
use crate::key::ObjectKey;

/// Durable backing layer for the object cache.
///
/// All implementations must satisfy these invariants:
/// - `put` never overwrites. Writing a key that is already durable fails with
///   [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists) and
///   leaves the stored bytes untouched.
/// - A failed `put` leaves nothing observable: no partial object is returned
///   by `get` or `list`.
/// - A missing object is `Ok(None)`, never an error. I/O failures are errors,
///   never `Ok(None)`.
pub trait DurableLayer: Send + Sync {
    /// Persist a new object.
    fn put(&self, key: &ObjectKey, data: &[u8]) -> StoreResult<()>;

    /// Read an object's bytes.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure.
    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Bytes>>;

    /// Enumerate every durable key.
    fn list(&self) -> StoreResult<Vec<ObjectKey>>;

    /// Check whether an object exists.
    ///
    /// Default implementation reads the object. Backends may override with a
    /// cheaper probe.
    fn contains(&self, key: &ObjectKey) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<D: DurableLayer + ?Sized> DurableLayer for Box<D> {
    fn put(&self, key: &ObjectKey, data: &[u8]) -> StoreResult<()> {
        (**self).put(key, data)
    }

    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Bytes>> {
        (**self).get(key)
    }

    fn list(&self) -> StoreResult<Vec<ObjectKey>> {
        (**self).list()
    }

    fn contains(&self, key: &ObjectKey) -> StoreResult<bool> {
        (**self).contains(key)
    }
}

impl<D: DurableLayer + ?Sized> DurableLayer for Arc<D> {
    fn put(&self, key: &ObjectKey, data: &[u8]) -> StoreResult<()> {
        (**self).put(key, data)
    }

    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Bytes>> {
        (**self).get(key)
    }

    fn list(&self) -> StoreResult<Vec<ObjectKey>> {
        (**self).list()
    }

    fn contains(&self, key: &ObjectKey) -> StoreResult<bool> {
        (**self).contains(key)
    }
}
