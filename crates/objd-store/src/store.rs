use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{StoreError, StoreResult};
use crate::key::ObjectKey;
use crate::object::{ListEntry, Object};
use crate::traits::DurableLayer;

/// Object store with a write-through, read-through memory cache over a
/// [`DurableLayer`].
///
/// Every public method takes the single internal guard for its entire
/// duration, durable I/O included, so `save`, `load` and `list` are totally
/// ordered with respect to each other. Callers never see the cache map.
///
/// The cache only ever holds bytes that are already durable: `save` writes
/// durably first and publishes to the cache second, and `load` populates the
/// cache from durable reads.
pub struct ObjectStore<D> {
    durable: D,
    cache: Mutex<HashMap<ObjectKey, Object>>,
}

impl<D: DurableLayer> ObjectStore<D> {
    /// Create a store with an empty cache.
    pub fn new(durable: D) -> Self {
        Self {
            durable,
            cache: Mutex::new(HashMap::new()),
        }
    }

    // The map is only ever changed by a single `insert`, so a panic elsewhere
    // cannot leave it half-updated.
    fn lock_cache(&self) -> MutexGuard<'_, HashMap<ObjectKey, Object>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new object.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if `key` is cached or already
    /// durable; neither store is touched in that case. On a durable write
    /// failure the key is not cached and nothing is observable.
    pub fn save(&self, key: ObjectKey, body: impl Into<Bytes>) -> StoreResult<()> {
        let body = body.into();
        let mut cache = self.lock_cache();
        if cache.contains_key(&key) {
            return Err(StoreError::AlreadyExists(key));
        }

        self.durable.put(&key, &body)?;
        debug!(%key, bytes = body.len(), "object saved");
        cache.insert(key.clone(), Object::new(key, body));
        Ok(())
    }

    /// Fetch an object, reading through to the durable layer on a cache miss.
    ///
    /// Returns `Ok(None)` if the object does not exist anywhere.
    /// Returns `Err` if the durable read failed; the miss is not cached.
    pub fn load(&self, key: &ObjectKey) -> StoreResult<Option<Object>> {
        let mut cache = self.lock_cache();
        if let Some(object) = cache.get(key) {
            trace!(%key, "cache hit");
            return Ok(Some(object.clone()));
        }

        let Some(body) = self.durable.get(key)? else {
            trace!(%key, "object not found");
            return Ok(None);
        };
        debug!(%key, bytes = body.len(), "cache miss, loaded from durable layer");
        let object = Object::new(key.clone(), body);
        cache.insert(key.clone(), object.clone());
        Ok(Some(object))
    }

    /// List every known object, sorted by name and without duplicates.
    ///
    /// Durable keys are annotated with their cache residency. Cached keys
    /// missing from the durable enumeration are still listed, as cached.
    pub fn list(&self) -> StoreResult<Vec<ListEntry>> {
        let cache = self.lock_cache();
        let mut merged: BTreeMap<ObjectKey, bool> = BTreeMap::new();
        for key in self.durable.list()? {
            let in_cache = cache.contains_key(&key);
            merged.insert(key, in_cache);
        }
        for key in cache.keys() {
            merged.entry(key.clone()).or_insert(true);
        }

        Ok(merged
            .iter()
            .map(|(key, in_cache)| ListEntry::new(key, *in_cache))
            .collect())
    }

    /// Number of objects resident in the cache.
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    /// Whether `key` is resident in the cache.
    pub fn is_cached(&self, key: &ObjectKey) -> bool {
        self.lock_cache().contains_key(key)
    }

    /// The durable layer backing this store.
    pub fn durable(&self) -> &D {
        &self.durable
    }
}

impl<D> std::fmt::Debug for ObjectStore<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("ObjectStore")
            .field("cached_objects", &cached)
            .finish_non_exhaustive()
    }
}
