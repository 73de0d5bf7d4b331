use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;

use crate::error::{StoreError, StoreResult};
use crate::key::ObjectKey;
use crate::traits::DurableLayer;

/// In-memory, HashMap-based durable layer.
///
/// Intended for tests and embedding. Nothing survives the process, but it
/// honors every [`DurableLayer`] invariant, including refusing overwrites.
pub struct InMemoryDurable {
    objects: RwLock<HashMap<ObjectKey, Bytes>>,
}

impl InMemoryDurable {
    /// Create a new empty layer.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the layer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDurable {
    fn default() -> Self {
        Self::new()
    }
}

impl DurableLayer for InMemoryDurable {
    fn put(&self, key: &ObjectKey, data: &[u8]) -> StoreResult<()> {
        let mut map = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.clone()));
        }
        map.insert(key.clone(), Bytes::copy_from_slice(data));
        Ok(())
    }

    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Bytes>> {
        let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(key).cloned())
    }

    fn list(&self) -> StoreResult<Vec<ObjectKey>> {
        let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<ObjectKey> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn contains(&self, key: &ObjectKey) -> StoreResult<bool> {
        let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryDurable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDurable")
            .field("object_count", &self.len())
            .finish()
    }
}
