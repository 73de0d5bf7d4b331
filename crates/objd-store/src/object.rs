use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::key::ObjectKey;

/// An immutable named blob.
///
/// The body is reference-counted, so cloning an `Object` out of the cache does
/// not copy its bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    key: ObjectKey,
    body: Bytes,
}

impl Object {
    pub fn new(key: ObjectKey, body: impl Into<Bytes>) -> Self {
        Self {
            key,
            body: body.into(),
        }
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Size of the body in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// One row of an object listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    /// The object key.
    pub name: String,
    /// Whether the object is currently resident in the memory cache.
    pub in_cache: bool,
}

impl ListEntry {
    pub fn new(key: &ObjectKey, in_cache: bool) -> Self {
        Self {
            name: key.to_string(),
            in_cache,
        }
    }
}
