use std::path::PathBuf;

use crate::key::ObjectKey;

/// Errors from object store operations.
///
/// A missing object is not an error: reads report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is empty, too long, or could escape the storage root.
    #[error("invalid object key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// An object with this key already exists in the cache or durable layer.
    #[error("object {0} already exists")]
    AlreadyExists(ObjectKey),

    /// The durable layer failed to persist an object.
    #[error("failed to write object {key}: {source}")]
    DurableWrite {
        key: ObjectKey,
        #[source]
        source: std::io::Error,
    },

    /// The durable layer failed to read an object that may exist.
    #[error("failed to read object {key}: {source}")]
    DurableRead {
        key: ObjectKey,
        #[source]
        source: std::io::Error,
    },

    /// The durable layer could not be enumerated.
    #[error("failed to list objects under {}: {source}", root.display())]
    DurableList {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
