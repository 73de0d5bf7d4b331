//! Write-through cached object storage for objd.
//!
//! An object is an immutable, named byte sequence. Objects live durably in a
//! [`DurableLayer`] (one file per key on disk in production) and are served
//! through an in-memory cache owned by [`ObjectStore`].
//!
//! # Storage Backends
//!
//! All durable backends implement the [`DurableLayer`] trait:
//!
//! - [`FsDurable`] -- one file per key under a root directory
//! - [`InMemoryDurable`] -- `HashMap`-based layer for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; saving an existing key fails.
//! 2. Write-then-publish: the durable write completes before the object is
//!    inserted into the cache, so the cache never outpaces the durable layer.
//! 3. A key absent from the cache but present durably is still a valid object,
//!    found by `load` (read-through) and `list`.
//! 4. Every `ObjectStore` operation holds one exclusive guard for its whole
//!    duration, durable I/O included.
//! 5. I/O errors are propagated as typed errors, never reported as "not found".

pub mod error;
pub mod fs;
pub mod key;
pub mod memory;
pub mod object;
pub mod store;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsDurable;
pub use key::ObjectKey;
pub use memory::InMemoryDurable;
pub use object::{ListEntry, Object};
pub use store::ObjectStore;
pub use traits::DurableLayer;
