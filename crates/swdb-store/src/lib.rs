//! Concurrency-guarded in-memory object store.
//!
//! The store maps [`ObjectHandle`]s to ordered attribute-value collections.
//! It knows nothing about the schema: callers resolve names and defaults
//! through the metadata model and hand the store plain
//! `(attr, extra, value)` triples, which keeps the hot CRUD path free of
//! model lookups.
//!
//! Two levels of exclusion:
//!
//! - a store-wide mutex serializes every operation, so each call observes
//!   and produces a consistent table state;
//! - each object carries a reentrant advisory lock for caller-initiated
//!   critical sections spanning several store calls (see [`ObjectStore::lock`]).
//!
//! [`ObjectHandle`]: swdb_types::ObjectHandle

mod error;
mod lock;
mod record;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::ObjectStore;
