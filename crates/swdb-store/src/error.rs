//! Object store errors.

use swdb_types::{AttrId, ObjectHandle};
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store operations.
///
/// Lock contention is never an error: the advisory lock blocks until the
/// holder releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The handle is not present in the store.
    #[error("object {0} not found")]
    NotFound(ObjectHandle),

    /// An object with this handle already exists.
    #[error("object {0} already exists")]
    AlreadyExists(ObjectHandle),

    /// The object exists but holds no value at (attr, extra).
    #[error("object {handle} has no value for attribute {attr} extra {extra}")]
    ValueNotFound {
        handle: ObjectHandle,
        attr: AttrId,
        extra: u32,
    },
}
