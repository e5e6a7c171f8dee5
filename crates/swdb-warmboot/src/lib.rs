//! Warm-boot snapshot engine.
//!
//! Serializes the whole object store to a line-oriented text snapshot and
//! restores it after a restart. Identity is carried symbolically: type and
//! attribute names are fully qualified, enum values are written by name,
//! and object references embed the referenced type's name. Numeric type
//! ids are allowed to change between the build that wrote a snapshot and
//! the build reading it; every handle is re-derived on load by keeping its
//! local id and re-resolving the type id by name.
//!
//! Restoration is two-phased: all lines are parsed first (corrupt records
//! are logged and dropped, the load continues), then objects are created
//! in a dependency-respecting topological order so that every reference
//! target exists before its referrer.

mod codec;
mod dump;
mod error;
mod load;
mod topo;

pub use dump::{dump, dump_to};
pub use error::{SnapshotError, SnapshotResult};
pub use load::{load, load_from, LoadResult};
