//! Schema loader and metadata model.
//!
//! The schema is a versioned YAML document declaring object types and their
//! attributes, counters, dependencies, membership, key groups and CLI
//! metadata. Loading it produces a [`ModelInfo`]: the read-only metadata
//! model the rest of the process consults for name/id resolution, attribute
//! defaults and the derived reference/dependency graphs.
//!
//! A model is either fully valid or not produced at all: any missing field,
//! unknown keyword, illegal flag combination or unresolved cross-reference
//! aborts the load with a [`SchemaError`].
//!
//! # Loading
//!
//! ```ignore
//! let model = swdb_schema::load_schema_file("/etc/swdb/schema.yaml")?;
//! let port = model.object_by_name("device.port").unwrap();
//! ```

mod depgraph;
mod document;
mod error;
mod loader;
mod metadata;
mod model;

pub use depgraph::DepGraph;
pub use error::{SchemaError, SchemaResult};
pub use loader::{load_schema_file, load_schema_str};
pub use metadata::{
    AttrFlags, AttributeMetadata, CliMetadata, DependencyDecl, EnumEntry, KeyGroup, ObjectClass,
    ObjectInfo,
};
pub use model::{ModelInfo, TraceConfig};

/// Name of the hidden per-type attribute marking side-effect-created
/// instances. Allocated for every object type; never declarable.
pub const INTERNAL_OBJECT_ATTR: &str = "internal_object";
