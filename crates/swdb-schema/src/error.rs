//! Schema load errors.
//!
//! All variants are fatal to the load: no partial model is ever returned.

use std::io;
use thiserror::Error;

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while loading a schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Could not read the schema file.
    #[error("failed to read schema file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The document is not structurally valid YAML for the schema layout.
    #[error("malformed schema document: {0}")]
    Document(#[from] serde_yaml::Error),

    /// An attribute declared a type keyword the model does not know.
    #[error("unknown value type `{keyword}` on attribute {attr}")]
    UnknownValueType { attr: String, keyword: String },

    /// An attribute declared a flag keyword the model does not know.
    #[error("unknown flag `{flag}` on attribute {attr}")]
    UnknownFlag { attr: String, flag: String },

    /// An attribute combined flags that contradict each other.
    #[error("illegal flag combination on attribute {attr}: {detail}")]
    FlagConflict { attr: String, detail: String },

    /// Two object type blocks share a fully-qualified name.
    #[error("duplicate object type name {name}")]
    DuplicateObjectType { name: String },

    /// Two attributes (or counters) of one object type share a name.
    #[error("duplicate attribute name {name} on object type {object}")]
    DuplicateAttribute { object: String, name: String },

    /// An attribute tried to use the reserved hidden-attribute name.
    #[error("attribute name `{name}` is reserved (object {object})")]
    ReservedAttributeName { object: String, name: String },

    /// Two attribute ids collided across the whole id space.
    ///
    /// Detected by the dedicated post-pass-1 check, before any
    /// cross-reference resolution runs.
    #[error("attribute id collision: id {id} claimed by {first} and {second}")]
    IdCollision { id: u32, first: String, second: String },

    /// A declared default value does not fit the attribute's type.
    #[error("invalid default for attribute {attr}: {detail}")]
    InvalidDefault { attr: String, detail: String },

    /// A malformed enum value space (empty, duplicate names or values, or
    /// values declared on a non-enum attribute).
    #[error("invalid enum declaration on attribute {attr}: {detail}")]
    InvalidEnum { attr: String, detail: String },

    /// An object-reference attribute without allowed referenced types.
    #[error("attribute {attr} of type object declares no referenced types")]
    MissingRefTypes { attr: String },

    /// A declaration that contradicts the attribute's type (e.g.
    /// `ref_types` on a non-object attribute).
    #[error("invalid declaration on attribute {attr}: {detail}")]
    InvalidAttribute { attr: String, detail: String },

    /// A named object type could not be resolved during pass 2.
    #[error("unresolved object type `{name}` ({context})")]
    UnresolvedObjectType { name: String, context: String },

    /// A named attribute could not be resolved during pass 2.
    #[error("unresolved attribute `{name}` on object type {object} ({context})")]
    UnresolvedAttribute {
        object: String,
        name: String,
        context: String,
    },

    /// `re_evaluate` is only legal on user-class object types.
    #[error("flag re_evaluate is only legal on user-class object types (attribute {attr})")]
    ReEvaluateOnNonUser { attr: String },

    /// Dependency declarations are only legal on auto-class object types.
    #[error("dependencies may only be declared on auto-class object types (object {object})")]
    DependencyOnNonAuto { object: String },

    /// A key group named an attribute twice or reused a group name.
    #[error("invalid key group `{group}` on object type {object}: {detail}")]
    InvalidKeyGroup {
        object: String,
        group: String,
        detail: String,
    },

    /// More than one object type was marked as the root.
    #[error("more than one root object type ({first}, {second})")]
    MultipleRoots { first: String, second: String },

    /// The document declares more object types than a handle can encode.
    #[error("too many object types ({count}; the handle encoding allows 65535)")]
    TooManyObjectTypes { count: usize },
}
