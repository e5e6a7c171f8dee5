//! Raw schema document layout (serde side).
//!
//! These structs mirror the YAML document one-to-one. Keywords such as the
//! value type and flag names are kept as strings here; the loader turns them
//! into typed metadata with proper error context.

use serde::Deserialize;

/// Top-level schema document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDoc {
    /// Schema format version.
    pub version: u32,
    /// Object type blocks, in document order.
    pub objects: Vec<ObjectDoc>,
}

/// One object type block.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDoc {
    /// Fully-qualified type name, e.g. `device.port`.
    pub name: String,
    /// Object class keyword: `user`, `auto` or `none`.
    pub class: ClassDoc,
    /// Priority ordering dependent auto-derivation (higher runs first).
    #[serde(default)]
    pub priority: u32,
    /// Marks the distinguished root/sink type (at most one per schema).
    #[serde(default)]
    pub root: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDoc>,
    #[serde(default)]
    pub counters: Vec<CounterDoc>,
    #[serde(default)]
    pub dependencies: Vec<DependencyDoc>,
    /// Member object type names.
    #[serde(default)]
    pub membership: Vec<String>,
    #[serde(default)]
    pub key_groups: Vec<KeyGroupDoc>,
    #[serde(default)]
    pub cli: Option<CliDoc>,
}

/// Object class keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassDoc {
    User,
    Auto,
    None,
}

/// One attribute declaration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDoc {
    pub name: String,
    /// Value type keyword (`bool`, `u32`, `enum`, `object`, ...).
    #[serde(rename = "type")]
    pub value_type: String,
    /// Marks a list-valued attribute.
    #[serde(default)]
    pub list: bool,
    /// Flag keywords (`mandatory`, `create_only`, ...).
    #[serde(default)]
    pub flags: Vec<String>,
    /// Default value, coerced against the declared type.
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,
    /// Allowed referenced types, object-reference attributes only.
    #[serde(default)]
    pub ref_types: Vec<String>,
    /// Enum value space, enum attributes only.
    #[serde(default)]
    pub values: Vec<EnumEntryDoc>,
}

/// One counter declaration. Counters become u64 attributes flagged
/// `counter` + `read_only`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterDoc {
    pub name: String,
}

/// One (value, name) pair of an enum value space.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumEntryDoc {
    pub value: i64,
    pub name: String,
}

/// One dependency declaration: this (auto) type must be notified when the
/// named attribute of the named target type changes.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyDoc {
    /// Target object type, fully qualified.
    pub object: String,
    /// Target attribute, local name within the target type.
    pub attribute: String,
}

/// A named group of attributes forming a lookup key.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyGroupDoc {
    pub name: String,
    pub attributes: Vec<String>,
}

/// Human-facing CLI metadata, consumed by the documentation tool-chain.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliDoc {
    pub name: String,
    #[serde(default)]
    pub help: String,
}
