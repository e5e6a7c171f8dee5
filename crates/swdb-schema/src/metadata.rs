//! Typed metadata records built from the schema document.

use swdb_types::{AttrId, AttributeValue, ObjectTypeId, ValueType};

/// Object type class.
///
/// `User` objects are created directly by callers; `Auto` objects only as a
/// side effect of another object's lifecycle; `None` marks types outside
/// that distinction (e.g. the device root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    User,
    Auto,
    None,
}

/// Attribute flag set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttrFlags {
    pub mandatory: bool,
    pub create_only: bool,
    pub immutable: bool,
    pub read_only: bool,
    pub internal: bool,
    pub counter: bool,
    pub re_evaluate: bool,
    pub is_status: bool,
}

impl AttrFlags {
    /// Parses a list of flag keywords. Returns the offending keyword on
    /// failure; the loader wraps it with attribute context.
    pub fn from_keywords(keywords: &[String]) -> Result<Self, String> {
        let mut flags = AttrFlags::default();
        for kw in keywords {
            match kw.as_str() {
                "mandatory" => flags.mandatory = true,
                "create_only" => flags.create_only = true,
                "immutable" => flags.immutable = true,
                "read_only" => flags.read_only = true,
                "internal" => flags.internal = true,
                "counter" => flags.counter = true,
                "re_evaluate" => flags.re_evaluate = true,
                "is_status" => flags.is_status = true,
                other => return Err(other.to_string()),
            }
        }
        Ok(flags)
    }

    /// Flags for the hidden `internal_object` attribute.
    pub const fn hidden_internal() -> Self {
        AttrFlags {
            mandatory: false,
            create_only: false,
            immutable: true,
            read_only: false,
            internal: true,
            counter: false,
            re_evaluate: false,
            is_status: false,
        }
    }

    /// Flags for schema-declared counters.
    pub const fn counter() -> Self {
        AttrFlags {
            mandatory: false,
            create_only: false,
            immutable: false,
            read_only: true,
            internal: false,
            counter: true,
            re_evaluate: false,
            is_status: false,
        }
    }
}

/// One (value, name) pair of an enum value space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub value: i64,
    pub name: String,
}

/// A resolved dependency declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyDecl {
    pub target_type: ObjectTypeId,
    pub target_attr: AttrId,
}

/// A named group of attributes forming a lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGroup {
    pub name: String,
    pub attrs: Vec<AttrId>,
}

/// Human-facing CLI metadata carried for the documentation tool-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliMetadata {
    pub name: String,
    pub help: String,
}

/// Metadata of one attribute.
#[derive(Debug, Clone)]
pub struct AttributeMetadata {
    /// Dense schema-wide id.
    pub id: AttrId,
    /// Local name within the owning type.
    pub name: String,
    /// Fully-qualified name, `<type-fqn>.<name>`. This is the identity that
    /// survives restarts; ids do not.
    pub fqn: String,
    /// Owning object type.
    pub object_type: ObjectTypeId,
    pub value_type: ValueType,
    pub is_list: bool,
    pub flags: AttrFlags,
    /// Default value; for list attributes this is the `U32(0)` length slot.
    pub default: AttributeValue,
    /// Allowed referenced types (object-reference attributes only).
    pub ref_types: Vec<ObjectTypeId>,
    /// Ordered enum value space (enum attributes only).
    pub enum_values: Vec<EnumEntry>,
}

impl AttributeMetadata {
    /// Looks up the symbolic name of an enum value.
    pub fn enum_name(&self, value: i64) -> Option<&str> {
        self.enum_values
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.name.as_str())
    }

    /// Looks up the numeric value of an enum name.
    pub fn enum_value(&self, name: &str) -> Option<i64> {
        self.enum_values
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value)
    }
}

/// Metadata of one object type.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Dense id; the numeric value may differ between builds.
    pub id: ObjectTypeId,
    /// Fully-qualified type name; the identity that survives restarts.
    pub name: String,
    pub class: ObjectClass,
    /// Orders dependent auto-derivation among inverse-referencing types.
    pub priority: u32,
    /// Marks the distinguished root/sink type of the reference graph.
    pub root: bool,
    /// Attribute ids in declaration order (declared attributes, then
    /// counters, then the hidden `internal_object` attribute).
    pub attrs: Vec<AttrId>,
    pub dependencies: Vec<DependencyDecl>,
    /// Member object types.
    pub members: Vec<ObjectTypeId>,
    pub key_groups: Vec<KeyGroup>,
    pub cli: Option<CliMetadata>,
}

impl ObjectInfo {
    /// Looks up a key group by name.
    pub fn key_group(&self, name: &str) -> Option<&KeyGroup> {
        self.key_groups.iter().find(|g| g.name == name)
    }
}
