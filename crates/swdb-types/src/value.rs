//! Attribute type tags and the tagged value union.

use crate::{IpPrefix, MacAddress, ObjectHandle, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// The primitive type of an attribute, as declared in the schema.
///
/// List-valued attributes carry the same tag plus an `is_list` marker in
/// their metadata; list elements are stored individually as scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I64,
    Enum,
    Mac,
    String,
    Ip,
    IpPrefix,
    Object,
}

impl ValueType {
    /// Returns the schema keyword for this type.
    pub const fn keyword(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::U8 => "u8",
            ValueType::U16 => "u16",
            ValueType::U32 => "u32",
            ValueType::U64 => "u64",
            ValueType::I64 => "i64",
            ValueType::Enum => "enum",
            ValueType::Mac => "mac",
            ValueType::String => "string",
            ValueType::Ip => "ip",
            ValueType::IpPrefix => "ip-prefix",
            ValueType::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ValueType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bool" => ValueType::Bool,
            "u8" => ValueType::U8,
            "u16" => ValueType::U16,
            "u32" => ValueType::U32,
            "u64" => ValueType::U64,
            "i64" => ValueType::I64,
            "enum" => ValueType::Enum,
            "mac" => ValueType::Mac,
            "string" => ValueType::String,
            "ip" => ValueType::Ip,
            "ip-prefix" => ValueType::IpPrefix,
            "object" => ValueType::Object,
            _ => return Err(ParseError::InvalidValueType(s.to_string())),
        })
    }
}

/// One stored attribute value.
///
/// The active variant always corresponds to the owning attribute's declared
/// [`ValueType`]; writers coming from untrusted input (the snapshot loader)
/// cross-check with [`matches_type`](Self::matches_type) before inserting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I64(i64),
    /// Enum values are stored numerically; the symbolic name lives in the
    /// attribute metadata and is only used at the snapshot boundary.
    Enum(i64),
    Mac(MacAddress),
    String(String),
    Ip(IpAddr),
    IpPrefix(IpPrefix),
    ObjectRef(ObjectHandle),
}

impl AttributeValue {
    /// Returns the type tag of the active variant.
    pub const fn value_type(&self) -> ValueType {
        match self {
            AttributeValue::Bool(_) => ValueType::Bool,
            AttributeValue::U8(_) => ValueType::U8,
            AttributeValue::U16(_) => ValueType::U16,
            AttributeValue::U32(_) => ValueType::U32,
            AttributeValue::U64(_) => ValueType::U64,
            AttributeValue::I64(_) => ValueType::I64,
            AttributeValue::Enum(_) => ValueType::Enum,
            AttributeValue::Mac(_) => ValueType::Mac,
            AttributeValue::String(_) => ValueType::String,
            AttributeValue::Ip(_) => ValueType::Ip,
            AttributeValue::IpPrefix(_) => ValueType::IpPrefix,
            AttributeValue::ObjectRef(_) => ValueType::Object,
        }
    }

    /// Returns true if the active variant matches the given tag.
    pub fn matches_type(&self, ty: ValueType) -> bool {
        self.value_type() == ty
    }

    /// Returns the zero value of a type.
    ///
    /// Used for attribute defaults, list-length slots and the forced reset
    /// of `is_status` attributes on warm-boot load.
    pub fn zeroed(ty: ValueType) -> Self {
        match ty {
            ValueType::Bool => AttributeValue::Bool(false),
            ValueType::U8 => AttributeValue::U8(0),
            ValueType::U16 => AttributeValue::U16(0),
            ValueType::U32 => AttributeValue::U32(0),
            ValueType::U64 => AttributeValue::U64(0),
            ValueType::I64 => AttributeValue::I64(0),
            ValueType::Enum => AttributeValue::Enum(0),
            ValueType::Mac => AttributeValue::Mac(MacAddress::ZERO),
            ValueType::String => AttributeValue::String(String::new()),
            ValueType::Ip => AttributeValue::Ip(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            ValueType::IpPrefix => AttributeValue::IpPrefix(IpPrefix::default()),
            ValueType::Object => AttributeValue::ObjectRef(ObjectHandle::NULL),
        }
    }

    /// Returns the referenced handle for ObjectRef values.
    pub fn as_object_ref(&self) -> Option<ObjectHandle> {
        match self {
            AttributeValue::ObjectRef(h) => Some(*h),
            _ => None,
        }
    }

    /// Returns the value as a list-length count, for U32 length slots.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            AttributeValue::U32(v) => Some(*v),
            _ => None,
        }
    }
}
