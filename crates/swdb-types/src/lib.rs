//! Leaf value types for the switch state store.
//!
//! This crate provides the type vocabulary shared by the schema model, the
//! object store and the warm-boot engine:
//!
//! - [`ObjectHandle`]: bit-packed object identity (type id + local id)
//! - [`ObjectTypeId`] / [`AttrId`]: dense schema-assigned identifiers
//! - [`ValueType`] / [`AttributeValue`]: the attribute type tags and the
//!   tagged value union stored per attribute
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`IpPrefix`]: IP network prefixes (plain addresses use [`std::net::IpAddr`])

mod handle;
mod ip;
mod mac;
mod value;

pub use handle::{AttrId, ObjectHandle, ObjectTypeId};
pub use ip::IpPrefix;
pub use mac::MacAddress;
pub use value::{AttributeValue, ValueType};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IP prefix format: {0}")]
    InvalidIpPrefix(String),

    #[error("invalid object handle: {0}")]
    InvalidHandle(String),

    #[error("unknown value type keyword: {0}")]
    InvalidValueType(String),
}
