//! Object identity: schema-assigned ids and bit-packed handles.
//!
//! A handle encodes the owning object type in its upper bits so that the
//! type is recoverable from the handle alone. Handle values are NOT stable
//! across restarts: type ids may be renumbered between builds, so restored
//! handles are re-derived from the type's name via [`ObjectHandle::rehandle`].

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dense identifier of an object type, assigned in schema document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectTypeId(u16);

impl ObjectTypeId {
    /// Creates a type id from its raw value.
    pub const fn new(raw: u16) -> Self {
        ObjectTypeId(raw)
    }

    /// Returns the raw value.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ObjectTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense identifier of an attribute, unique across the whole schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttrId(u32);

impl AttrId {
    /// Creates an attribute id from its raw value.
    pub const fn new(raw: u32) -> Self {
        AttrId(raw)
    }

    /// Returns the raw value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const TYPE_SHIFT: u32 = 48;
const LOCAL_MASK: u64 = (1 << TYPE_SHIFT) - 1;

/// An opaque object identifier.
///
/// Layout: bits 63..48 hold the [`ObjectTypeId`], bits 47..0 the local id.
/// The bit packing is an internal encoding detail; callers go through
/// [`object_type`](Self::object_type) / [`local_id`](Self::local_id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    /// The null handle.
    pub const NULL: ObjectHandle = ObjectHandle(0);

    /// Builds a handle from a type id and a local id.
    ///
    /// The local id must fit in 48 bits; higher bits are discarded.
    pub const fn new(object_type: ObjectTypeId, local_id: u64) -> Self {
        ObjectHandle(((object_type.as_u16() as u64) << TYPE_SHIFT) | (local_id & LOCAL_MASK))
    }

    /// Reinterprets raw handle bits.
    pub const fn from_raw(raw: u64) -> Self {
        ObjectHandle(raw)
    }

    /// Returns the raw handle bits.
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    /// Returns the object type encoded in the handle.
    pub const fn object_type(&self) -> ObjectTypeId {
        ObjectTypeId::new((self.0 >> TYPE_SHIFT) as u16)
    }

    /// Returns the type-local id.
    pub const fn local_id(&self) -> u64 {
        self.0 & LOCAL_MASK
    }

    /// Re-encodes the handle under a new type id, keeping the local id.
    ///
    /// This is the warm-boot remapping primitive: the local id survives a
    /// restart, the type id is looked up again by name.
    pub const fn rehandle(&self, new_type: ObjectTypeId) -> Self {
        ObjectHandle::new(new_type, self.local_id())
    }

    /// Returns true for the null handle.
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl FromStr for ObjectHandle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| ParseError::InvalidHandle(s.to_string()))?;
        u64::from_str_radix(digits, 16)
            .map(ObjectHandle)
            .map_err(|_| ParseError::InvalidHandle(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pack_unpack() {
        let h = ObjectHandle::new(ObjectTypeId::new(7), 42);
        assert_eq!(h.object_type(), ObjectTypeId::new(7));
        assert_eq!(h.local_id(), 42);
        assert!(!h.is_null());
    }

    #[test]
    fn test_local_id_truncated_to_48_bits() {
        let h = ObjectHandle::new(ObjectTypeId::new(1), u64::MAX);
        assert_eq!(h.local_id(), LOCAL_MASK);
        assert_eq!(h.object_type(), ObjectTypeId::new(1));
    }

    #[test]
    fn test_rehandle_keeps_local_id() {
        let old = ObjectHandle::new(ObjectTypeId::new(3), 9001);
        let new = old.rehandle(ObjectTypeId::new(12));
        assert_eq!(new.local_id(), 9001);
        assert_eq!(new.object_type(), ObjectTypeId::new(12));
        assert_ne!(old.as_raw(), new.as_raw());
    }

    #[test]
    fn test_display_roundtrip() {
        let h = ObjectHandle::new(ObjectTypeId::new(2), 0xabcd);
        let parsed: ObjectHandle = h.to_string().parse().unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn test_parse_rejects_bare_decimal() {
        assert!("12345".parse::<ObjectHandle>().is_err());
        assert!("0xzz".parse::<ObjectHandle>().is_err());
    }

    #[test]
    fn test_null() {
        assert!(ObjectHandle::NULL.is_null());
        assert_eq!(ObjectHandle::default(), ObjectHandle::NULL);
    }
}
