//! Snapshot value encoding.
//!
//! Everything identity-bearing is written symbolically: enum values by
//! declared name, object references as `<type-fqn>:<handle-bits>`. The
//! numeric handle bits of a reference only contribute the local id on
//! load; the type id half is re-resolved by name.

use swdb_schema::{AttributeMetadata, ModelInfo};
use swdb_types::{AttributeValue, ObjectHandle, ValueType};

/// Encoding of the null object reference.
const NULL_REF: &str = "null";

/// Percent-escapes the characters that would break the line format.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ',' => out.push_str("%2c"),
            '#' => out.push_str("%23"),
            '\n' => out.push_str("%0a"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let hex: String = chars.by_ref().take(2).collect();
        if hex.len() != 2 {
            return Err(format!("truncated escape in {s:?}"));
        }
        let byte =
            u8::from_str_radix(&hex, 16).map_err(|_| format!("bad escape %{hex} in {s:?}"))?;
        out.push(byte as char);
    }
    Ok(out)
}

/// The declared type of the value slot at (attr, extra): list attributes
/// keep their element count as a `U32` at extra 0.
pub(crate) fn slot_type(attr: &AttributeMetadata, extra: u32) -> ValueType {
    if attr.is_list && extra == 0 {
        ValueType::U32
    } else {
        attr.value_type
    }
}

/// Encodes one value for the snapshot.
pub(crate) fn encode_value(
    model: &ModelInfo,
    attr: &AttributeMetadata,
    value: &AttributeValue,
) -> Result<String, String> {
    Ok(match value {
        AttributeValue::Bool(v) => v.to_string(),
        AttributeValue::U8(v) => v.to_string(),
        AttributeValue::U16(v) => v.to_string(),
        AttributeValue::U32(v) => v.to_string(),
        AttributeValue::U64(v) => v.to_string(),
        AttributeValue::I64(v) => v.to_string(),
        // Symbolic where a name exists; an undeclared value is written
        // numerically rather than lost.
        AttributeValue::Enum(v) => match attr.enum_name(*v) {
            Some(name) => name.to_string(),
            None => v.to_string(),
        },
        AttributeValue::Mac(v) => v.to_string(),
        AttributeValue::String(v) => escape(v),
        AttributeValue::Ip(v) => v.to_string(),
        AttributeValue::IpPrefix(v) => v.to_string(),
        AttributeValue::ObjectRef(h) => {
            if h.is_null() {
                NULL_REF.to_string()
            } else {
                let type_name = model
                    .type_name_of(*h)
                    .ok_or_else(|| format!("reference {h} has no type in the current model"))?;
                format!("{type_name}:{h}")
            }
        }
    })
}

/// Decodes one value against the slot's declared type, remapping object
/// references through the current model.
pub(crate) fn decode_value(
    model: &ModelInfo,
    attr: &AttributeMetadata,
    extra: u32,
    text: &str,
) -> Result<AttributeValue, String> {
    let expected = slot_type(attr, extra);
    let bad = |detail: &str| format!("attribute {}: {detail}: {text:?}", attr.fqn);

    Ok(match expected {
        ValueType::Bool => AttributeValue::Bool(
            text.parse().map_err(|_| bad("expected bool"))?,
        ),
        ValueType::U8 => AttributeValue::U8(text.parse().map_err(|_| bad("expected u8"))?),
        ValueType::U16 => AttributeValue::U16(text.parse().map_err(|_| bad("expected u16"))?),
        ValueType::U32 => AttributeValue::U32(text.parse().map_err(|_| bad("expected u32"))?),
        ValueType::U64 => AttributeValue::U64(text.parse().map_err(|_| bad("expected u64"))?),
        ValueType::I64 => AttributeValue::I64(text.parse().map_err(|_| bad("expected i64"))?),
        ValueType::Enum => {
            let value = match attr.enum_value(text) {
                Some(v) => v,
                None => text.parse().map_err(|_| bad("unknown enum name"))?,
            };
            AttributeValue::Enum(value)
        }
        ValueType::Mac => AttributeValue::Mac(text.parse().map_err(|_| bad("expected mac"))?),
        ValueType::String => AttributeValue::String(unescape(text)?),
        ValueType::Ip => AttributeValue::Ip(text.parse().map_err(|_| bad("expected ip"))?),
        ValueType::IpPrefix => {
            AttributeValue::IpPrefix(text.parse().map_err(|_| bad("expected ip prefix"))?)
        }
        ValueType::Object => {
            if text == NULL_REF {
                return Ok(AttributeValue::ObjectRef(ObjectHandle::NULL));
            }
            let (type_name, bits) = text
                .rsplit_once(':')
                .ok_or_else(|| bad("expected <type>:<handle>"))?;
            let stored: ObjectHandle = bits.parse().map_err(|_| bad("bad handle bits"))?;
            let current = model
                .object_by_name(type_name)
                .ok_or_else(|| format!("reference type {type_name} unknown to the current model"))?;
            AttributeValue::ObjectRef(stored.rehandle(current.id))
        }
    })
}
