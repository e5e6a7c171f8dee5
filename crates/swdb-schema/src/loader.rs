//! Two-pass schema loader.
//!
//! Pass 1 allocates dense ids for every object type and attribute in
//! document order and records flags, enum spaces and defaults. A dedicated
//! id-space check runs between the passes. Pass 2 resolves every
//! cross-reference (allowed referenced types, dependencies, membership,
//! key groups), because a referenced type's id may not exist yet during
//! pass 1.

use crate::depgraph;
use crate::document::{AttributeDoc, ClassDoc, ObjectDoc, SchemaDoc};
use crate::error::{SchemaError, SchemaResult};
use crate::metadata::{
    AttrFlags, AttributeMetadata, CliMetadata, DependencyDecl, EnumEntry, KeyGroup, ObjectClass,
    ObjectInfo,
};
use crate::model::ModelInfo;
use crate::INTERNAL_OBJECT_ATTR;
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;
use swdb_types::{AttrId, AttributeValue, ObjectTypeId, ValueType};

/// Loads and validates a schema document from a file.
pub fn load_schema_file<P: AsRef<Path>>(path: P) -> SchemaResult<ModelInfo> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_schema_str(&text)
}

/// Loads and validates a schema document from a string.
pub fn load_schema_str(text: &str) -> SchemaResult<ModelInfo> {
    let doc: SchemaDoc = serde_yaml::from_str(text)?;
    build(doc)
}

fn build(doc: SchemaDoc) -> SchemaResult<ModelInfo> {
    if doc.objects.len() > u16::MAX as usize {
        return Err(SchemaError::TooManyObjectTypes {
            count: doc.objects.len(),
        });
    }

    // ---- Pass 1: allocate ids, record per-attribute metadata ----

    let mut objects: Vec<ObjectInfo> = Vec::with_capacity(doc.objects.len());
    let mut attrs: Vec<AttributeMetadata> = Vec::new();
    let mut type_by_name: HashMap<String, ObjectTypeId> = HashMap::new();
    // Per-type local attribute name -> id, for pass-2 resolution.
    let mut local_attrs: Vec<HashMap<String, AttrId>> = Vec::with_capacity(doc.objects.len());
    let mut root: Option<ObjectTypeId> = None;

    for (index, object_doc) in doc.objects.iter().enumerate() {
        let type_id = ObjectTypeId::new(index as u16);
        if type_by_name
            .insert(object_doc.name.clone(), type_id)
            .is_some()
        {
            return Err(SchemaError::DuplicateObjectType {
                name: object_doc.name.clone(),
            });
        }

        if object_doc.root {
            if let Some(first) = root {
                return Err(SchemaError::MultipleRoots {
                    first: objects[first.as_u16() as usize].name.clone(),
                    second: object_doc.name.clone(),
                });
            }
            root = Some(type_id);
        }

        let class = class_of(object_doc.class);
        let mut locals: HashMap<String, AttrId> = HashMap::new();
        let mut attr_ids: Vec<AttrId> = Vec::new();

        for attr_doc in &object_doc.attributes {
            let id = AttrId::new(attrs.len() as u32);
            let attr = build_attribute(object_doc, attr_doc, type_id, id, class)?;
            if locals.insert(attr.name.clone(), id).is_some() {
                return Err(SchemaError::DuplicateAttribute {
                    object: object_doc.name.clone(),
                    name: attr.name.clone(),
                });
            }
            attr_ids.push(id);
            attrs.push(attr);
        }

        for counter_doc in &object_doc.counters {
            let id = AttrId::new(attrs.len() as u32);
            reject_reserved(&object_doc.name, &counter_doc.name)?;
            if locals.insert(counter_doc.name.clone(), id).is_some() {
                return Err(SchemaError::DuplicateAttribute {
                    object: object_doc.name.clone(),
                    name: counter_doc.name.clone(),
                });
            }
            attr_ids.push(id);
            attrs.push(AttributeMetadata {
                id,
                name: counter_doc.name.clone(),
                fqn: format!("{}.{}", object_doc.name, counter_doc.name),
                object_type: type_id,
                value_type: ValueType::U64,
                is_list: false,
                flags: AttrFlags::counter(),
                default: AttributeValue::U64(0),
                ref_types: vec![],
                enum_values: vec![],
            });
        }

        // Every type gains the hidden side-effect-creation marker.
        let hidden_id = AttrId::new(attrs.len() as u32);
        locals.insert(INTERNAL_OBJECT_ATTR.to_string(), hidden_id);
        attr_ids.push(hidden_id);
        attrs.push(AttributeMetadata {
            id: hidden_id,
            name: INTERNAL_OBJECT_ATTR.to_string(),
            fqn: format!("{}.{}", object_doc.name, INTERNAL_OBJECT_ATTR),
            object_type: type_id,
            value_type: ValueType::Bool,
            is_list: false,
            flags: AttrFlags::hidden_internal(),
            default: AttributeValue::Bool(false),
            ref_types: vec![],
            enum_values: vec![],
        });

        local_attrs.push(locals);
        objects.push(ObjectInfo {
            id: type_id,
            name: object_doc.name.clone(),
            class,
            priority: object_doc.priority,
            root: object_doc.root,
            attrs: attr_ids,
            dependencies: vec![],
            members: vec![],
            key_groups: vec![],
            cli: object_doc.cli.as_ref().map(|c| CliMetadata {
                name: c.name.clone(),
                help: c.help.clone(),
            }),
        });
    }

    // ---- Id collision check: dedicated step before any cross-reference
    // resolution is attempted. ----
    let attr_by_fqn = verify_id_spaces(&attrs)?;

    // ---- Pass 2: resolve cross-references ----

    for (index, object_doc) in doc.objects.iter().enumerate() {
        for (attr_doc, &attr_id) in object_doc
            .attributes
            .iter()
            .zip(objects[index].attrs.iter())
        {
            if attr_doc.ref_types.is_empty() {
                continue;
            }
            let mut resolved = Vec::with_capacity(attr_doc.ref_types.len());
            for name in &attr_doc.ref_types {
                let target =
                    *type_by_name
                        .get(name)
                        .ok_or_else(|| SchemaError::UnresolvedObjectType {
                            name: name.clone(),
                            context: format!("ref_types of {}", attrs[attr_id.as_u32() as usize].fqn),
                        })?;
                resolved.push(target);
            }
            attrs[attr_id.as_u32() as usize].ref_types = resolved;
        }

        if !object_doc.dependencies.is_empty() && objects[index].class != ObjectClass::Auto {
            return Err(SchemaError::DependencyOnNonAuto {
                object: object_doc.name.clone(),
            });
        }
        for dep in &object_doc.dependencies {
            let target_type =
                *type_by_name
                    .get(&dep.object)
                    .ok_or_else(|| SchemaError::UnresolvedObjectType {
                        name: dep.object.clone(),
                        context: format!("dependency of {}", object_doc.name),
                    })?;
            let target_attr = *local_attrs[target_type.as_u16() as usize]
                .get(&dep.attribute)
                .ok_or_else(|| SchemaError::UnresolvedAttribute {
                    object: dep.object.clone(),
                    name: dep.attribute.clone(),
                    context: format!("dependency of {}", object_doc.name),
                })?;
            objects[index].dependencies.push(DependencyDecl {
                target_type,
                target_attr,
            });
        }

        for member in &object_doc.membership {
            let target =
                *type_by_name
                    .get(member)
                    .ok_or_else(|| SchemaError::UnresolvedObjectType {
                        name: member.clone(),
                        context: format!("membership of {}", object_doc.name),
                    })?;
            objects[index].members.push(target);
        }

        for group_doc in &object_doc.key_groups {
            if objects[index].key_group(&group_doc.name).is_some() {
                return Err(SchemaError::InvalidKeyGroup {
                    object: object_doc.name.clone(),
                    group: group_doc.name.clone(),
                    detail: "duplicate group name".to_string(),
                });
            }
            let mut group_attrs = Vec::with_capacity(group_doc.attributes.len());
            for name in &group_doc.attributes {
                let id = *local_attrs[index].get(name).ok_or_else(|| {
                    SchemaError::UnresolvedAttribute {
                        object: object_doc.name.clone(),
                        name: name.clone(),
                        context: format!("key group {}", group_doc.name),
                    }
                })?;
                if group_attrs.contains(&id) {
                    return Err(SchemaError::InvalidKeyGroup {
                        object: object_doc.name.clone(),
                        group: group_doc.name.clone(),
                        detail: format!("attribute {name} listed twice"),
                    });
                }
                group_attrs.push(id);
            }
            objects[index].key_groups.push(KeyGroup {
                name: group_doc.name.clone(),
                attrs: group_attrs,
            });
        }
    }

    let graph = depgraph::compute(&objects, &attrs);

    info!(
        "schema v{} loaded: {} object types, {} attributes",
        doc.version,
        objects.len(),
        attrs.len()
    );
    debug!(
        "root type: {:?}",
        root.map(|t| objects[t.as_u16() as usize].name.as_str())
    );

    Ok(ModelInfo {
        version: doc.version,
        objects,
        attrs,
        type_by_name,
        attr_by_fqn,
        root,
        graph,
    })
}

fn class_of(doc: ClassDoc) -> ObjectClass {
    match doc {
        ClassDoc::User => ObjectClass::User,
        ClassDoc::Auto => ObjectClass::Auto,
        ClassDoc::None => ObjectClass::None,
    }
}

fn reject_reserved(object: &str, name: &str) -> SchemaResult<()> {
    if name == INTERNAL_OBJECT_ATTR {
        return Err(SchemaError::ReservedAttributeName {
            object: object.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn build_attribute(
    object_doc: &ObjectDoc,
    attr_doc: &AttributeDoc,
    type_id: ObjectTypeId,
    id: AttrId,
    class: ObjectClass,
) -> SchemaResult<AttributeMetadata> {
    let fqn = format!("{}.{}", object_doc.name, attr_doc.name);
    reject_reserved(&object_doc.name, &attr_doc.name)?;

    let value_type: ValueType =
        attr_doc
            .value_type
            .parse()
            .map_err(|_| SchemaError::UnknownValueType {
                attr: fqn.clone(),
                keyword: attr_doc.value_type.clone(),
            })?;

    let flags = AttrFlags::from_keywords(&attr_doc.flags).map_err(|flag| {
        SchemaError::UnknownFlag {
            attr: fqn.clone(),
            flag,
        }
    })?;
    check_flag_conflicts(&fqn, &flags)?;
    if flags.re_evaluate && class != ObjectClass::User {
        return Err(SchemaError::ReEvaluateOnNonUser { attr: fqn });
    }

    let enum_values = build_enum_values(&fqn, value_type, attr_doc)?;

    if value_type == ValueType::Object {
        if attr_doc.ref_types.is_empty() {
            return Err(SchemaError::MissingRefTypes { attr: fqn });
        }
    } else if !attr_doc.ref_types.is_empty() {
        return Err(SchemaError::InvalidAttribute {
            attr: fqn,
            detail: "ref_types on a non-object attribute".to_string(),
        });
    }

    let default = coerce_default(&fqn, value_type, attr_doc, &enum_values)?;

    Ok(AttributeMetadata {
        id,
        name: attr_doc.name.clone(),
        fqn,
        object_type: type_id,
        value_type,
        is_list: attr_doc.list,
        flags,
        default,
        // Names resolved in pass 2.
        ref_types: vec![],
        enum_values,
    })
}

fn check_flag_conflicts(fqn: &str, flags: &AttrFlags) -> SchemaResult<()> {
    let restricted = flags.immutable || flags.read_only || flags.internal;
    if flags.mandatory && restricted {
        return Err(SchemaError::FlagConflict {
            attr: fqn.to_string(),
            detail: "mandatory combined with immutable/read_only/internal".to_string(),
        });
    }
    if flags.create_only && restricted {
        return Err(SchemaError::FlagConflict {
            attr: fqn.to_string(),
            detail: "create_only combined with immutable/read_only/internal".to_string(),
        });
    }
    Ok(())
}

fn build_enum_values(
    fqn: &str,
    value_type: ValueType,
    attr_doc: &AttributeDoc,
) -> SchemaResult<Vec<EnumEntry>> {
    if value_type != ValueType::Enum {
        if !attr_doc.values.is_empty() {
            return Err(SchemaError::InvalidEnum {
                attr: fqn.to_string(),
                detail: "values on a non-enum attribute".to_string(),
            });
        }
        return Ok(vec![]);
    }
    if attr_doc.values.is_empty() {
        return Err(SchemaError::InvalidEnum {
            attr: fqn.to_string(),
            detail: "enum attribute declares no values".to_string(),
        });
    }
    let mut entries = Vec::with_capacity(attr_doc.values.len());
    for entry in &attr_doc.values {
        if entries.iter().any(|e: &EnumEntry| e.name == entry.name) {
            return Err(SchemaError::InvalidEnum {
                attr: fqn.to_string(),
                detail: format!("duplicate name {}", entry.name),
            });
        }
        if entries.iter().any(|e: &EnumEntry| e.value == entry.value) {
            return Err(SchemaError::InvalidEnum {
                attr: fqn.to_string(),
                detail: format!("duplicate value {}", entry.value),
            });
        }
        entries.push(EnumEntry {
            value: entry.value,
            name: entry.name.clone(),
        });
    }
    Ok(entries)
}

fn coerce_default(
    fqn: &str,
    value_type: ValueType,
    attr_doc: &AttributeDoc,
    enum_values: &[EnumEntry],
) -> SchemaResult<AttributeValue> {
    let invalid = |detail: String| SchemaError::InvalidDefault {
        attr: fqn.to_string(),
        detail,
    };

    if attr_doc.list {
        if attr_doc.default.is_some() {
            return Err(invalid("list attributes take no default".to_string()));
        }
        // The length slot at extra = 0; an empty list.
        return Ok(AttributeValue::U32(0));
    }

    let Some(raw) = &attr_doc.default else {
        // Enums default to their first declared entry; everything else to
        // the type's zero value.
        if value_type == ValueType::Enum {
            return Ok(AttributeValue::Enum(enum_values[0].value));
        }
        return Ok(AttributeValue::zeroed(value_type));
    };

    let as_str = || {
        raw.as_str()
            .ok_or_else(|| invalid(format!("expected a string, got {raw:?}")))
    };
    let as_uint = |max: u64| {
        raw.as_u64()
            .filter(|&v| v <= max)
            .ok_or_else(|| invalid(format!("expected an unsigned integer <= {max}, got {raw:?}")))
    };

    Ok(match value_type {
        ValueType::Bool => AttributeValue::Bool(
            raw.as_bool()
                .ok_or_else(|| invalid(format!("expected a bool, got {raw:?}")))?,
        ),
        ValueType::U8 => AttributeValue::U8(as_uint(u8::MAX as u64)? as u8),
        ValueType::U16 => AttributeValue::U16(as_uint(u16::MAX as u64)? as u16),
        ValueType::U32 => AttributeValue::U32(as_uint(u32::MAX as u64)? as u32),
        ValueType::U64 => AttributeValue::U64(as_uint(u64::MAX)?),
        ValueType::I64 => AttributeValue::I64(
            raw.as_i64()
                .ok_or_else(|| invalid(format!("expected an integer, got {raw:?}")))?,
        ),
        ValueType::Enum => {
            let value = if let Some(name) = raw.as_str() {
                enum_values
                    .iter()
                    .find(|e| e.name == name)
                    .map(|e| e.value)
                    .ok_or_else(|| invalid(format!("unknown enum name {name}")))?
            } else if let Some(v) = raw.as_i64() {
                enum_values
                    .iter()
                    .find(|e| e.value == v)
                    .map(|e| e.value)
                    .ok_or_else(|| invalid(format!("undeclared enum value {v}")))?
            } else {
                return Err(invalid(format!("expected an enum name or value, got {raw:?}")));
            };
            AttributeValue::Enum(value)
        }
        ValueType::Mac => AttributeValue::Mac(
            as_str()?
                .parse()
                .map_err(|e| invalid(format!("{e}")))?,
        ),
        ValueType::String => AttributeValue::String(as_str()?.to_string()),
        ValueType::Ip => AttributeValue::Ip(
            as_str()?
                .parse()
                .map_err(|_| invalid(format!("invalid IP address {raw:?}")))?,
        ),
        ValueType::IpPrefix => AttributeValue::IpPrefix(
            as_str()?
                .parse()
                .map_err(|e| invalid(format!("{e}")))?,
        ),
        ValueType::Object => {
            return Err(invalid(
                "object-reference attributes default to the null handle".to_string(),
            ));
        }
    })
}

/// Checks the whole attribute id space for collisions and builds the
/// fqn -> id map. Runs after pass 1 and before any cross-reference
/// resolution, so a broken id space fails fast.
fn verify_id_spaces(attrs: &[AttributeMetadata]) -> SchemaResult<HashMap<String, AttrId>> {
    let mut by_id: HashMap<u32, &str> = HashMap::with_capacity(attrs.len());
    let mut by_fqn: HashMap<String, AttrId> = HashMap::with_capacity(attrs.len());
    for attr in attrs {
        if let Some(first) = by_id.insert(attr.id.as_u32(), &attr.fqn) {
            return Err(SchemaError::IdCollision {
                id: attr.id.as_u32(),
                first: first.to_string(),
                second: attr.fqn.clone(),
            });
        }
        if by_fqn.insert(attr.fqn.clone(), attr.id).is_some() {
            return Err(SchemaError::DuplicateAttribute {
                object: attr
                    .fqn
                    .rsplit_once('.')
                    .map(|(o, _)| o.to_string())
                    .unwrap_or_default(),
                name: attr.name.clone(),
            });
        }
    }
    Ok(by_fqn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"
version: 1
objects:
  - name: device
    class: none
    root: true
    attributes:
      - name: mac
        type: mac
  - name: device.buffer_pool
    class: user
    priority: 10
    attributes:
      - name: size
        type: u64
        flags: [mandatory]
      - name: mode
        type: enum
        default: dynamic
        values:
          - { value: 0, name: static }
          - { value: 1, name: dynamic }
    counters:
      - name: watermark_bytes
  - name: device.port
    class: user
    priority: 20
    attributes:
      - name: speed
        type: u32
        flags: [create_only]
        default: 100000
      - name: device_ref
        type: object
        ref_types: [device]
      - name: lanes
        type: u32
        list: true
    key_groups:
      - name: by_speed
        attributes: [speed]
    cli: { name: port, help: Physical port }
  - name: device.queue
    class: auto
    priority: 5
    attributes:
      - name: port_ref
        type: object
        ref_types: [device.port]
      - name: pool_ref
        type: object
        ref_types: [device.buffer_pool]
      - name: depth_bytes
        type: u64
        flags: [is_status]
    dependencies:
      - { object: device.buffer_pool, attribute: size }
    membership: [device.port]
"#;

    #[test]
    fn test_loads_valid_schema() {
        let model = load_schema_str(SCHEMA).unwrap();
        assert_eq!(model.version(), 1);
        assert_eq!(model.num_types(), 4);

        let pool = model.object_by_name("device.buffer_pool").unwrap();
        assert_eq!(pool.class, ObjectClass::User);
        assert_eq!(pool.priority, 10);
        // size, mode, watermark_bytes counter, hidden internal_object
        assert_eq!(pool.attrs.len(), 4);
    }

    #[test]
    fn test_ids_dense_in_document_order() {
        let model = load_schema_str(SCHEMA).unwrap();
        for (i, object) in model.objects().iter().enumerate() {
            assert_eq!(object.id, ObjectTypeId::new(i as u16));
        }
        for (i, attr) in model.attrs().iter().enumerate() {
            assert_eq!(attr.id, AttrId::new(i as u32));
        }
        // device block comes first, so its attribute ids precede the pool's.
        let mac = model.attr_by_fqn("device.mac").unwrap();
        let size = model.attr_by_fqn("device.buffer_pool.size").unwrap();
        assert!(mac.id < size.id);
    }

    #[test]
    fn test_hidden_attribute_on_every_type() {
        let model = load_schema_str(SCHEMA).unwrap();
        for object in model.objects() {
            let hidden = model
                .attr_by_fqn(&format!("{}.{}", object.name, INTERNAL_OBJECT_ATTR))
                .unwrap();
            assert!(hidden.flags.internal);
            assert!(hidden.flags.immutable);
            assert_eq!(hidden.default, AttributeValue::Bool(false));
            assert_eq!(hidden.value_type, ValueType::Bool);
        }
    }

    #[test]
    fn test_counter_becomes_readonly_u64() {
        let model = load_schema_str(SCHEMA).unwrap();
        let counter = model
            .attr_by_fqn("device.buffer_pool.watermark_bytes")
            .unwrap();
        assert_eq!(counter.value_type, ValueType::U64);
        assert!(counter.flags.counter);
        assert!(counter.flags.read_only);
        assert_eq!(counter.default, AttributeValue::U64(0));
    }

    #[test]
    fn test_defaults_coerced() {
        let model = load_schema_str(SCHEMA).unwrap();
        let speed = model.attr_by_fqn("device.port.speed").unwrap();
        assert_eq!(speed.default, AttributeValue::U32(100_000));

        let mode = model.attr_by_fqn("device.buffer_pool.mode").unwrap();
        assert_eq!(mode.default, AttributeValue::Enum(1));

        // Undeclared default falls back to the zero value; enums to their
        // first entry; lists to an empty length slot.
        let mac = model.attr_by_fqn("device.mac").unwrap();
        assert_eq!(mac.default, AttributeValue::zeroed(ValueType::Mac));
        let lanes = model.attr_by_fqn("device.port.lanes").unwrap();
        assert!(lanes.is_list);
        assert_eq!(lanes.default, AttributeValue::U32(0));
    }

    #[test]
    fn test_pass2_resolutions() {
        let model = load_schema_str(SCHEMA).unwrap();
        let device = model.object_by_name("device").unwrap().id;
        let port = model.object_by_name("device.port").unwrap();
        let pool = model.object_by_name("device.buffer_pool").unwrap().id;
        let queue = model.object_by_name("device.queue").unwrap();

        let device_ref = model.attr_by_fqn("device.port.device_ref").unwrap();
        assert_eq!(device_ref.ref_types, vec![device]);

        let size = model.attr_by_fqn("device.buffer_pool.size").unwrap();
        assert_eq!(
            queue.dependencies,
            vec![DependencyDecl {
                target_type: pool,
                target_attr: size.id
            }]
        );
        assert_eq!(queue.members, vec![port.id]);

        let group = port.key_group("by_speed").unwrap();
        assert_eq!(group.attrs, vec![model.attr_by_fqn("device.port.speed").unwrap().id]);
    }

    #[test]
    fn test_default_values_for_create() {
        let model = load_schema_str(SCHEMA).unwrap();
        let pool = model.object_by_name("device.buffer_pool").unwrap();
        let defaults = model.default_values(pool.id);
        assert_eq!(defaults.len(), pool.attrs.len());
        assert!(defaults.iter().all(|(_, extra, _)| *extra == 0));
        let size = model.attr_by_fqn("device.buffer_pool.size").unwrap();
        assert!(defaults
            .iter()
            .any(|(id, _, v)| *id == size.id && *v == AttributeValue::U64(0)));
    }

    #[test]
    fn test_root_type() {
        let model = load_schema_str(SCHEMA).unwrap();
        let device = model.object_by_name("device").unwrap();
        assert_eq!(model.root_type(), Some(device.id));
    }

    fn minimal_object(body: &str) -> String {
        format!("version: 1\nobjects:\n{body}")
    }

    #[test]
    fn test_mandatory_immutable_conflict_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: u32
        flags: [mandatory, immutable]
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::FlagConflict { .. }
        ));
    }

    #[test]
    fn test_create_only_readonly_conflict_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: u32
        flags: [create_only, read_only]
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::FlagConflict { .. }
        ));
    }

    #[test]
    fn test_unknown_type_keyword_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: float
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::UnknownValueType { .. }
        ));
    }

    #[test]
    fn test_unknown_flag_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: u32
        flags: [writable]
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::UnknownFlag { .. }
        ));
    }

    #[test]
    fn test_duplicate_attribute_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: u32
      - name: a
        type: u64
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::DuplicateAttribute { .. }
        ));
    }

    #[test]
    fn test_duplicate_type_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
  - name: t
    class: user
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::DuplicateObjectType { .. }
        ));
    }

    #[test]
    fn test_enum_without_values_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: enum
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::InvalidEnum { .. }
        ));
    }

    #[test]
    fn test_object_without_ref_types_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: object
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::MissingRefTypes { .. }
        ));
    }

    #[test]
    fn test_unresolved_ref_type_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: object
        ref_types: [nonexistent]
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::UnresolvedObjectType { .. }
        ));
    }

    #[test]
    fn test_re_evaluate_on_auto_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: auto
    attributes:
      - name: a
        type: u32
        flags: [re_evaluate]
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::ReEvaluateOnNonUser { .. }
        ));
    }

    #[test]
    fn test_dependency_on_user_class_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: u32
    dependencies:
      - { object: t, attribute: a }
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::DependencyOnNonAuto { .. }
        ));
    }

    #[test]
    fn test_multiple_roots_fail() {
        let text = minimal_object(
            r#"
  - name: a
    class: none
    root: true
  - name: b
    class: none
    root: true
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::MultipleRoots { .. }
        ));
    }

    #[test]
    fn test_reserved_name_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: internal_object
        type: bool
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::ReservedAttributeName { .. }
        ));
    }

    #[test]
    fn test_list_default_fails() {
        let text = minimal_object(
            r#"
  - name: t
    class: user
    attributes:
      - name: a
        type: u32
        list: true
        default: 4
"#,
        );
        assert!(matches!(
            load_schema_str(&text).unwrap_err(),
            SchemaError::InvalidDefault { .. }
        ));
    }

    #[test]
    fn test_malformed_document_fails() {
        assert!(matches!(
            load_schema_str("version: [not an int]").unwrap_err(),
            SchemaError::Document(_)
        ));
        // Unknown top-level keys are rejected too.
        assert!(load_schema_str("version: 1\nobjects: []\nextra: 1").is_err());
    }
}
