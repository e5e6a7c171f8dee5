//! Warm-boot end-to-end tests.
//!
//! Exercises the full dump/load path: logical round-trips, identity
//! remapping across type-id renumbering, replay ordering and corrupt-line
//! isolation.

use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::io::BufReader;
use swdb_schema::{load_schema_str, ModelInfo, TraceConfig};
use swdb_store::ObjectStore;
use swdb_types::{AttrId, AttributeValue, ObjectHandle};
use swdb_warmboot::{dump, dump_to, load, load_from, LoadResult};

const SCHEMA: &str = r#"
version: 2
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
      - name: overflow_events
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
  - name: device.queue
    class: auto
    priority: 5
    attributes:
      - name: pool_ref
        type: object
        ref_types: [device.buffer_pool]
      - name: port_ref
        type: object
        ref_types: [device.port]
      - name: depth_bytes
        type: u64
        flags: [is_status]
      - name: label
        type: string
    dependencies:
      - { object: device.buffer_pool, attribute: size }
"#;

/// The same schema with the object blocks permuted, so every type id
/// differs from the first model's assignment while all names match.
const SCHEMA_RENUMBERED: &str = r#"
version: 2
objects:
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
  - name: device.queue
    class: auto
    priority: 5
    attributes:
      - name: pool_ref
        type: object
        ref_types: [device.buffer_pool]
      - name: port_ref
        type: object
        ref_types: [device.port]
      - name: depth_bytes
        type: u64
        flags: [is_status]
      - name: label
        type: string
    dependencies:
      - { object: device.buffer_pool, attribute: size }
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
      - name: overflow_events
"#;

static MODEL: Lazy<ModelInfo> = Lazy::new(|| load_schema_str(SCHEMA).unwrap());
static MODEL_RENUMBERED: Lazy<ModelInfo> =
    Lazy::new(|| load_schema_str(SCHEMA_RENUMBERED).unwrap());

fn handle(model: &ModelInfo, type_name: &str, local: u64) -> ObjectHandle {
    ObjectHandle::new(model.object_by_name(type_name).unwrap().id, local)
}

fn attr(model: &ModelInfo, fqn: &str) -> AttrId {
    model.attr_by_fqn(fqn).unwrap().id
}

fn create(model: &ModelInfo, store: &ObjectStore, type_name: &str, local: u64) -> ObjectHandle {
    let h = handle(model, type_name, local);
    let defaults = model.default_values(h.object_type());
    store.create(h, defaults).unwrap();
    h
}

/// Builds the canonical test population: a device, a pool, a port and a
/// queue referencing both.
fn populated_store(model: &ModelInfo) -> ObjectStore {
    let store = ObjectStore::new();

    let d1 = create(model, &store, "device", 1);
    let p1 = create(model, &store, "device.buffer_pool", 1);
    let t1 = create(model, &store, "device.port", 1);
    let q1 = create(model, &store, "device.queue", 1);

    store
        .set(d1, attr(model, "device.mac"), 0, AttributeValue::Mac("02:42:ac:11:00:02".parse().unwrap()))
        .unwrap();
    store
        .set(p1, attr(model, "device.buffer_pool.size"), 0, AttributeValue::U64(4096))
        .unwrap();
    store
        .set(t1, attr(model, "device.port.speed"), 0, AttributeValue::U32(25000))
        .unwrap();
    store
        .set(t1, attr(model, "device.port.device_ref"), 0, AttributeValue::ObjectRef(d1))
        .unwrap();
    store
        .set_list(
            t1,
            attr(model, "device.port.lanes"),
            vec![
                AttributeValue::U32(4),
                AttributeValue::U32(5),
                AttributeValue::U32(6),
                AttributeValue::U32(7),
            ],
        )
        .unwrap();
    store
        .set(q1, attr(model, "device.queue.pool_ref"), 0, AttributeValue::ObjectRef(p1))
        .unwrap();
    store
        .set(q1, attr(model, "device.queue.port_ref"), 0, AttributeValue::ObjectRef(t1))
        .unwrap();
    store
        .set(q1, attr(model, "device.queue.depth_bytes"), 0, AttributeValue::U64(777))
        .unwrap();
    store
        .set(
            q1,
            attr(model, "device.queue.label"),
            0,
            AttributeValue::String("uplink, lossless #1".to_string()),
        )
        .unwrap();

    store
}

type Logical = BTreeMap<(String, u64), BTreeMap<(String, u32), String>>;

/// Projects a store into a model-independent form: objects keyed by
/// (type name, local id), values by (attribute fqn, extra), references
/// rendered as (type name, local id). Two stores with equal projections
/// hold identical logical records whatever the numeric ids are.
fn logical_state(model: &ModelInfo, store: &ObjectStore) -> Logical {
    let mut out = Logical::new();
    for (h, values) in store.snapshot() {
        let type_name = model.type_name_of(h).unwrap().to_string();
        let mut object = BTreeMap::new();
        for (attr_id, extra, value) in values {
            let meta = model.attr(attr_id).unwrap();
            let rendered = match value.as_object_ref() {
                Some(target) if !target.is_null() => format!(
                    "ref:{}:{}",
                    model.type_name_of(target).unwrap(),
                    target.local_id()
                ),
                _ => format!("{value:?}"),
            };
            object.insert((meta.fqn.clone(), extra), rendered);
        }
        out.insert((type_name, h.local_id()), object);
    }
    out
}

fn dump_to_string(model: &ModelInfo, store: &ObjectStore) -> String {
    let mut buf = Vec::new();
    dump_to(store, model, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

fn load_str(model: &ModelInfo, text: &str) -> LoadResult {
    load_from(model, &TraceConfig::new(), BufReader::new(text.as_bytes())).unwrap()
}

#[test]
fn test_round_trip_same_model() {
    let model = &*MODEL;
    let store = populated_store(model);
    let text = dump_to_string(model, &store);
    let result = load_str(model, &text);

    assert_eq!(result.loaded, 4);
    assert_eq!(result.skipped, 0);

    let mut expected = logical_state(model, &store);
    // Status attributes come back as zero.
    let q1 = expected
        .get_mut(&("device.queue".to_string(), 1))
        .unwrap();
    q1.insert(
        ("device.queue.depth_bytes".to_string(), 0),
        format!("{:?}", AttributeValue::U64(0)),
    );
    assert_eq!(logical_state(model, &result.store), expected);
}

#[test]
fn test_id_independence_across_renumbering() {
    let model_a = &*MODEL;
    let model_b = &*MODEL_RENUMBERED;

    // The renumbered model really does assign different numeric ids.
    let pool_a = model_a.object_by_name("device.buffer_pool").unwrap().id;
    let pool_b = model_b.object_by_name("device.buffer_pool").unwrap().id;
    assert_ne!(pool_a, pool_b);

    let store = populated_store(model_a);
    let text = dump_to_string(model_a, &store);
    let result = load_str(model_b, &text);
    assert_eq!(result.loaded, 4);

    // Q1's pool_ref still resolves to the logical pool with P1's values.
    let q1 = handle(model_b, "device.queue", 1);
    let pool_ref = result
        .store
        .get(q1, attr(model_b, "device.queue.pool_ref"), 0)
        .unwrap()
        .as_object_ref()
        .unwrap();
    assert_eq!(pool_ref.object_type(), pool_b);
    assert_eq!(pool_ref.local_id(), 1);
    assert_eq!(
        result
            .store
            .get(pool_ref, attr(model_b, "device.buffer_pool.size"), 0)
            .unwrap(),
        AttributeValue::U64(4096)
    );

    // Whole-store logical equality, modulo the status reset.
    let mut expected = logical_state(model_a, &store);
    expected
        .get_mut(&("device.queue".to_string(), 1))
        .unwrap()
        .insert(
            ("device.queue.depth_bytes".to_string(), 0),
            format!("{:?}", AttributeValue::U64(0)),
        );
    assert_eq!(logical_state(model_b, &result.store), expected);
}

#[test]
fn test_replay_order_puts_references_first() {
    let model = &*MODEL;
    let store = populated_store(model);
    let text = dump_to_string(model, &store);
    let result = load_str(model, &text);

    let position: BTreeMap<ObjectHandle, usize> = result
        .replay_order
        .iter()
        .enumerate()
        .map(|(i, &h)| (h, i))
        .collect();

    let q1 = handle(model, "device.queue", 1);
    let p1 = handle(model, "device.buffer_pool", 1);
    let t1 = handle(model, "device.port", 1);
    assert!(position[&p1] < position[&q1]);
    assert!(position[&t1] < position[&q1]);

    // Generic invariant: every non-internal, non-read-only reference
    // (edges into the root sink excluded) precedes its referrer.
    for (h, values) in result.store.snapshot() {
        for (attr_id, _, value) in values {
            let meta = model.attr(attr_id).unwrap();
            if meta.flags.internal || meta.flags.read_only {
                continue;
            }
            let Some(target) = value.as_object_ref() else {
                continue;
            };
            if target.is_null() || model.root_type() == Some(target.object_type()) {
                continue;
            }
            assert!(
                position[&target] < position[&h],
                "{target} must precede {h}"
            );
        }
    }
}

#[test]
fn test_status_attributes_reset_on_load() {
    let model = &*MODEL;
    let store = populated_store(model);
    let result = load_str(model, &dump_to_string(model, &store));

    let q1 = handle(model, "device.queue", 1);
    assert_eq!(
        result
            .store
            .get(q1, attr(model, "device.queue.depth_bytes"), 0)
            .unwrap(),
        AttributeValue::U64(0)
    );
}

#[test]
fn test_symbolic_encodings_in_snapshot_text() {
    let model = &*MODEL;
    let store = populated_store(model);
    let text = dump_to_string(model, &store);

    // Enum by name, not ordinal.
    assert!(text.contains("device.buffer_pool.mode#0#dynamic"));
    // References carry the referenced type's name.
    assert!(text.contains("device.queue.pool_ref#0#device.buffer_pool:0x"));
    // Separators inside string values are escaped.
    assert!(text.contains("uplink%2c lossless %231"));
}

#[test]
fn test_corrupt_lines_skipped_rest_loads() {
    let model = &*MODEL;
    let store = populated_store(model);
    let mut text = dump_to_string(model, &store);

    text.push_str("complete garbage\n");
    text.push_str("no.such.type:0x0001000000000009,device.mac#0#00:00:00:00:00:01\n");
    // Valid header, unknown attribute: the whole record is dropped.
    text.push_str("device.buffer_pool:0x0001000000000099,device.buffer_pool.no_such#0#1\n");
    // Valid header, value that does not parse as the declared type.
    text.push_str("device.buffer_pool:0x0001000000000098,device.buffer_pool.size#0#banana\n");

    let result = load_str(model, &text);
    assert_eq!(result.loaded, 4);
    assert_eq!(result.skipped, 4);
}

#[test]
fn test_dangling_reference_is_kept_not_fatal() {
    let model = &*MODEL;
    let store = populated_store(model);
    let text = dump_to_string(model, &store);

    // Drop the pool's own line; the queue still references it.
    let without_pool: String = text
        .lines()
        .filter(|l| !l.starts_with("device.buffer_pool:"))
        .map(|l| format!("{l}\n"))
        .collect();

    let result = load_str(model, &without_pool);
    assert_eq!(result.loaded, 3);

    let q1 = handle(model, "device.queue", 1);
    let pool_ref = result
        .store
        .get(q1, attr(model, "device.queue.pool_ref"), 0)
        .unwrap()
        .as_object_ref()
        .unwrap();
    assert_eq!(pool_ref.local_id(), 1);
    assert!(!result.store.contains(pool_ref));
}

#[test]
fn test_dump_is_deterministic() {
    let model = &*MODEL;
    let store = populated_store(model);
    assert_eq!(dump_to_string(model, &store), dump_to_string(model, &store));
}

#[test]
fn test_file_roundtrip() {
    let model = &*MODEL;
    let store = populated_store(model);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.dump");
    dump(&store, model, &path).unwrap();

    let result = load(model, &TraceConfig::new(), &path).unwrap();
    assert_eq!(result.loaded, 4);

    assert!(load(model, &TraceConfig::new(), dir.path().join("missing.dump")).is_err());
}

#[test]
fn test_list_values_roundtrip_elementwise() {
    let model = &*MODEL;
    let store = populated_store(model);
    let text = dump_to_string(model, &store);

    // Length at extra 0, elements at 1..=len.
    assert!(text.contains("device.port.lanes#0#4"));
    assert!(text.contains("device.port.lanes#1#4"));
    assert!(text.contains("device.port.lanes#4#7"));

    let result = load_str(model, &text);
    let t1 = handle(model, "device.port", 1);
    assert_eq!(
        result
            .store
            .get_list(t1, attr(model, "device.port.lanes"))
            .unwrap(),
        vec![
            AttributeValue::U32(4),
            AttributeValue::U32(5),
            AttributeValue::U32(6),
            AttributeValue::U32(7),
        ]
    );
}
