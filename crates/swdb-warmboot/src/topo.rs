//! Topological replay ordering of restored instances.
//!
//! Vertices are restored objects, edges "A references B" drawn from
//! object-reference values, excluding attributes flagged `internal` or
//! `read_only` and excluding edges into the designated root type (a known
//! sink that never participates in reference cycles). The depth-first
//! sort pushes children before self, so every object comes after
//! everything it references. Cycles are a defect in the source data: they
//! are logged, broken at the revisit point and the walk continues.

use log::{error, warn};
use std::collections::HashMap;
use swdb_schema::ModelInfo;
use swdb_store::ObjectStore;
use swdb_types::{AttrId, AttributeValue, ObjectHandle};

type Values = Vec<(AttrId, u32, AttributeValue)>;

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

/// Computes the creation order for a set of restored objects.
pub(crate) fn replay_order(
    model: &ModelInfo,
    objects: &HashMap<ObjectHandle, Values>,
) -> Vec<ObjectHandle> {
    let adjacency = build_adjacency(model, objects);

    let mut roots: Vec<ObjectHandle> = objects.keys().copied().collect();
    roots.sort();

    let mut marks: HashMap<ObjectHandle, Mark> = HashMap::with_capacity(objects.len());
    let mut order: Vec<ObjectHandle> = Vec::with_capacity(objects.len());
    for handle in roots {
        visit(handle, &adjacency, &mut marks, &mut order);
    }
    order
}

fn build_adjacency(
    model: &ModelInfo,
    objects: &HashMap<ObjectHandle, Values>,
) -> HashMap<ObjectHandle, Vec<ObjectHandle>> {
    let root_type = model.root_type();
    let mut adjacency: HashMap<ObjectHandle, Vec<ObjectHandle>> =
        HashMap::with_capacity(objects.len());

    for (&handle, values) in objects {
        let mut edges = Vec::new();
        for (attr_id, _, value) in values {
            let Some(attr) = model.attr(*attr_id) else {
                continue;
            };
            if attr.flags.internal || attr.flags.read_only {
                continue;
            }
            let Some(target) = value.as_object_ref() else {
                continue;
            };
            if target.is_null() {
                continue;
            }
            if root_type == Some(target.object_type()) {
                // The root is a sink: always created first, never part of
                // a cycle.
                continue;
            }
            if !objects.contains_key(&target) {
                warn!("replay: {handle} references {target} which is not in the snapshot");
                continue;
            }
            edges.push(target);
        }
        edges.sort();
        edges.dedup();
        adjacency.insert(handle, edges);
    }
    adjacency
}

fn visit(
    handle: ObjectHandle,
    adjacency: &HashMap<ObjectHandle, Vec<ObjectHandle>>,
    marks: &mut HashMap<ObjectHandle, Mark>,
    order: &mut Vec<ObjectHandle>,
) {
    match marks.get(&handle) {
        Some(Mark::Done) => return,
        Some(Mark::InProgress) => {
            // Revisit on the active path: a reference cycle in the data.
            error!("replay: reference cycle through {handle}, breaking edge");
            return;
        }
        None => {}
    }
    marks.insert(handle, Mark::InProgress);
    if let Some(children) = adjacency.get(&handle) {
        for &child in children {
            visit(child, adjacency, marks, order);
        }
    }
    marks.insert(handle, Mark::Done);
    order.push(handle);
}

/// Recreates objects into a fresh store following the replay order.
pub(crate) fn replay_into(
    order: &[ObjectHandle],
    mut objects: HashMap<ObjectHandle, Values>,
) -> (ObjectStore, usize) {
    let store = ObjectStore::new();
    let mut skipped = 0;
    for handle in order {
        let Some(values) = objects.remove(handle) else {
            continue;
        };
        if let Err(err) = store.create(*handle, values) {
            warn!("replay: {err}, record dropped");
            skipped += 1;
        }
    }
    (store, skipped)
}
