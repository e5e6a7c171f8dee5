//! Derived reference and dependency graphs.
//!
//! Two relations over object *types* are computed once per model:
//!
//! - `refs[T]` / `inverse_refs[T]`: which types a type-T object-reference
//!   attribute may point at, and the transpose.
//! - `dep_ots[attr]` / `dep_path_ots[attr]`: which types must be notified,
//!   directly or along referencing paths through auto-class types, when a
//!   given attribute changes.

use crate::metadata::{AttributeMetadata, ObjectClass, ObjectInfo};
use std::collections::{BTreeSet, HashMap};
use swdb_types::{AttrId, ObjectTypeId, ValueType};

static EMPTY_SET: BTreeSet<ObjectTypeId> = BTreeSet::new();

/// The derived graphs of one metadata model.
#[derive(Debug, Clone)]
pub struct DepGraph {
    refs: Vec<BTreeSet<ObjectTypeId>>,
    inverse_refs: Vec<BTreeSet<ObjectTypeId>>,
    inverse_refs_by_priority: Vec<Vec<ObjectTypeId>>,
    dep_ots: HashMap<AttrId, BTreeSet<ObjectTypeId>>,
    dep_path_ots: HashMap<AttrId, BTreeSet<ObjectTypeId>>,
}

impl DepGraph {
    /// Object types directly reachable via a type-T object-reference
    /// attribute.
    pub fn refs(&self, t: ObjectTypeId) -> &BTreeSet<ObjectTypeId> {
        self.refs.get(t.as_u16() as usize).unwrap_or(&EMPTY_SET)
    }

    /// Object types holding an object-reference attribute that may point
    /// at T.
    pub fn inverse_refs(&self, t: ObjectTypeId) -> &BTreeSet<ObjectTypeId> {
        self.inverse_refs
            .get(t.as_u16() as usize)
            .unwrap_or(&EMPTY_SET)
    }

    /// Inverse-referencing types ordered by descending declared priority.
    /// Order among equal priorities is unspecified.
    pub fn inverse_refs_by_priority(&self, t: ObjectTypeId) -> &[ObjectTypeId] {
        self.inverse_refs_by_priority
            .get(t.as_u16() as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Auto types that declared a dependency on the attribute.
    pub fn dep_ots(&self, attr: AttrId) -> &BTreeSet<ObjectTypeId> {
        self.dep_ots.get(&attr).unwrap_or(&EMPTY_SET)
    }

    /// Every type on a successful referencing path from a dependent auto
    /// type towards the attribute's owner.
    pub fn dep_path_ots(&self, attr: AttrId) -> &BTreeSet<ObjectTypeId> {
        self.dep_path_ots.get(&attr).unwrap_or(&EMPTY_SET)
    }
}

/// Computes all derived graphs. Runs once at schema load; the result is
/// immutable afterwards.
pub(crate) fn compute(objects: &[ObjectInfo], attrs: &[AttributeMetadata]) -> DepGraph {
    let n = objects.len();
    let mut refs = vec![BTreeSet::new(); n];
    let mut inverse_refs = vec![BTreeSet::new(); n];

    // Single fold over every attribute: object-reference attributes (scalar
    // or list) contribute edges, everything else contributes none.
    for attr in attrs {
        if attr.value_type != ValueType::Object {
            continue;
        }
        let from = attr.object_type.as_u16() as usize;
        for &to in &attr.ref_types {
            refs[from].insert(to);
            inverse_refs[to.as_u16() as usize].insert(attr.object_type);
        }
    }

    let inverse_refs_by_priority = inverse_refs
        .iter()
        .map(|set| {
            let mut order: Vec<ObjectTypeId> = set.iter().copied().collect();
            order.sort_by(|a, b| {
                let pa = objects[a.as_u16() as usize].priority;
                let pb = objects[b.as_u16() as usize].priority;
                pb.cmp(&pa)
            });
            order
        })
        .collect();

    let mut dep_ots: HashMap<AttrId, BTreeSet<ObjectTypeId>> = HashMap::new();
    let mut dep_path_ots: HashMap<AttrId, BTreeSet<ObjectTypeId>> = HashMap::new();

    for object in objects {
        for dep in &object.dependencies {
            dep_ots.entry(dep.target_attr).or_default().insert(object.id);
            let out = dep_path_ots.entry(dep.target_attr).or_default();
            let mut path = Vec::new();
            walk_dep_path(objects, &refs, object.id, dep.target_type, &mut path, out);
        }
    }

    DepGraph {
        refs,
        inverse_refs,
        inverse_refs_by_priority,
        dep_ots,
        dep_path_ots,
    }
}

/// Depth-first reachability from a dependent type towards the target.
///
/// Success the moment `target` is directly referenced. A user-class type
/// encountered mid-walk with no direct edge terminates its branch as
/// satisfied without propagating further; auto and none classes recurse.
/// `path` doubles as the active-recursion guard, so cyclic schemas
/// terminate.
fn walk_dep_path(
    objects: &[ObjectInfo],
    refs: &[BTreeSet<ObjectTypeId>],
    cur: ObjectTypeId,
    target: ObjectTypeId,
    path: &mut Vec<ObjectTypeId>,
    out: &mut BTreeSet<ObjectTypeId>,
) -> bool {
    if path.contains(&cur) {
        return false;
    }
    path.push(cur);

    let cur_refs = &refs[cur.as_u16() as usize];
    let satisfied = if cur_refs.contains(&target) {
        true
    } else if objects[cur.as_u16() as usize].class == ObjectClass::User {
        // User types never propagate transitively; the branch counts as
        // satisfied whether or not a direct edge exists.
        true
    } else {
        let mut hit = false;
        for &next in cur_refs {
            // No short-circuit: every successful path is recorded.
            if walk_dep_path(objects, refs, next, target, path, out) {
                hit = true;
            }
        }
        hit
    };

    if satisfied {
        out.extend(path.iter().copied());
    }
    path.pop();
    satisfied
}
