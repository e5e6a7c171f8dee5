//! The metadata model: owner of all schema-derived records.
//!
//! A [`ModelInfo`] is built once by the loader and is read-only afterwards;
//! it needs no locking. Multiple models may coexist in one process (tests
//! load several side by side), so nothing in here is global.

use crate::depgraph::DepGraph;
use crate::metadata::{AttributeMetadata, ObjectInfo};
use std::collections::{BTreeSet, HashMap, HashSet};
use swdb_types::{AttrId, AttributeValue, ObjectHandle, ObjectTypeId};

/// The fully built, internally consistent metadata model.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub(crate) version: u32,
    pub(crate) objects: Vec<ObjectInfo>,
    pub(crate) attrs: Vec<AttributeMetadata>,
    pub(crate) type_by_name: HashMap<String, ObjectTypeId>,
    pub(crate) attr_by_fqn: HashMap<String, AttrId>,
    pub(crate) root: Option<ObjectTypeId>,
    pub(crate) graph: DepGraph,
}

impl ModelInfo {
    /// Schema format version of the loaded document.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Number of object types.
    pub fn num_types(&self) -> usize {
        self.objects.len()
    }

    /// All object types, in id order.
    pub fn objects(&self) -> &[ObjectInfo] {
        &self.objects
    }

    /// All attributes, in id order.
    pub fn attrs(&self) -> &[AttributeMetadata] {
        &self.attrs
    }

    /// Looks up an object type by id.
    pub fn object(&self, t: ObjectTypeId) -> Option<&ObjectInfo> {
        self.objects.get(t.as_u16() as usize)
    }

    /// Looks up an object type by fully-qualified name.
    pub fn object_by_name(&self, name: &str) -> Option<&ObjectInfo> {
        self.type_by_name.get(name).and_then(|&t| self.object(t))
    }

    /// Looks up an attribute by id.
    pub fn attr(&self, id: AttrId) -> Option<&AttributeMetadata> {
        self.attrs.get(id.as_u32() as usize)
    }

    /// Looks up an attribute by fully-qualified name.
    pub fn attr_by_fqn(&self, fqn: &str) -> Option<&AttributeMetadata> {
        self.attr_by_fqn.get(fqn).and_then(|&id| self.attr(id))
    }

    /// The distinguished root/sink object type, if the schema declares one.
    pub fn root_type(&self) -> Option<ObjectTypeId> {
        self.root
    }

    /// The type name recovered from a handle, if the encoded type exists.
    pub fn type_name_of(&self, handle: ObjectHandle) -> Option<&str> {
        self.object(handle.object_type()).map(|o| o.name.as_str())
    }

    /// Default value triples for a freshly created object of a type:
    /// every attribute of the type at its default, lists as an empty
    /// length slot at `extra = 0`.
    ///
    /// Callers hand this to `ObjectStore::create`; the store itself never
    /// consults the model.
    pub fn default_values(&self, t: ObjectTypeId) -> Vec<(AttrId, u32, AttributeValue)> {
        let Some(object) = self.object(t) else {
            return Vec::new();
        };
        object
            .attrs
            .iter()
            .filter_map(|&id| self.attr(id))
            .map(|attr| (attr.id, 0, attr.default.clone()))
            .collect()
    }

    /// See [`DepGraph::refs`].
    pub fn refs(&self, t: ObjectTypeId) -> &BTreeSet<ObjectTypeId> {
        self.graph.refs(t)
    }

    /// See [`DepGraph::inverse_refs`].
    pub fn inverse_refs(&self, t: ObjectTypeId) -> &BTreeSet<ObjectTypeId> {
        self.graph.inverse_refs(t)
    }

    /// See [`DepGraph::inverse_refs_by_priority`].
    pub fn inverse_refs_by_priority(&self, t: ObjectTypeId) -> &[ObjectTypeId] {
        self.graph.inverse_refs_by_priority(t)
    }

    /// See [`DepGraph::dep_ots`].
    pub fn dep_ots(&self, attr: AttrId) -> &BTreeSet<ObjectTypeId> {
        self.graph.dep_ots(attr)
    }

    /// See [`DepGraph::dep_path_ots`].
    pub fn dep_path_ots(&self, attr: AttrId) -> &BTreeSet<ObjectTypeId> {
        self.graph.dep_path_ots(attr)
    }
}

/// Per-type trace verbosity, passed explicitly to the components that log
/// per-object detail (the warm-boot loader, primarily).
///
/// Deliberately not process-global: independent models and stores must be
/// able to coexist, tests included.
#[derive(Debug, Clone, Default)]
pub struct TraceConfig {
    enabled: HashSet<ObjectTypeId>,
}

impl TraceConfig {
    /// No per-type tracing enabled.
    pub fn new() -> Self {
        TraceConfig::default()
    }

    /// Enables detailed tracing for one object type.
    pub fn enable(&mut self, t: ObjectTypeId) {
        self.enabled.insert(t);
    }

    /// Disables detailed tracing for one object type.
    pub fn disable(&mut self, t: ObjectTypeId) {
        self.enabled.remove(&t);
    }

    /// Returns true if detailed tracing is on for the type.
    pub fn enabled(&self, t: ObjectTypeId) -> bool {
        self.enabled.contains(&t)
    }
}
