//! One object's attribute-value collection.

use crate::lock::ObjectLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use swdb_types::{AttrId, AttributeValue};

/// The stored state of one object: an ordered `(attr, extra) -> value`
/// map plus the advisory lock.
///
/// The lock lives next to the values but is not one of them, so it can
/// never leak through value enumeration.
#[derive(Debug)]
pub(crate) struct ObjectRecord {
    values: BTreeMap<(AttrId, u32), AttributeValue>,
    pub(crate) lock: Arc<ObjectLock>,
}

impl ObjectRecord {
    /// Creates a record pre-populated with default triples and an
    /// unheld lock.
    pub(crate) fn new(defaults: Vec<(AttrId, u32, AttributeValue)>) -> Self {
        ObjectRecord {
            values: defaults
                .into_iter()
                .map(|(attr, extra, value)| ((attr, extra), value))
                .collect(),
            lock: Arc::new(ObjectLock::new()),
        }
    }

    pub(crate) fn get(&self, attr: AttrId, extra: u32) -> Option<&AttributeValue> {
        self.values.get(&(attr, extra))
    }

    pub(crate) fn set(&mut self, attr: AttrId, extra: u32, value: AttributeValue) {
        self.values.insert((attr, extra), value);
    }

    pub(crate) fn remove(&mut self, attr: AttrId, extra: u32) -> Option<AttributeValue> {
        self.values.remove(&(attr, extra))
    }

    /// Removes every element of a list attribute above `keep` extras
    /// (exclusive of the length slot at extra 0).
    pub(crate) fn truncate_list(&mut self, attr: AttrId, keep: u32) {
        let stale: Vec<u32> = self
            .values
            .range((attr, keep.saturating_add(1))..=(attr, u32::MAX))
            .map(|(&(_, extra), _)| extra)
            .collect();
        for extra in stale {
            self.values.remove(&(attr, extra));
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (AttrId, u32, &AttributeValue)> {
        self.values
            .iter()
            .map(|(&(attr, extra), value)| (attr, extra, value))
    }
}
