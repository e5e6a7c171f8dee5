//! The object store table.

use crate::error::{StoreError, StoreResult};
use crate::lock::ObjectLock;
use crate::record::ObjectRecord;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use swdb_types::{AttrId, AttributeValue, ObjectHandle};

/// In-memory table of object handle -> attribute values.
///
/// Every public operation locks the store-wide mutex for its whole
/// duration, so calls are atomic with respect to each other and a dump
/// observes one consistent snapshot. The per-object advisory lock
/// ([`lock`](Self::lock)/[`unlock`](Self::unlock)) is taken *outside* the
/// store mutex, so a blocked lock() never stalls unrelated store calls.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: Mutex<HashMap<ObjectHandle, ObjectRecord>>,
}

impl ObjectStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        ObjectStore::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<ObjectHandle, ObjectRecord>> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Creates an object pre-populated with its type's default triples.
    ///
    /// Callers obtain the defaults from `ModelInfo::default_values`; the
    /// store itself never consults the model.
    pub fn create(
        &self,
        handle: ObjectHandle,
        defaults: Vec<(AttrId, u32, AttributeValue)>,
    ) -> StoreResult<()> {
        let mut table = self.table();
        if table.contains_key(&handle) {
            return Err(StoreError::AlreadyExists(handle));
        }
        debug!("create {handle} with {} default values", defaults.len());
        table.insert(handle, ObjectRecord::new(defaults));
        Ok(())
    }

    /// Reads one value.
    pub fn get(&self, handle: ObjectHandle, attr: AttrId, extra: u32) -> StoreResult<AttributeValue> {
        let table = self.table();
        let record = table.get(&handle).ok_or(StoreError::NotFound(handle))?;
        record
            .get(attr, extra)
            .cloned()
            .ok_or(StoreError::ValueNotFound { handle, attr, extra })
    }

    /// Writes one value, inserting if absent and overwriting in place
    /// otherwise. Fails only if the handle itself is absent.
    pub fn set(
        &self,
        handle: ObjectHandle,
        attr: AttrId,
        extra: u32,
        value: AttributeValue,
    ) -> StoreResult<()> {
        let mut table = self.table();
        let record = table.get_mut(&handle).ok_or(StoreError::NotFound(handle))?;
        record.set(attr, extra, value);
        Ok(())
    }

    /// Removes one value.
    pub fn delete_value(&self, handle: ObjectHandle, attr: AttrId, extra: u32) -> StoreResult<()> {
        let mut table = self.table();
        let record = table.get_mut(&handle).ok_or(StoreError::NotFound(handle))?;
        record
            .remove(attr, extra)
            .map(|_| ())
            .ok_or(StoreError::ValueNotFound { handle, attr, extra })
    }

    /// Removes an object and all its values.
    pub fn delete(&self, handle: ObjectHandle) -> StoreResult<()> {
        let mut table = self.table();
        table
            .remove(&handle)
            .map(|_| debug!("delete {handle}"))
            .ok_or(StoreError::NotFound(handle))
    }

    /// Returns every (attr, extra, value) triple of an object, in
    /// (attr, extra) order. The advisory lock is not a value and never
    /// appears here.
    pub fn list_values(
        &self,
        handle: ObjectHandle,
    ) -> StoreResult<Vec<(AttrId, u32, AttributeValue)>> {
        let table = self.table();
        let record = table.get(&handle).ok_or(StoreError::NotFound(handle))?;
        Ok(record
            .iter()
            .map(|(attr, extra, value)| (attr, extra, value.clone()))
            .collect())
    }

    /// Replaces a list attribute: length at `extra = 0`, elements at
    /// `extra = 1..=len`. Stale elements of a previously longer list are
    /// removed.
    pub fn set_list(
        &self,
        handle: ObjectHandle,
        attr: AttrId,
        values: Vec<AttributeValue>,
    ) -> StoreResult<()> {
        let mut table = self.table();
        let record = table.get_mut(&handle).ok_or(StoreError::NotFound(handle))?;
        let len = values.len() as u32;
        record.set(attr, 0, AttributeValue::U32(len));
        for (i, value) in values.into_iter().enumerate() {
            record.set(attr, i as u32 + 1, value);
        }
        record.truncate_list(attr, len);
        Ok(())
    }

    /// Reads a list attribute back as a vector.
    pub fn get_list(&self, handle: ObjectHandle, attr: AttrId) -> StoreResult<Vec<AttributeValue>> {
        let table = self.table();
        let record = table.get(&handle).ok_or(StoreError::NotFound(handle))?;
        let len = record
            .get(attr, 0)
            .and_then(AttributeValue::as_u32)
            .ok_or(StoreError::ValueNotFound { handle, attr, extra: 0 })?;
        let mut out = Vec::with_capacity(len as usize);
        for extra in 1..=len {
            let value = record
                .get(attr, extra)
                .cloned()
                .ok_or(StoreError::ValueNotFound { handle, attr, extra })?;
            out.push(value);
        }
        Ok(out)
    }

    /// Exports every object and its triples under one lock acquisition,
    /// sorted by handle. This is the dump-side walk: the whole snapshot is
    /// one atomic operation from the caller's point of view.
    pub fn snapshot(&self) -> Vec<(ObjectHandle, Vec<(AttrId, u32, AttributeValue)>)> {
        let table = self.table();
        let mut objects: Vec<(ObjectHandle, Vec<(AttrId, u32, AttributeValue)>)> = table
            .iter()
            .map(|(&handle, record)| {
                let values = record
                    .iter()
                    .map(|(attr, extra, value)| (attr, extra, value.clone()))
                    .collect();
                (handle, values)
            })
            .collect();
        objects.sort_by_key(|(handle, _)| *handle);
        objects
    }

    /// All live handles, sorted for deterministic iteration.
    pub fn handles(&self) -> Vec<ObjectHandle> {
        let table = self.table();
        let mut handles: Vec<ObjectHandle> = table.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Returns true if the handle is present.
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.table().contains_key(&handle)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    /// Returns true if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    fn record_lock(&self, handle: ObjectHandle) -> StoreResult<Arc<ObjectLock>> {
        let table = self.table();
        let record = table.get(&handle).ok_or(StoreError::NotFound(handle))?;
        Ok(Arc::clone(&record.lock))
    }

    /// Acquires the object's advisory lock for the calling thread.
    ///
    /// Reentrant: the owner may lock again and must unlock as many times.
    /// Another thread blocks until the lock is fully released; there is no
    /// fairness guarantee and no timeout, so the lock must not be held
    /// across calls that can block indefinitely.
    pub fn lock(&self, handle: ObjectHandle) -> StoreResult<()> {
        // Taken outside the store mutex so waiting does not stall the store.
        self.record_lock(handle)?.acquire();
        Ok(())
    }

    /// Releases one advisory-lock acquisition. A release by a thread that
    /// does not own the lock is a no-op.
    pub fn unlock(&self, handle: ObjectHandle) -> StoreResult<()> {
        self.record_lock(handle)?.release();
        Ok(())
    }
}
