//! Snapshot reader.

use crate::codec;
use crate::error::{SnapshotError, SnapshotResult};
use crate::topo;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use swdb_schema::{ModelInfo, TraceConfig};
use swdb_store::ObjectStore;
use swdb_types::{AttrId, AttributeValue, ObjectHandle};

/// Result of restoring a snapshot.
#[derive(Debug)]
pub struct LoadResult {
    /// Fresh store holding every successfully restored object.
    pub store: ObjectStore,
    /// Dependency-respecting creation order that was used: every object
    /// appears after everything it references.
    pub replay_order: Vec<ObjectHandle>,
    /// Number of objects restored.
    pub loaded: usize,
    /// Number of records dropped (corrupt lines, unresolvable names,
    /// duplicate handles).
    pub skipped: usize,
}

/// Restores a snapshot file against the current model.
pub fn load<P: AsRef<Path>>(
    model: &ModelInfo,
    trace: &TraceConfig,
    path: P,
) -> SnapshotResult<LoadResult> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from(model, trace, BufReader::new(file))
}

/// Restores a snapshot from any buffered reader.
///
/// Only IO failures abort the load. A record that cannot be parsed or
/// resolved against the model is logged and dropped; the rest of the file
/// continues to load. Later references to a dropped object surface as
/// replay warnings, not errors.
pub fn load_from<R: BufRead>(
    model: &ModelInfo,
    trace: &TraceConfig,
    reader: R,
) -> SnapshotResult<LoadResult> {
    let mut objects: HashMap<ObjectHandle, Vec<(AttrId, u32, AttributeValue)>> = HashMap::new();
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(model, index + 1, &line) {
            Ok((handle, values)) => {
                if trace.enabled(handle.object_type()) {
                    debug!("restored {handle} with {} values", values.len());
                }
                if objects.insert(handle, values).is_some() {
                    warn!("line {}: duplicate object {handle}, previous record dropped", index + 1);
                    skipped += 1;
                }
            }
            Err(err) => {
                warn!("snapshot {err}, record dropped");
                skipped += 1;
            }
        }
    }

    let replay_order = topo::replay_order(model, &objects);
    let (store, replay_skipped) = topo::replay_into(&replay_order, objects);
    skipped += replay_skipped;

    let loaded = store.len();
    info!("snapshot restored: {loaded} objects, {skipped} records dropped");
    Ok(LoadResult {
        store,
        replay_order,
        loaded,
        skipped,
    })
}

type ParsedRecord = (ObjectHandle, Vec<(AttrId, u32, AttributeValue)>);

/// Parses one snapshot line against the current model.
///
/// The handle is re-derived here: the stored local id is kept, the type id
/// is looked up by fully-qualified name, which is what tolerates type-id
/// renumbering between the writer and this reader.
fn parse_record(model: &ModelInfo, line_no: usize, line: &str) -> SnapshotResult<ParsedRecord> {
    let invalid = |detail: String| SnapshotError::InvalidRecord {
        line: line_no,
        detail,
    };

    let mut fields = line.split(',');
    let header = fields.next().unwrap_or_default();
    let (type_name, bits) = header
        .rsplit_once(':')
        .ok_or_else(|| invalid(format!("malformed header {header:?}")))?;
    let object = model
        .object_by_name(type_name)
        .ok_or_else(|| invalid(format!("unknown object type {type_name}")))?;
    let stored: ObjectHandle = bits
        .parse()
        .map_err(|_| invalid(format!("bad handle bits {bits:?}")))?;
    let handle = stored.rehandle(object.id);

    let mut values = Vec::new();
    for field in fields {
        if field.is_empty() {
            continue;
        }
        let mut parts = field.splitn(3, '#');
        let (name, extra, text) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(extra), Some(text)) => (name, extra, text),
            _ => return Err(invalid(format!("malformed field {field:?}"))),
        };
        let attr = model
            .attr_by_fqn(name)
            .ok_or_else(|| invalid(format!("unknown attribute {name}")))?;
        if attr.object_type != object.id {
            return Err(invalid(format!(
                "attribute {name} does not belong to {type_name}"
            )));
        }
        let extra: u32 = extra
            .parse()
            .map_err(|_| invalid(format!("bad extra index {extra:?}")))?;
        let value = if attr.flags.is_status {
            // Status/progress values are not meaningful to resume.
            AttributeValue::zeroed(codec::slot_type(attr, extra))
        } else {
            codec::decode_value(model, attr, extra, text).map_err(invalid)?
        };
        values.push((attr.id, extra, value));
    }

    Ok((handle, values))
}
