//! Snapshot writer.

use crate::codec;
use crate::error::{SnapshotError, SnapshotResult};
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use swdb_schema::ModelInfo;
use swdb_store::ObjectStore;

/// Writes one line per live object to `path`.
pub fn dump<P: AsRef<Path>>(store: &ObjectStore, model: &ModelInfo, path: P) -> SnapshotResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    dump_to(store, model, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes the snapshot to any writer.
///
/// The store walk is one atomic export; objects and fields come out in
/// stable (handle, attr, extra) order so identical stores produce
/// byte-identical snapshots.
pub fn dump_to<W: Write>(
    store: &ObjectStore,
    model: &ModelInfo,
    writer: &mut W,
) -> SnapshotResult<()> {
    let objects = store.snapshot();
    let total = objects.len();

    for (handle, values) in objects {
        let Some(type_name) = model.type_name_of(handle) else {
            warn!("dump: object {handle} has no type in the model, skipped");
            continue;
        };
        let mut line = format!("{type_name}:{handle}");
        for (attr_id, extra, value) in values {
            let Some(attr) = model.attr(attr_id) else {
                warn!("dump: object {handle} holds unknown attribute {attr_id}, field skipped");
                continue;
            };
            match codec::encode_value(model, attr, &value) {
                Ok(text) => {
                    line.push(',');
                    line.push_str(&attr.fqn);
                    line.push('#');
                    line.push_str(&extra.to_string());
                    line.push('#');
                    line.push_str(&text);
                }
                Err(detail) => {
                    warn!("dump: object {handle}: {detail}, field skipped");
                }
            }
        }
        writeln!(writer, "{line}")?;
    }

    info!("dumped {total} objects");
    Ok(())
}
