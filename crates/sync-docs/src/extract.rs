//! Path interpretation: apply a resolved field path to a record.

use sync_schema::{FieldPath, PathStep};
use sync_store::{Record, RecordStore};
use sync_types::FieldValue;

use crate::error::DocumentError;

/// Apply a field path's steps to a record, returning every raw value.
///
/// Relation steps fan out: each current record is replaced by its related
/// records, and values from all of them are flattened into one list. Each
/// step's working set is dropped as soon as the next step replaces it,
/// which keeps memory bounded during long batch passes.
pub fn extract(
    store: &dyn RecordStore,
    record: &dyn Record,
    path: &FieldPath,
) -> Result<Vec<FieldValue>, DocumentError> {
    let mut frontier: Vec<Box<dyn Record>> = Vec::new();
    let mut at_source = true;

    for step in &path.steps {
        match step {
            PathStep::Relation { name, .. } => {
                frontier = if at_source {
                    store.related(record, name)?
                } else {
                    let mut next = Vec::new();
                    for current in &frontier {
                        next.extend(store.related(current.as_ref(), name)?);
                    }
                    next
                };
                at_source = false;
            }
            PathStep::Property { name } => {
                // The resolver always puts the property read last
                if at_source {
                    return Ok(record.property(name).into_iter().collect());
                }
                let mut values = Vec::new();
                for current in &frontier {
                    if let Some(value) = current.property(name) {
                        values.push(value);
                    }
                }
                return Ok(values);
            }
        }
    }

    Ok(Vec::new())
}
