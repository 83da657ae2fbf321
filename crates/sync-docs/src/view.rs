//! Visibility markers for post-hoc access filtering.
//!
//! Every document carries a `view_status` field so queries can filter on
//! viewer access without joining ACLs at query time. A publicly viewable
//! record gets the single marker `1-null`; otherwise one
//! `{0|1}-{viewer}` marker is emitted per known viewer. Enumerating all
//! viewers keeps query-time filtering trivial but does not scale to very
//! large viewer sets.

use sync_store::{Record, RecordStore};
use sync_types::FieldValue;

/// Marker for records anyone may view.
pub const PUBLIC_MARKER: &str = "1-null";

/// Compute the visibility markers for a record.
pub fn view_status(record: &dyn Record, store: &dyn RecordStore) -> Vec<FieldValue> {
    if record.can_view(None) {
        return vec![FieldValue::Text(PUBLIC_MARKER.to_string())];
    }

    store
        .viewers()
        .into_iter()
        .map(|viewer| {
            let allowed = u8::from(record.can_view(Some(viewer)));
            FieldValue::Text(format!("{}-{}", allowed, viewer))
        })
        .collect()
}
