//! The record seam: what the engine needs from a single record.

use sync_types::{FieldValue, RecordId, ViewerId};

/// One typed record as seen by the indexing engine.
///
/// A record is a passive value carrier; relation traversal goes through
/// the owning [`crate::RecordStore`] so record instances stay small and
/// each batch's working set drops when the batch scope ends.
pub trait Record: Send + Sync {
    /// Store-assigned identity, unique within the type.
    fn id(&self) -> RecordId;

    /// The record's concrete type name.
    fn type_name(&self) -> &str;

    /// Read a stored property or computed accessor by name.
    ///
    /// `None` means the record has no value for that name; the document
    /// builder treats that as an absent field, never an error.
    fn property(&self, name: &str) -> Option<FieldValue>;

    /// Whether the given viewer may see this record. `None` asks about
    /// anonymous/public visibility.
    fn can_view(&self, viewer: Option<ViewerId>) -> bool;
}
