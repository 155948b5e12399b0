// Re-exports from folio-mod-history so callers only depend on folio-core.
pub use folio_mod_history::{
    EntityHistory, EntityId, FieldValue, HistoryEngine, HistoryRejection, Snapshot, SnapshotKind,
};
