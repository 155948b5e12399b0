//! Per-entity linear undo/redo history.
//!
//! Provides a `HistoryEngine` that keeps, for every independently editable
//! entity of a document, an ordered list of content snapshots and a cursor
//! into that list. History lives for the editing session only and is never
//! persisted.

pub mod entity;
pub mod manager;
pub mod snapshot;

pub use entity::EntityId;
pub use manager::{EntityHistory, HistoryEngine, HistoryRejection};
pub use snapshot::{FieldValue, Snapshot, SnapshotKind};
