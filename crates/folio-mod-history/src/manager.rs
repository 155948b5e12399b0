//! Core undo/redo engine over per-entity snapshot lists.
//!
//! Every entity gets an independent `(sequence, index)` pair. Commits append
//! after truncating anything ahead of the cursor; undo and redo only move the
//! cursor. The first snapshot of an entity is never removed.

use std::collections::HashMap;

use crate::entity::EntityId;
use crate::snapshot::{Snapshot, SnapshotKind};

/// Reason an undo or redo request was turned down.
///
/// These are expected steady-state outcomes, not faults. The `Display`
/// text is suitable for a transient user notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryRejection {
    /// Undo requested at the oldest snapshot.
    #[error("No previous state")]
    NoPreviousState,
    /// Redo requested at the newest snapshot.
    #[error("Already at the latest state")]
    AlreadyLatest,
    /// The entity has never been initialized or committed to.
    #[error("No history for '{0}'")]
    Uninitialized(EntityId),
}

/// Snapshot list and cursor for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityHistory {
    /// Versions in chronological order. Never empty.
    sequence: Vec<Snapshot>,
    /// Position of the current version within `sequence`.
    index: usize,
}

impl EntityHistory {
    fn seeded(content: Snapshot) -> Self {
        Self {
            sequence: vec![content],
            index: 0,
        }
    }

    /// All recorded versions, oldest first.
    pub fn sequence(&self) -> &[Snapshot] {
        &self.sequence
    }

    /// Cursor into [`sequence`](Self::sequence).
    pub fn index(&self) -> usize {
        self.index
    }

    /// The snapshot the cursor points at.
    pub fn current(&self) -> &Snapshot {
        &self.sequence[self.index]
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Never true for a tracked entity.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.sequence.len()
    }

    /// Shape fixed by the entity's first snapshot.
    pub fn kind(&self) -> SnapshotKind {
        self.sequence[0].kind()
    }

    /// Drops everything ahead of the cursor, appends `content`, and moves
    /// the cursor onto it.
    fn push(&mut self, content: Snapshot) {
        self.sequence.truncate(self.index + 1);
        self.sequence.push(content);
        self.index = self.sequence.len() - 1;
    }
}

/// Tracks undo/redo history for every entity of one document.
///
/// Each editor owns its own engine. Entities never share state, so an
/// operation on one id leaves every other id untouched.
#[derive(Default)]
pub struct HistoryEngine {
    entities: HashMap<EntityId, EntityHistory>,
}

impl std::fmt::Debug for HistoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryEngine")
            .field("entities", &self.entities.len())
            .finish()
    }
}

impl HistoryEngine {
    /// Creates an engine with no tracked entities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an entity's history with its originally loaded content.
    ///
    /// Calling this again for the same id replaces the prior history, which
    /// is what a document reload wants.
    pub fn initialize(&mut self, id: EntityId, content: &Snapshot) {
        tracing::debug!(entity = %id, "history initialized");
        self.entities
            .insert(id, EntityHistory::seeded(content.clone()));
    }

    /// Records a new version of an entity.
    ///
    /// Any redo tail beyond the current cursor is discarded before the new
    /// snapshot is appended. Committing to an unknown entity starts a fresh
    /// history holding just `content`.
    ///
    /// The entity's shape is fixed by its first snapshot. Committing a
    /// snapshot of another shape is a caller bug; it is logged and recorded
    /// anyway so that history stays in step with the document.
    pub fn commit(&mut self, id: EntityId, content: &Snapshot) {
        match self.entities.get_mut(&id) {
            Some(history) => {
                if history.kind() != content.kind() {
                    tracing::warn!(
                        entity = %id,
                        expected = ?history.kind(),
                        actual = ?content.kind(),
                        "committed snapshot changes entity shape"
                    );
                }
                let dropped = history.len() - history.index() - 1;
                history.push(content.clone());
                tracing::debug!(
                    entity = %id,
                    index = history.index(),
                    dropped,
                    "history commit"
                );
            }
            None => {
                tracing::debug!(entity = %id, "history commit on new entity");
                self.entities
                    .insert(id, EntityHistory::seeded(content.clone()));
            }
        }
    }

    /// Steps an entity back one version.
    ///
    /// Returns the snapshot that is now current; the caller writes it back
    /// into the document. At the oldest version nothing changes.
    pub fn undo(&mut self, id: &EntityId) -> Result<Snapshot, HistoryRejection> {
        let history = self
            .entities
            .get_mut(id)
            .ok_or_else(|| HistoryRejection::Uninitialized(id.clone()))?;
        if !history.can_undo() {
            return Err(HistoryRejection::NoPreviousState);
        }
        history.index -= 1;
        tracing::debug!(entity = %id, index = history.index, "history undo");
        Ok(history.current().clone())
    }

    /// Steps an entity forward one version.
    ///
    /// Returns the snapshot that is now current. At the newest version
    /// nothing changes.
    pub fn redo(&mut self, id: &EntityId) -> Result<Snapshot, HistoryRejection> {
        let history = self
            .entities
            .get_mut(id)
            .ok_or_else(|| HistoryRejection::Uninitialized(id.clone()))?;
        if !history.can_redo() {
            return Err(HistoryRejection::AlreadyLatest);
        }
        history.index += 1;
        tracing::debug!(entity = %id, index = history.index, "history redo");
        Ok(history.current().clone())
    }

    /// Whether undo is available. False for unknown entities.
    pub fn can_undo(&self, id: &EntityId) -> bool {
        self.entities.get(id).is_some_and(EntityHistory::can_undo)
    }

    /// Whether redo is available. False for unknown entities.
    pub fn can_redo(&self, id: &EntityId) -> bool {
        self.entities.get(id).is_some_and(EntityHistory::can_redo)
    }

    /// The snapshot the entity's cursor points at.
    pub fn current(&self, id: &EntityId) -> Option<&Snapshot> {
        self.entities.get(id).map(EntityHistory::current)
    }

    /// Read-only view of an entity's full history.
    pub fn history(&self, id: &EntityId) -> Option<&EntityHistory> {
        self.entities.get(id)
    }

    /// Number of recorded versions of an entity. Zero for unknown entities.
    pub fn len(&self, id: &EntityId) -> usize {
        self.entities.get(id).map_or(0, EntityHistory::len)
    }

    pub fn is_initialized(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Ids of all tracked entities, sorted.
    pub fn entity_ids(&self) -> Vec<&EntityId> {
        let mut ids: Vec<&EntityId> = self.entities.keys().collect();
        ids.sort();
        ids
    }

    /// Discards every entity's history.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
