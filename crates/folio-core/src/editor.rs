//! Editor that keeps a document and its undo/redo history in step.
//!
//! Every change flows through the editor: content is written into the
//! document and recorded in the [`HistoryEngine`] as one logical step, so a
//! document entity always equals the snapshot its history cursor points at.

use anyhow::{Context, Result};

use crate::document::{BlockSource, CoverLetter, DocumentStore, Website};
use crate::history::{EntityId, HistoryEngine, HistoryRejection, Snapshot};

/// Result of an undo or redo request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The snapshot was written back into the document.
    Applied(Snapshot),
    /// Nothing changed; the rejection text is meant for a transient notice.
    Rejected(HistoryRejection),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied(_))
    }
}

/// Owns one document plus the history of each of its entities.
#[derive(Debug)]
pub struct Editor<D> {
    document: D,
    history: HistoryEngine,
    unsaved: bool,
}

/// Editor over a cover letter (`header`, `footer`, `paragraph-{index}`).
pub type CoverLetterEditor = Editor<CoverLetter>;

/// Editor over a generated website (`global` plus named code blocks).
pub type SiteBlockEditor = Editor<Website>;

impl<D: DocumentStore> Editor<D> {
    /// Creates an editor and seeds history from the document's content.
    ///
    /// # Errors
    ///
    /// Returns an error if the document fails validation or an entity
    /// cannot be captured.
    pub fn new(document: D) -> Result<Self> {
        let mut editor = Self {
            document,
            history: HistoryEngine::new(),
            unsaved: false,
        };
        editor.seed_history()?;
        Ok(editor)
    }

    /// Replaces the document, discarding all history.
    ///
    /// # Errors
    ///
    /// Returns an error if the new document fails validation. The editor
    /// keeps its previous document and history in that case.
    pub fn load(&mut self, document: D) -> Result<()> {
        let previous = std::mem::replace(&mut self.document, document);
        if let Err(e) = self.seed_history() {
            self.document = previous;
            return Err(e);
        }
        self.unsaved = false;
        tracing::info!(kind = D::KIND.label(), "document loaded");
        Ok(())
    }

    /// Replaces the document with a local backup.
    ///
    /// History starts over from the restored content. The restored state has
    /// not been saved to the backend, so it counts as unsaved.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn restore(&mut self, document: D) -> Result<()> {
        self.load(document)?;
        self.unsaved = true;
        Ok(())
    }

    /// Commits new content for an entity.
    ///
    /// The document is written first; if it refuses the content, history is
    /// not touched. History records the document's own capture of the
    /// entity, so partial records are stored with every field filled in.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown entities or content of the wrong shape.
    pub fn edit(&mut self, id: &EntityId, content: Snapshot) -> Result<()> {
        self.document
            .set_entity_content(id, &content)
            .with_context(|| format!("Failed to apply edit to '{id}'"))?;
        let captured = self
            .document
            .entity_content(id)
            .with_context(|| format!("Failed to capture '{id}' after edit"))?
            .unwrap_or(content);
        self.history.commit(id.clone(), &captured);
        self.unsaved = true;
        Ok(())
    }

    /// Steps an entity back one version and writes it into the document.
    ///
    /// # Errors
    ///
    /// Returns an error only if the document refuses the restored snapshot,
    /// in which case the history cursor is moved back.
    pub fn undo(&mut self, id: &EntityId) -> Result<EditOutcome> {
        let snapshot = match self.history.undo(id) {
            Ok(snapshot) => snapshot,
            Err(rejection) => {
                tracing::debug!(entity = %id, %rejection, "undo rejected");
                return Ok(EditOutcome::Rejected(rejection));
            }
        };
        if let Err(e) = self.document.set_entity_content(id, &snapshot) {
            if let Err(rejection) = self.history.redo(id) {
                tracing::error!(entity = %id, %rejection, "failed to roll back undo");
            }
            return Err(e).with_context(|| format!("Failed to restore '{id}' on undo"));
        }
        self.unsaved = true;
        Ok(EditOutcome::Applied(snapshot))
    }

    /// Steps an entity forward one version and writes it into the document.
    ///
    /// # Errors
    ///
    /// Returns an error only if the document refuses the restored snapshot,
    /// in which case the history cursor is moved back.
    pub fn redo(&mut self, id: &EntityId) -> Result<EditOutcome> {
        let snapshot = match self.history.redo(id) {
            Ok(snapshot) => snapshot,
            Err(rejection) => {
                tracing::debug!(entity = %id, %rejection, "redo rejected");
                return Ok(EditOutcome::Rejected(rejection));
            }
        };
        if let Err(e) = self.document.set_entity_content(id, &snapshot) {
            if let Err(rejection) = self.history.undo(id) {
                tracing::error!(entity = %id, %rejection, "failed to roll back redo");
            }
            return Err(e).with_context(|| format!("Failed to restore '{id}' on redo"));
        }
        self.unsaved = true;
        Ok(EditOutcome::Applied(snapshot))
    }

    pub fn can_undo(&self, id: &EntityId) -> bool {
        self.history.can_undo(id)
    }

    pub fn can_redo(&self, id: &EntityId) -> bool {
        self.history.can_redo(id)
    }

    /// Current document content of an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity cannot be captured.
    pub fn current(&self, id: &EntityId) -> Result<Option<Snapshot>> {
        self.document.entity_content(id)
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn history(&self) -> &HistoryEngine {
        &self.history
    }

    /// Whether there are edits not yet saved to the backend.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Clears the unsaved flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// Clears history and seeds one entry per present entity.
    fn seed_history(&mut self) -> Result<()> {
        self.document.validate()?;
        let mut seeded = HistoryEngine::new();
        for id in self.document.entity_ids() {
            if let Some(content) = self
                .document
                .entity_content(&id)
                .with_context(|| format!("Failed to capture '{id}'"))?
            {
                seeded.initialize(id, &content);
            }
        }
        self.history = seeded;
        Ok(())
    }
}

impl Editor<CoverLetter> {
    /// Adds a paragraph section and records it in history.
    ///
    /// The new paragraph's history starts at `text`, so it has nothing to
    /// undo until it is edited.
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> EntityId {
        let text = text.into();
        let id = self.document.push_paragraph(text.as_str());
        self.history.commit(id.clone(), &Snapshot::text(text));
        self.unsaved = true;
        id
    }
}

impl Editor<Website> {
    /// Adds a code block and records it in history.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is reserved or already taken.
    pub fn add_block(&mut self, name: &str, source: BlockSource) -> Result<EntityId> {
        let id = self.document.push_block(name, source)?;
        if let Some(content) = self.document.entity_content(&id)? {
            self.history.commit(id.clone(), &content);
        }
        self.unsaved = true;
        Ok(id)
    }
}
