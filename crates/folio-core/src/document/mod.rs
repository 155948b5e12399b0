//! Editable documents and the contract the editor uses to read and write
//! their entities.
//!
//! A document is the aggregate of every entity's *current* content. It is
//! what gets persisted and rendered; history is kept separately by the
//! editor. Cover letters live in the `letter` submodule and generated
//! websites in `website`.

mod letter;
mod website;

pub use letter::{CoverLetter, LetterFooter, LetterHeader};
pub use website::{BlockSource, CodeBlock, Website};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::history::{EntityId, Snapshot};

/// Which kind of document a backup or CLI invocation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    CoverLetter,
    Website,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::CoverLetter => "cover letter",
            DocumentKind::Website => "website",
        }
    }
}

/// Read/write access to a document's entities.
///
/// The editor orchestrates every change: it reads current content from the
/// document, feeds it to the history engine, and writes the engine's result
/// back through [`set_entity_content`](Self::set_entity_content).
pub trait DocumentStore {
    /// Kind tag stored alongside backups.
    const KIND: DocumentKind;

    /// Ids of the entities currently present, in document order.
    ///
    /// Absent sections (e.g. a letter without a footer) are not listed.
    fn entity_ids(&self) -> Vec<EntityId>;

    /// Current content of an entity, or `None` if it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be captured as a snapshot.
    fn entity_content(&self, id: &EntityId) -> Result<Option<Snapshot>>;

    /// Replaces an entity's content.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids or snapshots of the wrong shape. The
    /// document is left unchanged in that case.
    fn set_entity_content(&mut self, id: &EntityId, content: &Snapshot) -> Result<()>;

    /// Checks structural rules the entity ids rely on.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violation found.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Captures a serializable section as a record snapshot.
pub(crate) fn record_of<T: Serialize>(value: &T) -> Result<Snapshot> {
    let json = serde_json::to_value(value).context("Failed to serialize section")?;
    let snapshot: Snapshot =
        serde_json::from_value(json).context("Section is not a flat record")?;
    match snapshot {
        Snapshot::Record(_) => Ok(snapshot),
        Snapshot::Text(_) => anyhow::bail!("Section serialized to text, expected a record"),
    }
}

/// Rebuilds a section from a record snapshot.
pub(crate) fn from_record<T: DeserializeOwned>(id: &EntityId, content: &Snapshot) -> Result<T> {
    if content.as_record().is_none() {
        anyhow::bail!("Entity '{id}' expects a record, got text");
    }
    let json = serde_json::to_value(content).context("Failed to serialize snapshot")?;
    serde_json::from_value(json).with_context(|| format!("Invalid fields for entity '{id}'"))
}

/// Extracts paragraph text from a text snapshot.
pub(crate) fn text_of<'a>(id: &EntityId, content: &'a Snapshot) -> Result<&'a str> {
    content
        .as_text()
        .with_context(|| format!("Entity '{id}' expects text, got a record"))
}
