//! Cover letter document: header, body paragraphs, footer.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::{from_record, record_of, text_of, DocumentKind, DocumentStore};
use crate::history::{EntityId, Snapshot};

/// Sender and recipient block at the top of the letter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterHeader {
    pub sender_name: String,
    pub sender_title: String,
    pub sender_email: String,
    pub sender_phone: String,
    pub sender_address: String,
    pub recipient_name: String,
    pub recipient_title: String,
    pub company_name: String,
    pub company_address: String,
    pub date: String,
}

/// Closing block at the bottom of the letter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterFooter {
    /// e.g. "Sincerely,"
    pub closing: String,
    pub sender_name: String,
    /// Lines printed under the name (title, contact, ...).
    pub signature: Vec<String>,
}

/// A cover letter as edited section by section.
///
/// Entities are `header`, `footer`, and `paragraph-{index}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverLetter {
    pub header: Option<LetterHeader>,
    pub paragraphs: Vec<String>,
    pub footer: Option<LetterFooter>,
}

impl CoverLetter {
    /// Appends a paragraph section and returns its entity id.
    pub fn push_paragraph(&mut self, text: impl Into<String>) -> EntityId {
        self.paragraphs.push(text.into());
        EntityId::paragraph(self.paragraphs.len() - 1)
    }
}

impl DocumentStore for CoverLetter {
    const KIND: DocumentKind = DocumentKind::CoverLetter;

    fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids = Vec::with_capacity(self.paragraphs.len() + 2);
        if self.header.is_some() {
            ids.push(EntityId::header());
        }
        ids.extend((0..self.paragraphs.len()).map(EntityId::paragraph));
        if self.footer.is_some() {
            ids.push(EntityId::footer());
        }
        ids
    }

    fn entity_content(&self, id: &EntityId) -> Result<Option<Snapshot>> {
        match id.as_str() {
            "header" => self.header.as_ref().map(record_of).transpose(),
            "footer" => self.footer.as_ref().map(record_of).transpose(),
            _ => Ok(id
                .paragraph_index()
                .and_then(|i| self.paragraphs.get(i))
                .map(|text| Snapshot::text(text.as_str()))),
        }
    }

    fn set_entity_content(&mut self, id: &EntityId, content: &Snapshot) -> Result<()> {
        match id.as_str() {
            "header" => self.header = Some(from_record(id, content)?),
            "footer" => self.footer = Some(from_record(id, content)?),
            _ => {
                let Some(index) = id.paragraph_index() else {
                    bail!("Unknown cover letter section '{id}'");
                };
                let text = text_of(id, content)?;
                match self.paragraphs.get_mut(index) {
                    Some(slot) => *slot = text.to_string(),
                    None => bail!(
                        "Paragraph {index} does not exist ({} paragraphs)",
                        self.paragraphs.len()
                    ),
                }
            }
        }
        Ok(())
    }
}
