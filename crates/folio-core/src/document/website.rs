//! Generated personal website: a global block plus named code blocks.

use std::collections::HashSet;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::{from_record, record_of, DocumentKind, DocumentStore};
use crate::history::{EntityId, Snapshot};

/// HTML/CSS/JS triple rendered into a sandboxed preview.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSource {
    pub html: String,
    pub css: String,
    pub js: String,
}

/// A named section of the website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub name: String,
    #[serde(flatten)]
    pub source: BlockSource,
}

/// Website payload as exchanged with the backend.
///
/// Entities are `global` and one id per code block name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Website {
    pub global: BlockSource,
    #[serde(rename = "code_bloks")]
    pub code_blocks: Vec<CodeBlock>,
}

impl Website {
    pub fn block(&self, name: &str) -> Option<&CodeBlock> {
        self.code_blocks.iter().find(|b| b.name == name)
    }

    fn block_mut(&mut self, name: &str) -> Option<&mut CodeBlock> {
        self.code_blocks.iter_mut().find(|b| b.name == name)
    }

    /// Appends a new code block and returns its entity id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is reserved or already taken.
    pub fn push_block(&mut self, name: &str, source: BlockSource) -> Result<EntityId> {
        let id = EntityId::block(name);
        if id == EntityId::global() {
            bail!("Block name '{name}' is reserved");
        }
        if self.block(name).is_some() {
            bail!("Block '{name}' already exists");
        }
        self.code_blocks.push(CodeBlock {
            name: name.to_string(),
            source,
        });
        Ok(id)
    }
}

impl DocumentStore for Website {
    const KIND: DocumentKind = DocumentKind::Website;

    fn entity_ids(&self) -> Vec<EntityId> {
        std::iter::once(EntityId::global())
            .chain(self.code_blocks.iter().map(|b| EntityId::block(&b.name)))
            .collect()
    }

    fn entity_content(&self, id: &EntityId) -> Result<Option<Snapshot>> {
        if *id == EntityId::global() {
            return record_of(&self.global).map(Some);
        }
        self.block(id.as_str())
            .map(|b| record_of(&b.source))
            .transpose()
    }

    fn set_entity_content(&mut self, id: &EntityId, content: &Snapshot) -> Result<()> {
        if *id == EntityId::global() {
            self.global = from_record(id, content)?;
            return Ok(());
        }
        let Some(block) = self.block_mut(id.as_str()) else {
            bail!("Unknown code block '{id}'");
        };
        block.source = from_record(id, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for block in &self.code_blocks {
            if EntityId::block(&block.name) == EntityId::global() {
                bail!("Block name '{}' is reserved", block.name);
            }
            if !seen.insert(block.name.as_str()) {
                bail!("Duplicate code block '{}'", block.name);
            }
        }
        Ok(())
    }
}
