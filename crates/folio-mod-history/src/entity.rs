//! Identifiers for independently versioned pieces of a document.

use std::fmt;

use serde::{Deserialize, Serialize};

const PARAGRAPH_PREFIX: &str = "paragraph-";

/// Name of an entity whose content is tracked by the history engine.
///
/// Cover letters use `header`, `footer` and `paragraph-{index}`. Websites use
/// `global` plus one id per named code block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn header() -> Self {
        Self::new("header")
    }

    pub fn footer() -> Self {
        Self::new("footer")
    }

    /// Id of the paragraph section at `index` (0-indexed).
    pub fn paragraph(index: usize) -> Self {
        Self(format!("{PARAGRAPH_PREFIX}{index}"))
    }

    pub fn global() -> Self {
        Self::new("global")
    }

    /// Id of a named website code block.
    pub fn block(name: &str) -> Self {
        Self::new(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the paragraph index for `paragraph-{index}` ids.
    ///
    /// Only the canonical spelling matches: `paragraph-01` and `paragraph-+1`
    /// are distinct ids and must not alias `paragraph-1`.
    pub fn paragraph_index(&self) -> Option<usize> {
        self.0
            .strip_prefix(PARAGRAPH_PREFIX)?
            .parse()
            .ok()
            .filter(|i| *self == Self::paragraph(*i))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
