//! Core content types captured by the history engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single field of a record snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain text field (e.g. `sender_name`, `html`).
    Text(String),
    /// Multi-line field stored as separate strings (e.g. signature lines).
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the text value, or `None` for list fields.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// Returns the list value, or `None` for text fields.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Shape of a snapshot, fixed per entity by its first captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Text,
    Record,
}

/// One immutable version of an entity's content.
///
/// Snapshots own their data. Capturing one from the live document is a
/// `clone`, so later edits to the document never reach into history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    /// Paragraph-style content.
    Text(String),
    /// Flat record of named fields (header/footer objects, code blocks).
    Record(BTreeMap<String, FieldValue>),
}

impl Snapshot {
    /// Creates a text snapshot.
    pub fn text(s: impl Into<String>) -> Self {
        Snapshot::Text(s.into())
    }

    /// Creates a record snapshot from `(name, value)` pairs.
    pub fn record<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Snapshot::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the shape of this snapshot.
    pub fn kind(&self) -> SnapshotKind {
        match self {
            Snapshot::Text(_) => SnapshotKind::Text,
            Snapshot::Record(_) => SnapshotKind::Record,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Snapshot::Text(s) => Some(s),
            Snapshot::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            Snapshot::Text(_) => None,
            Snapshot::Record(fields) => Some(fields),
        }
    }

    /// Looks up a field of a record snapshot.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.as_record().and_then(|fields| fields.get(name))
    }

    /// Looks up a text field of a record snapshot.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_text)
    }
}
