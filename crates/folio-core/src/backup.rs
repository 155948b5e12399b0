//! Local document backups, backed by redb.
//!
//! Only whole documents are stored, never their undo/redo history.
//! Restoring a backup re-seeds history from scratch.
//!
//! Metadata (kind, timestamp) is stored in a redb table as bincode. The
//! document itself is stored as JSON text in a separate table, the same
//! shape the backend receives.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, TimeZone};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::document::{DocumentKind, DocumentStore};

/// Backup metadata table: key → bincode(`BackupMeta`).
const BACKUP_META: TableDefinition<&str, &[u8]> = TableDefinition::new("backup_meta");

/// Backup content table: key → document JSON.
const BACKUP_CONTENT: TableDefinition<&str, &str> = TableDefinition::new("backup_content");

/// Describes one stored backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMeta {
    pub kind: DocumentKind,
    /// Milliseconds since the Unix epoch.
    pub saved_at_ms: i64,
}

impl BackupMeta {
    /// Save time in the local timezone.
    pub fn saved_at(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.saved_at_ms).single()
    }
}

/// Persistence layer for local document backups.
pub struct BackupStore {
    db: Database,
}

impl std::fmt::Debug for BackupStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupStore").finish()
    }
}

impl BackupStore {
    /// Opens or creates the backup database at `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create backup directory: {}", parent.display())
            })?;
        }
        let db = Database::create(path)
            .with_context(|| format!("Failed to open backup database: {}", path.display()))?;

        // Ensure tables exist
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial backup write transaction")?;
        {
            let _ = write_txn
                .open_table(BACKUP_META)
                .context("Failed to create backup_meta table")?;
            let _ = write_txn
                .open_table(BACKUP_CONTENT)
                .context("Failed to create backup_content table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial backup transaction")?;

        Ok(Self { db })
    }

    /// Stores `document` under `key`, replacing any previous backup.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write transaction fails.
    pub fn save<D: DocumentStore + Serialize>(&self, key: &str, document: &D) -> Result<()> {
        let json = serde_json::to_string(document).context("Failed to serialize document")?;
        let meta = BackupMeta {
            kind: D::KIND,
            saved_at_ms: chrono::Utc::now().timestamp_millis(),
        };
        let meta_bytes = bincode::serialize(&meta).context("Failed to serialize backup meta")?;

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(BACKUP_META)
                .context("Failed to open backup_meta table")?;
            table
                .insert(key, meta_bytes.as_slice())
                .context("Failed to insert backup meta")?;
        }
        {
            let mut table = write_txn
                .open_table(BACKUP_CONTENT)
                .context("Failed to open backup_content table")?;
            table
                .insert(key, json.as_str())
                .context("Failed to insert backup content")?;
        }
        write_txn.commit().context("Failed to commit backup")?;
        tracing::info!(key, kind = D::KIND.label(), "document backed up");
        Ok(())
    }

    /// Loads the backup stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup holds a different kind of document or
    /// cannot be deserialized.
    pub fn load<D: DocumentStore + DeserializeOwned>(&self, key: &str) -> Result<Option<D>> {
        let Some(meta) = self.meta(key)? else {
            return Ok(None);
        };
        if meta.kind != D::KIND {
            bail!(
                "Backup '{key}' holds a {}, not a {}",
                meta.kind.label(),
                D::KIND.label()
            );
        }

        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(BACKUP_CONTENT)
            .context("Failed to open backup_content table")?;

        match table.get(key).context("Failed to read backup content")? {
            Some(guard) => {
                let document = serde_json::from_str(guard.value())
                    .with_context(|| format!("Failed to deserialize backup '{key}'"))?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    /// Loads metadata for the backup stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction or deserialization fails.
    pub fn meta(&self, key: &str) -> Result<Option<BackupMeta>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(BACKUP_META)
            .context("Failed to open backup_meta table")?;

        match table.get(key).context("Failed to read backup meta")? {
            Some(guard) => {
                let meta: BackupMeta = bincode::deserialize(guard.value())
                    .context("Failed to deserialize backup meta")?;
                Ok(Some(meta))
            }
            None => Ok(None),
        }
    }

    /// Removes the backup stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the write transaction fails.
    pub fn delete(&self, key: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(BACKUP_META)
                .context("Failed to open backup_meta table")?;
            table.remove(key).context("Failed to remove backup meta")?;
        }
        {
            let mut table = write_txn
                .open_table(BACKUP_CONTENT)
                .context("Failed to open backup_content table")?;
            table
                .remove(key)
                .context("Failed to remove backup content")?;
        }
        write_txn.commit().context("Failed to commit deletion")?;
        Ok(())
    }

    /// Lists all stored backups, sorted by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction fails.
    pub fn list(&self) -> Result<Vec<(String, BackupMeta)>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(BACKUP_META)
            .context("Failed to open backup_meta table")?;

        let mut backups = Vec::new();
        for entry in table.iter().context("Failed to iterate backup_meta table")? {
            let (key_guard, value_guard) = entry.context("Failed to read backup entry")?;
            let meta: BackupMeta = bincode::deserialize(value_guard.value())
                .context("Failed to deserialize backup meta")?;
            backups.push((key_guard.value().to_string(), meta));
        }
        Ok(backups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{CoverLetter, Website};
    use tempfile::TempDir;

    fn open_test_store() -> (BackupStore, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let store = BackupStore::open(&dir.path().join("backups.redb")).expect("open db");
        (store, dir)
    }

    #[test]
    fn test_open_creates_empty_store() {
        let (store, _dir) = open_test_store();
        assert!(store.list().expect("list").is_empty());
    }

    #[test]
    fn test_open_creates_missing_parent_dir() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("nested").join("backups.redb");
        BackupStore::open(&path).expect("open db");
        assert!(path.exists());
    }

    #[test]
    fn test_save_and_load() {
        let (store, _dir) = open_test_store();
        let mut letter = CoverLetter::default();
        letter.push_paragraph("Hello");

        store.save("letter-1", &letter).expect("save");
        let loaded: CoverLetter = store.load("letter-1").expect("load").expect("exists");
        assert_eq!(loaded, letter);

        let meta = store.meta("letter-1").expect("meta").expect("exists");
        assert_eq!(meta.kind, DocumentKind::CoverLetter);
        assert!(meta.saved_at().is_some());
    }

    #[test]
    fn test_load_missing_key() {
        let (store, _dir) = open_test_store();
        let loaded: Option<Website> = store.load("nope").expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_wrong_kind_fails() {
        let (store, _dir) = open_test_store();
        store.save("site", &Website::default()).expect("save");
        let err = store.load::<CoverLetter>("site").unwrap_err();
        assert!(err.to_string().contains("website"));
    }

    #[test]
    fn test_overwrite_and_delete() {
        let (store, _dir) = open_test_store();
        let mut letter = CoverLetter::default();
        store.save("k", &letter).expect("save");
        letter.push_paragraph("second");
        store.save("k", &letter).expect("overwrite");

        let loaded: CoverLetter = store.load("k").expect("load").expect("exists");
        assert_eq!(loaded.paragraphs, vec!["second".to_string()]);

        store.delete("k").expect("delete");
        assert!(store.meta("k").expect("meta").is_none());
        assert!(store.list().expect("list").is_empty());
    }

    #[test]
    fn test_list_sorted_by_key() {
        let (store, _dir) = open_test_store();
        store.save("b", &Website::default()).expect("save");
        store.save("a", &CoverLetter::default()).expect("save");

        let keys: Vec<String> = store
            .list()
            .expect("list")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
