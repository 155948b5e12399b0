//! Application configuration: load, save, and sanitize.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::resolve_data_dir;

/// File name of the local document backup database inside the data dir.
const BACKUP_DB_FILE: &str = "backups.redb";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Whether edited documents are written to the local backup store.
    pub backup_enabled: bool,
    /// Directory holding the backup database. Empty = resolved automatically.
    pub data_dir: String,
    /// Whether to print per-entity undo/redo availability after a run.
    pub show_history_summary: bool,
    /// Whether document output is pretty-printed JSON.
    pub pretty_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            backup_enabled: true,
            data_dir: String::new(),
            show_history_summary: true,
            pretty_output: true,
        }
    }
}

impl AppConfig {
    /// Returns the config file path: exe directory + `folio.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("folio.json")))
            .unwrap_or_else(|| PathBuf::from("folio.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Broken files are left alone for the user to fix.
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Returns the effective data directory.
    ///
    /// Resolution order:
    /// 1. `data_dir` (if non-empty)
    /// 2. [`resolve_data_dir`]
    pub fn effective_data_dir(&self) -> PathBuf {
        if self.data_dir.is_empty() {
            resolve_data_dir()
        } else {
            PathBuf::from(&self.data_dir)
        }
    }

    /// Path of the local backup database.
    pub fn backup_db_path(&self) -> PathBuf {
        self.effective_data_dir().join(BACKUP_DB_FILE)
    }

    /// Resets invalid fields.
    pub fn sanitize(&mut self) {
        let filter = self.log_filter.trim();
        self.log_filter = if filter.is_empty() {
            "info".to_string()
        } else {
            filter.to_string()
        };
        self.data_dir = self.data_dir.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_filter, "info");
        assert!(config.backup_enabled);
        assert!(config.data_dir.is_empty());
        assert!(config.show_history_summary);
        assert!(config.pretty_output);
    }

    #[test]
    fn test_sanitize_resets_blank_log_filter() {
        let mut config = AppConfig::default();
        config.log_filter = "   ".to_string();
        config.sanitize();
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_sanitize_keeps_custom_filter() {
        let mut config = AppConfig::default();
        config.log_filter = " folio_core=debug ".to_string();
        config.sanitize();
        assert_eq!(config.log_filter, "folio_core=debug");
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let mut config = AppConfig::default();
        config.data_dir = "/srv/folio".to_string();
        assert_eq!(config.effective_data_dir(), PathBuf::from("/srv/folio"));
        assert_eq!(
            config.backup_db_path(),
            PathBuf::from("/srv/folio").join("backups.redb")
        );
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let json = r#"{"backup_enabled": false}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert!(!parsed.backup_enabled);
        assert_eq!(parsed.log_filter, "info");
        assert!(parsed.pretty_output);
    }
}
