mod script;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use folio_config::AppConfig;
use folio_core::{BackupStore, CoverLetter, DocumentStore, Editor, Website};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Replays section edits on cover letters and websites with per-section undo/redo.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Config file (defaults to `folio.json` next to the executable).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a document, replay an edit script, and print the result.
    Run {
        /// Document JSON file.
        document: PathBuf,
        #[arg(long, value_enum)]
        kind: Kind,
        /// JSON array of edit/undo/redo actions.
        #[arg(long)]
        script: Option<PathBuf>,
        /// Store the edited document as a local backup under this key.
        #[arg(long)]
        backup: Option<String>,
        /// Write the document here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Restore a local backup, optionally replay a script, and print the result.
    Restore {
        key: String,
        #[arg(long, value_enum)]
        kind: Kind,
        #[arg(long)]
        script: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List local backups.
    Backups,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Cover letter (header, paragraphs, footer).
    Letter,
    /// Website (global block plus named code blocks).
    Site,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_or_create(&config_path);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!("Starting folio");

    match cli.command {
        Command::Run {
            document,
            kind,
            script,
            backup,
            output,
        } => {
            let session = Session {
                config: &config,
                script: script.as_deref(),
                output: output.as_deref(),
            };
            match kind {
                Kind::Letter => session.run::<CoverLetter>(&document, backup.as_deref()),
                Kind::Site => session.run::<Website>(&document, backup.as_deref()),
            }
        }
        Command::Restore {
            key,
            kind,
            script,
            output,
        } => {
            let session = Session {
                config: &config,
                script: script.as_deref(),
                output: output.as_deref(),
            };
            match kind {
                Kind::Letter => session.restore::<CoverLetter>(&key),
                Kind::Site => session.restore::<Website>(&key),
            }
        }
        Command::Backups => list_backups(&config),
    }
}

/// Options shared by `run` and `restore`.
struct Session<'a> {
    config: &'a AppConfig,
    script: Option<&'a Path>,
    output: Option<&'a Path>,
}

impl Session<'_> {
    fn run<D>(&self, path: &Path, backup_key: Option<&str>) -> Result<()>
    where
        D: DocumentStore + Serialize + DeserializeOwned,
    {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let document: D = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}: {}", D::KIND.label(), path.display()))?;
        let mut editor = Editor::new(document)?;
        tracing::info!(
            kind = D::KIND.label(),
            entities = editor.history().entity_ids().len(),
            "document loaded"
        );

        self.replay_and_print(&mut editor)?;

        if let Some(key) = backup_key {
            if self.config.backup_enabled {
                let store = BackupStore::open(&self.config.backup_db_path())?;
                store.save(key, editor.document())?;
            } else {
                tracing::warn!(key, "backups are disabled in config; skipping");
            }
        }
        Ok(())
    }

    fn restore<D>(&self, key: &str) -> Result<()>
    where
        D: DocumentStore + Serialize + DeserializeOwned + Default,
    {
        let store = BackupStore::open(&self.config.backup_db_path())?;
        let document: D = store
            .load(key)?
            .with_context(|| format!("No backup named '{key}'"))?;

        let mut editor = Editor::new(D::default())?;
        editor.restore(document)?;
        self.replay_and_print(&mut editor)
    }

    fn replay_and_print<D>(&self, editor: &mut Editor<D>) -> Result<()>
    where
        D: DocumentStore + Serialize,
    {
        if let Some(script_path) = self.script {
            let actions = script::load_script(script_path)?;
            let report = script::replay(editor, &actions)?;
            tracing::info!(
                edits = report.edits,
                applied = report.applied,
                rejected = report.notices.len(),
                "script replayed"
            );
            for notice in &report.notices {
                eprintln!("notice: {notice}");
            }
        }

        if self.config.show_history_summary {
            eprint!("{}", history_summary(editor));
        }

        let json = if self.config.pretty_output {
            serde_json::to_string_pretty(editor.document())
        } else {
            serde_json::to_string(editor.document())
        }
        .context("Failed to serialize document")?;

        match self.output {
            Some(path) => std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => println!("{json}"),
        }
        Ok(())
    }
}

/// One line per entity: `id  versions  position  undo/redo availability`.
fn history_summary<D: DocumentStore>(editor: &Editor<D>) -> String {
    let mut out = String::new();
    if editor.has_unsaved_changes() {
        out.push_str("unsaved changes\n");
    }
    for id in editor.history().entity_ids() {
        let Some(history) = editor.history().history(id) else {
            continue;
        };
        out.push_str(&format!(
            "{:<20} {:>3} versions  at {:>3}  undo:{:<3} redo:{}\n",
            id.as_str(),
            history.len(),
            history.index(),
            if history.can_undo() { "yes" } else { "no" },
            if history.can_redo() { "yes" } else { "no" },
        ));
    }
    out
}

fn list_backups(config: &AppConfig) -> Result<()> {
    let store = BackupStore::open(&config.backup_db_path())?;
    let backups = store.list()?;
    if backups.is_empty() {
        println!("no backups in {}", config.backup_db_path().display());
        return Ok(());
    }
    for (key, meta) in backups {
        let saved = meta
            .saved_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("{key:<24} {:<12} {saved}", meta.kind.label());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::history::{EntityId, Snapshot};
    use folio_core::CoverLetterEditor;

    #[test]
    fn test_history_summary_lists_entities() {
        let mut letter = CoverLetter::default();
        letter.push_paragraph("Hi");
        let mut editor = CoverLetterEditor::new(letter).unwrap();
        editor
            .edit(&EntityId::paragraph(0), Snapshot::text("Hello"))
            .unwrap();

        let summary = history_summary(&editor);
        assert!(summary.starts_with("unsaved changes\n"));
        assert!(summary.contains("paragraph-0"));
        assert!(summary.contains("2 versions"));
        assert!(summary.contains("undo:yes"));
        assert!(summary.contains("redo:no"));
    }

    #[test]
    fn test_run_writes_output_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("site.json");
        let script_path = dir.path().join("actions.json");
        let out_path = dir.path().join("out.json");
        std::fs::write(
            &doc_path,
            r#"{"global": {"html": "", "css": "", "js": ""},
                "code_bloks": [{"name": "hero", "html": "<h1>A</h1>", "css": "", "js": ""}]}"#,
        )
        .unwrap();
        std::fs::write(
            &script_path,
            r#"[{"action": "edit", "entity": "hero", "content": {"html": "<h1>B</h1>"}},
                {"action": "undo", "entity": "hero"},
                {"action": "undo", "entity": "hero"}]"#,
        )
        .unwrap();

        let config = AppConfig {
            data_dir: dir.path().display().to_string(),
            show_history_summary: false,
            ..AppConfig::default()
        };
        let session = Session {
            config: &config,
            script: Some(script_path.as_path()),
            output: Some(out_path.as_path()),
        };
        session.run::<Website>(&doc_path, Some("site-1")).unwrap();

        let written: Website =
            serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
        assert_eq!(written.block("hero").unwrap().source.html, "<h1>A</h1>");

        let store = BackupStore::open(&config.backup_db_path()).unwrap();
        let backup: Website = store.load("site-1").unwrap().unwrap();
        assert_eq!(backup, written);
    }
}
