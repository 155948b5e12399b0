//! Edit scripts replayed through an editor.
//!
//! A script is a JSON array of actions:
//!
//! ```json
//! [
//!   {"action": "edit", "entity": "header", "content": {"sender_name": "Jane"}},
//!   {"action": "undo", "entity": "header"},
//!   {"action": "redo", "entity": "header"}
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use folio_core::history::{EntityId, Snapshot};
use folio_core::{DocumentStore, EditOutcome, Editor};
use serde::Deserialize;

/// One step of an edit script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Edit { entity: EntityId, content: Snapshot },
    Undo { entity: EntityId },
    Redo { entity: EntityId },
}

/// Tally of a replayed script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub edits: usize,
    pub applied: usize,
    /// Notices for undo/redo requests that changed nothing.
    pub notices: Vec<String>,
}

/// Reads a script file.
pub fn load_script(path: &Path) -> Result<Vec<Action>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    parse_script(&text).with_context(|| format!("Invalid script: {}", path.display()))
}

pub fn parse_script(text: &str) -> Result<Vec<Action>> {
    serde_json::from_str(text).context("Failed to parse actions")
}

/// Applies every action in order.
///
/// Rejected undo/redo requests are reported, not treated as failures.
/// Edits the document refuses stop the replay.
pub fn replay<D: DocumentStore>(editor: &mut Editor<D>, actions: &[Action]) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();
    for (step, action) in actions.iter().enumerate() {
        let outcome = match action {
            Action::Edit { entity, content } => {
                editor
                    .edit(entity, content.clone())
                    .with_context(|| format!("Step {step} failed"))?;
                report.edits += 1;
                continue;
            }
            Action::Undo { entity } => (entity, editor.undo(entity)),
            Action::Redo { entity } => (entity, editor.redo(entity)),
        };
        let (entity, result) = outcome;
        match result.with_context(|| format!("Step {step} failed"))? {
            EditOutcome::Applied(_) => report.applied += 1,
            EditOutcome::Rejected(rejection) => {
                tracing::warn!(step, entity = %entity, "{rejection}");
                report.notices.push(format!("{entity}: {rejection}"));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{CoverLetter, CoverLetterEditor, LetterHeader};

    fn editor() -> CoverLetterEditor {
        CoverLetterEditor::new(CoverLetter {
            header: Some(LetterHeader {
                sender_name: "John".to_string(),
                ..LetterHeader::default()
            }),
            paragraphs: vec![String::new()],
            footer: None,
        })
        .unwrap()
    }

    #[test]
    fn test_parse_script() {
        let actions = parse_script(
            r#"[
                {"action": "edit", "entity": "paragraph-0", "content": "Hi"},
                {"action": "edit", "entity": "header", "content": {"sender_name": "Jane"}},
                {"action": "undo", "entity": "header"}
            ]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(
            actions[0],
            Action::Edit {
                entity: EntityId::paragraph(0),
                content: Snapshot::text("Hi"),
            }
        );
        assert_eq!(
            actions[2],
            Action::Undo {
                entity: EntityId::header()
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_action() {
        assert!(parse_script(r#"[{"action": "delete", "entity": "header"}]"#).is_err());
    }

    #[test]
    fn test_replay_counts_and_notices() {
        let mut editor = editor();
        let actions = vec![
            Action::Undo {
                entity: EntityId::paragraph(0),
            },
            Action::Edit {
                entity: EntityId::paragraph(0),
                content: Snapshot::text("Dear team,"),
            },
            Action::Undo {
                entity: EntityId::paragraph(0),
            },
            Action::Redo {
                entity: EntityId::paragraph(0),
            },
            Action::Redo {
                entity: EntityId::paragraph(0),
            },
        ];

        let report = replay(&mut editor, &actions).unwrap();
        assert_eq!(report.edits, 1);
        assert_eq!(report.applied, 2);
        assert_eq!(
            report.notices,
            vec![
                "paragraph-0: No previous state".to_string(),
                "paragraph-0: Already at the latest state".to_string(),
            ]
        );
        assert_eq!(editor.document().paragraphs[0], "Dear team,");
    }

    #[test]
    fn test_replay_stops_on_invalid_edit() {
        let mut editor = editor();
        let actions = vec![
            Action::Edit {
                entity: EntityId::header(),
                content: Snapshot::text("not a record"),
            },
            Action::Edit {
                entity: EntityId::paragraph(0),
                content: Snapshot::text("never applied"),
            },
        ];
        assert!(replay(&mut editor, &actions).is_err());
        assert!(editor.document().paragraphs[0].is_empty());
    }
}
