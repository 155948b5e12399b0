// Integration tests for editors and local backups.
//
// These tests run realistic editing sessions: load a document, edit and
// undo sections, back the document up, and restore it into a fresh editor.

use folio_core::history::{EntityId, HistoryRejection, Snapshot};
use folio_core::{
    BackupStore, BlockSource, CodeBlock, CoverLetter, CoverLetterEditor, DocumentStore,
    EditOutcome, LetterHeader, SiteBlockEditor, Website,
};

fn letter() -> CoverLetter {
    CoverLetter {
        header: Some(LetterHeader {
            sender_name: "John".to_string(),
            ..LetterHeader::default()
        }),
        paragraphs: vec![String::new(), "Second".to_string()],
        footer: None,
    }
}

fn site() -> Website {
    Website {
        global: BlockSource {
            css: "body { margin: 0 }".to_string(),
            ..BlockSource::default()
        },
        code_blocks: vec![CodeBlock {
            name: "hero-block".to_string(),
            source: BlockSource {
                html: "<h1>Hello</h1>".to_string(),
                ..BlockSource::default()
            },
        }],
    }
}

fn sender(name: &str) -> Snapshot {
    Snapshot::record([("sender_name", name)])
}

fn sender_name(editor: &CoverLetterEditor) -> &str {
    &editor.document().header.as_ref().unwrap().sender_name
}

// ── Cover Letter ───────────────────────────────────────────────────────

#[test]
fn test_header_branching_session() {
    let mut editor = CoverLetterEditor::new(letter()).unwrap();
    let id = EntityId::header();

    editor.edit(&id, sender("Jane")).unwrap();
    editor.edit(&id, sender("Jo")).unwrap();

    assert!(editor.undo(&id).unwrap().is_applied());
    assert_eq!(sender_name(&editor), "Jane");
    assert!(editor.can_redo(&id));

    editor.edit(&id, sender("J")).unwrap();
    assert_eq!(editor.history().history(&id).unwrap().len(), 3);
    assert!(!editor.can_redo(&id));

    assert!(editor.undo(&id).unwrap().is_applied());
    assert_eq!(sender_name(&editor), "Jane");
    assert!(editor.undo(&id).unwrap().is_applied());
    assert_eq!(sender_name(&editor), "John");
    assert_eq!(
        editor.undo(&id).unwrap(),
        EditOutcome::Rejected(HistoryRejection::NoPreviousState)
    );
    assert_eq!(sender_name(&editor), "John");
}

#[test]
fn test_paragraph_edits_do_not_affect_other_sections() {
    let mut editor = CoverLetterEditor::new(letter()).unwrap();
    let first = EntityId::paragraph(0);
    let second = EntityId::paragraph(1);

    editor.edit(&first, Snapshot::text("Opening")).unwrap();
    editor.edit(&first, Snapshot::text("Opening line")).unwrap();
    editor.undo(&first).unwrap();

    assert_eq!(editor.document().paragraphs[1], "Second");
    assert!(!editor.can_undo(&second));
    assert_eq!(
        editor.redo(&second).unwrap(),
        EditOutcome::Rejected(HistoryRejection::AlreadyLatest)
    );
    assert_eq!(editor.document().paragraphs[0], "Opening");
}

// ── Website ────────────────────────────────────────────────────────────

#[test]
fn test_site_blocks_undo_independently() {
    let mut editor = SiteBlockEditor::new(site()).unwrap();
    let global = EntityId::global();
    let hero = EntityId::block("hero-block");

    editor
        .edit(&global, Snapshot::record([("css", "body { margin: 1rem }")]))
        .unwrap();
    editor
        .edit(&hero, Snapshot::record([("html", "<h1>Hi there</h1>")]))
        .unwrap();

    editor.undo(&global).unwrap();
    assert_eq!(editor.document().global.css, "body { margin: 0 }");
    assert_eq!(
        editor.document().block("hero-block").unwrap().source.html,
        "<h1>Hi there</h1>"
    );

    editor.undo(&hero).unwrap();
    assert_eq!(
        editor.document().block("hero-block").unwrap().source.html,
        "<h1>Hello</h1>"
    );
    for id in editor.document().entity_ids() {
        assert_eq!(
            editor.current(&id).unwrap().as_ref(),
            editor.history().current(&id)
        );
    }
}

// ── Backup And Restore ─────────────────────────────────────────────────

#[test]
fn test_backup_restore_reseeds_history() {
    let dir = tempfile::tempdir().unwrap();
    let store = BackupStore::open(&dir.path().join("backups.redb")).unwrap();

    let mut editor = CoverLetterEditor::new(letter()).unwrap();
    let id = EntityId::header();
    editor.edit(&id, sender("Jane")).unwrap();
    store.save("letter-42", editor.document()).unwrap();
    drop(store);

    let store = BackupStore::open(&dir.path().join("backups.redb")).unwrap();
    let backup: CoverLetter = store.load("letter-42").unwrap().unwrap();

    let mut restored = CoverLetterEditor::new(letter()).unwrap();
    restored.restore(backup).unwrap();

    assert_eq!(sender_name(&restored), "Jane");
    assert!(!restored.can_undo(&id));
    assert!(restored.has_unsaved_changes());
}
