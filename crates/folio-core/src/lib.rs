//! Documents, the editor that keeps them in step with their undo/redo
//! history, and the local backup store.

pub mod backup;
pub mod document;
pub mod editor;
pub mod history;

pub use backup::{BackupMeta, BackupStore};
pub use document::{
    BlockSource, CodeBlock, CoverLetter, DocumentKind, DocumentStore, LetterFooter, LetterHeader,
    Website,
};
pub use editor::{CoverLetterEditor, EditOutcome, Editor, SiteBlockEditor};
