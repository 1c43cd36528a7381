//! Core runtime logic for kaser.
//!
//! This module contains the non-UI engine pieces:
//! - [fm]: directory listing and the entry snapshot (see [browse_dir], [DirectoryEntry]).
//! - [formatter]: sorting, filtering and display helpers for entries.
//! - [fileops]: the file operation executor.
//! - [content]: text loading, markdown and source rendering, pagination.
//! - [editor]: the line buffer and atomic save.
//! - [error]: the [FsError] taxonomy.
//! - [terminal]: terminal setup/teardown and the event loop.

pub mod content;
pub mod editor;
pub mod error;
pub mod fileops;
pub mod fm;
pub mod formatter;
pub mod terminal;

pub use content::{ContentRenderer, Document, PlainRenderer, RichRenderer, select_renderer};
pub use editor::EditorBuffer;
pub use error::{FsError, FsResult};
pub use fileops::{OpKind, OpOutcome, OpSettings, PendingOperation, execute};
pub use fm::{DirectoryEntry, DirectoryListing, EntryKind, ListEntry, browse_dir};
pub use formatter::{
    EntryFilter, Formatter, format_entry_kind, format_file_size, format_file_time,
    sanitize_to_exact_width,
};
