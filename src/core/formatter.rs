//! Sorting, filtering and display formatting for directory entries in kaser.
//!
//! The [Formatter] carries the listing rules from the `[general]` config section
//! (hidden entries, sort key, directories first). [EntryFilter] is the user-toggled
//! predicate applied on top of an already built listing.

use crate::config::SortBy;
use crate::core::fm::{DirectoryEntry, EntryKind};

use chrono::{DateTime, Local};
use humansize::{BINARY, format_size};
use phf::phf_set;
use unicode_width::UnicodeWidthChar;

use std::cmp::Ordering;
use std::time::SystemTime;

static TEXT_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "txt", "py", "md", "json", "xml", "html", "css", "js", "ini", "cfg", "conf", "log",
    "csv", "rtf", "yml", "yaml", "toml", "sql", "sh", "bat", "ps1", "rs", "c", "h", "cpp",
    "hpp", "go", "java", "ts",
};

static IMAGE_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "svg", "ico", "webp",
};

static ARCHIVE_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "zip", "rar", "7z", "tar", "gz", "bz2", "xz",
};

static EXECUTABLE_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "exe", "msi", "deb", "rpm", "dmg", "app", "bat", "sh", "ps1", "cmd",
};

/// Listing rules: hidden entries, sort key and directory grouping.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    dirs_first: bool,
    show_hidden: bool,
    sort_by: SortBy,
}

impl Formatter {
    pub fn new(dirs_first: bool, show_hidden: bool, sort_by: SortBy) -> Self {
        Self {
            dirs_first,
            show_hidden,
            sort_by,
        }
    }

    /// Sorts the given entries in place.
    ///
    /// Name order is case-insensitive. Size is ascending, modified is newest first,
    /// and both fall back to name order on ties.
    pub fn sort_entries(&self, entries: &mut [DirectoryEntry]) {
        entries.sort_by(|a, b| {
            if self.dirs_first {
                match (a.is_dir_like(), b.is_dir_like()) {
                    (true, false) => return Ordering::Less,
                    (false, true) => return Ordering::Greater,
                    _ => {}
                }
            }
            let by_name = || a.lowercase_name().cmp(b.lowercase_name());
            match self.sort_by {
                SortBy::Name => by_name(),
                SortBy::Size => a.size().cmp(&b.size()).then_with(by_name),
                SortBy::Modified => b.modified().cmp(&a.modified()).then_with(by_name),
            }
        });
    }

    /// Drops hidden entries unless enabled, then sorts.
    pub fn filter_entries(&self, entries: &mut Vec<DirectoryEntry>) {
        if !self.show_hidden {
            entries.retain(|e| !e.is_hidden());
        }
        self.sort_entries(entries);
    }
}

/// User selectable listing predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryFilter {
    FilesOnly,
    DirectoriesOnly,
    TextFiles,
    Images,
    Archives,
    Executables,
    /// Case-insensitive substring of the entry name. Stored lowercased.
    Name(String),
}

impl EntryFilter {
    /// Parses the filter prompt: a preset digit `1`-`6`, or any other text as a name substring.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let filter = match input {
            "" => return None,
            "1" => EntryFilter::FilesOnly,
            "2" => EntryFilter::DirectoriesOnly,
            "3" => EntryFilter::TextFiles,
            "4" => EntryFilter::Images,
            "5" => EntryFilter::Archives,
            "6" => EntryFilter::Executables,
            text => EntryFilter::Name(text.to_lowercase()),
        };
        Some(filter)
    }

    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        let ext_in = |set: &phf::Set<&'static str>| {
            entry.kind() != EntryKind::Directory && entry.extension().is_some_and(|e| set.contains(e))
        };
        match self {
            EntryFilter::FilesOnly => !entry.is_dir_like(),
            EntryFilter::DirectoriesOnly => entry.is_dir_like(),
            EntryFilter::TextFiles => ext_in(&TEXT_EXTENSIONS),
            EntryFilter::Images => ext_in(&IMAGE_EXTENSIONS),
            EntryFilter::Archives => ext_in(&ARCHIVE_EXTENSIONS),
            EntryFilter::Executables => ext_in(&EXECUTABLE_EXTENSIONS),
            EntryFilter::Name(needle) => entry.lowercase_name().contains(needle.as_str()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            EntryFilter::FilesOnly => "files".into(),
            EntryFilter::DirectoriesOnly => "directories".into(),
            EntryFilter::TextFiles => "text files".into(),
            EntryFilter::Images => "images".into(),
            EntryFilter::Archives => "archives".into(),
            EntryFilter::Executables => "executables".into(),
            EntryFilter::Name(s) => format!("\"{}\"", s),
        }
    }

    /// Text shown in the filter prompt when reopening it.
    pub fn prompt_value(&self) -> String {
        match self {
            EntryFilter::FilesOnly => "1".into(),
            EntryFilter::DirectoriesOnly => "2".into(),
            EntryFilter::TextFiles => "3".into(),
            EntryFilter::Images => "4".into(),
            EntryFilter::Archives => "5".into(),
            EntryFilter::Executables => "6".into(),
            EntryFilter::Name(s) => s.clone(),
        }
    }
}

/// Formats the EntryKind into a human-readable string.
pub fn format_entry_kind(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "File",
        EntryKind::Directory => "Directory",
        EntryKind::Symlink => "Symlink",
        EntryKind::Other => "Other",
    }
}

/// Formats a size in bytes, or "-" for entries without one.
pub fn format_file_size(entry: &DirectoryEntry) -> String {
    if entry.kind() == EntryKind::File {
        format_size(entry.size(), BINARY)
    } else {
        "-".to_string()
    }
}

/// Formats the modification time, or "-" if unknown.
pub fn format_file_time(modified: Option<SystemTime>) -> String {
    match modified {
        Some(mtime) => {
            let dt: DateTime<Local> = DateTime::from(mtime);
            dt.format("%Y-%m-%d %H:%M").to_string()
        }
        None => "-".to_string(),
    }
}

/// Fits `line` into exactly `width` terminal cells.
///
/// Control characters are dropped, tabs expand to the next multiple of four,
/// wide characters that would overflow are cut and the remainder is padded with spaces.
pub fn sanitize_to_exact_width(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;

    for ch in line.chars() {
        let (piece_w, is_tab) = match ch {
            '\t' => (4 - used % 4, true),
            c if c.is_control() => continue,
            c => (c.width().unwrap_or(0), false),
        };
        if used + piece_w > width {
            break;
        }
        if is_tab {
            out.extend(std::iter::repeat_n(' ', piece_w));
        } else {
            out.push(ch);
        }
        used += piece_w;
    }

    out.extend(std::iter::repeat_n(' ', width - used));
    out
}
