//! File and directory listing logic for kaser.
//!
//! Provides the [DirectoryEntry] snapshot, the [EntryKind] tag decided once per entry,
//! and [DirectoryListing], the point-in-time listing with the synthetic
//! parent/root rows prepended.

use crate::core::error::{FsResult, IoResultExt};
use crate::core::formatter::Formatter;

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What a directory entry is, decided when the entry is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// Immutable snapshot of one filesystem entry.
///
/// Re-derived every time a directory is listed, never patched in place.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    name: Box<OsStr>,
    lowercase_name: Box<str>,
    kind: EntryKind,
    size: u64,
    modified: Option<SystemTime>,
    flags: u8,
}

impl DirectoryEntry {
    // Flag bit definitions
    pub(crate) const IS_HIDDEN: u8 = 1 << 0;
    pub(crate) const IS_EXECUTABLE: u8 = 1 << 1;
    pub(crate) const LINKS_TO_DIR: u8 = 1 << 2;
    pub(crate) const IS_BROKEN_LINK: u8 = 1 << 3;

    #[cfg(unix)]
    const EXEC_FLAG: u32 = 0o111;

    pub fn new(
        name: OsString,
        kind: EntryKind,
        size: u64,
        modified: Option<SystemTime>,
        flags: u8,
    ) -> Self {
        let lowercase_name = name.to_string_lossy().to_lowercase().into_boxed_str();
        DirectoryEntry {
            name: name.into_boxed_os_str(),
            lowercase_name,
            kind,
            size,
            modified,
            flags,
        }
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub fn lowercase_name(&self) -> &str {
        &self.lowercase_name
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags & Self::IS_HIDDEN != 0
    }

    #[inline]
    pub fn is_executable(&self) -> bool {
        self.flags & Self::IS_EXECUTABLE != 0
    }

    #[inline]
    pub fn is_broken_link(&self) -> bool {
        self.flags & Self::IS_BROKEN_LINK != 0
    }

    /// True for directories and for symlinks that resolve to a directory.
    #[inline]
    pub fn is_dir_like(&self) -> bool {
        self.kind == EntryKind::Directory || self.flags & Self::LINKS_TO_DIR != 0
    }

    /// Lowercased extension without the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        let name = self.lowercase_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }

    /// Reads a single path into an entry.
    pub fn from_path(path: &Path) -> FsResult<Self> {
        let meta = fs::symlink_metadata(path).at(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| path.as_os_str().to_os_string());
        Ok(Self::from_metadata(name, path, &meta))
    }

    fn from_metadata(name: OsString, path: &Path, meta: &fs::Metadata) -> Self {
        let ft = meta.file_type();
        let mut flags = 0u8;

        let kind = if ft.is_symlink() {
            match fs::metadata(path) {
                Ok(target) if target.is_dir() => flags |= Self::LINKS_TO_DIR,
                Ok(_) => {}
                Err(_) => flags |= Self::IS_BROKEN_LINK,
            }
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            use std::os::unix::fs::PermissionsExt;

            if name.as_bytes().first() == Some(&b'.') {
                flags |= Self::IS_HIDDEN;
            }
            if kind == EntryKind::File && meta.permissions().mode() & Self::EXEC_FLAG != 0 {
                flags |= Self::IS_EXECUTABLE;
            }
        }

        #[cfg(windows)]
        {
            use std::os::windows::fs::MetadataExt;
            if meta.file_attributes() & 0x2 != 0 {
                flags |= Self::IS_HIDDEN;
            }
        }

        let size = if kind == EntryKind::File { meta.len() } else { 0 };
        DirectoryEntry::new(name, kind, size, meta.modified().ok(), flags)
    }
}

/// Reads the contents of the provided directory into unsorted [DirectoryEntry] values.
///
/// Entries that vanish or cannot be stat'ed mid-listing are skipped.
pub fn browse_dir(path: &Path) -> FsResult<Vec<DirectoryEntry>> {
    let mut entries = Vec::with_capacity(64);

    for entry in fs::read_dir(path).at(path)? {
        let Ok(entry) = entry else {
            continue;
        };
        let entry_path = entry.path();
        let Ok(meta) = fs::symlink_metadata(&entry_path) else {
            continue;
        };
        entries.push(DirectoryEntry::from_metadata(
            entry.file_name(),
            &entry_path,
            &meta,
        ));
    }
    Ok(entries)
}

/// One row of a [DirectoryListing].
#[derive(Debug, Clone)]
pub enum ListEntry {
    /// Synthetic `..` row.
    Parent,
    /// Synthetic `/` row.
    Root,
    Entry(DirectoryEntry),
}

impl ListEntry {
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, ListEntry::Entry(_))
    }

    #[inline]
    pub fn entry(&self) -> Option<&DirectoryEntry> {
        match self {
            ListEntry::Entry(e) => Some(e),
            _ => None,
        }
    }

    pub fn display_name(&self) -> Cow<'_, str> {
        match self {
            ListEntry::Parent => Cow::Borrowed(".."),
            ListEntry::Root => Cow::Borrowed("/"),
            ListEntry::Entry(e) => e.name_str(),
        }
    }
}

/// Point-in-time listing of one directory.
///
/// Synthetic rows always come first: `..` (omitted at the filesystem root) then `/`.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    path: PathBuf,
    rows: Vec<ListEntry>,
}

impl DirectoryListing {
    /// Lists `path`, applying the formatter's hidden-entry rule and sort order.
    pub fn read(path: &Path, formatter: &Formatter) -> FsResult<Self> {
        let mut entries = browse_dir(path)?;
        formatter.filter_entries(&mut entries);
        Ok(Self::from_entries(path.to_path_buf(), entries))
    }

    /// Builds a listing from already sorted entries.
    pub fn from_entries(path: PathBuf, entries: Vec<DirectoryEntry>) -> Self {
        let mut rows = Vec::with_capacity(entries.len() + 2);
        if path.parent().is_some() {
            rows.push(ListEntry::Parent);
        }
        rows.push(ListEntry::Root);
        rows.extend(entries.into_iter().map(ListEntry::Entry));
        DirectoryListing { path, rows }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn rows(&self) -> &[ListEntry] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of leading synthetic rows.
    pub fn synthetic_len(&self) -> usize {
        self.rows.iter().take_while(|r| r.is_synthetic()).count()
    }

    pub fn real_entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.rows.iter().filter_map(ListEntry::entry)
    }

    /// Row index of the entry named `name`, if present.
    pub fn position_of(&self, name: &OsStr) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.entry().is_some_and(|e| e.name() == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortBy;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn entry_kind_and_flags() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let file_path = tmp.path().join("hello.txt");
        let mut file = File::create(&file_path)?;
        writeln!(file, "abc123")?;
        fs::create_dir(tmp.path().join(".hidden_dir"))?;

        let file_entry = DirectoryEntry::from_path(&file_path)?;
        assert_eq!(file_entry.kind(), EntryKind::File);
        assert_eq!(file_entry.size(), 7);
        assert_eq!(file_entry.extension(), Some("txt"));
        assert!(!file_entry.is_dir_like());

        let dir_entry = DirectoryEntry::from_path(&tmp.path().join(".hidden_dir"))?;
        assert_eq!(dir_entry.kind(), EntryKind::Directory);
        assert_eq!(dir_entry.size(), 0);
        #[cfg(unix)]
        assert!(dir_entry.is_hidden());
        assert_eq!(dir_entry.extension(), None);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_dir_is_dir_like() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let target = tmp.path().join("real");
        fs::create_dir(&target)?;
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link)?;

        let entry = DirectoryEntry::from_path(&link)?;
        assert_eq!(entry.kind(), EntryKind::Symlink);
        assert!(entry.is_dir_like());
        assert!(!entry.is_broken_link());
        Ok(())
    }

    #[test]
    fn listing_has_synthetic_rows_first() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        for name in ["b.txt", "a.txt", "c.txt"] {
            File::create(tmp.path().join(name))?;
        }
        let formatter = Formatter::new(true, false, SortBy::Name);
        let listing = DirectoryListing::read(tmp.path(), &formatter)?;

        assert_eq!(listing.len(), 3 + 2);
        assert!(matches!(listing.rows()[0], ListEntry::Parent));
        assert!(matches!(listing.rows()[1], ListEntry::Root));
        assert_eq!(listing.synthetic_len(), 2);
        assert_eq!(listing.position_of(OsStr::new("a.txt")), Some(2));
        Ok(())
    }

    #[test]
    fn listing_at_root_omits_parent_row() {
        #[cfg(unix)]
        let root = PathBuf::from("/");
        #[cfg(windows)]
        let root = PathBuf::from("C:\\");

        let listing = DirectoryListing::from_entries(root, Vec::new());
        assert_eq!(listing.len(), 1);
        assert!(matches!(listing.rows()[0], ListEntry::Root));
    }

    #[test]
    fn browse_nonexistent() {
        let path = PathBuf::from("/path/does/not/exist");
        assert!(browse_dir(&path).is_err());
    }
}
