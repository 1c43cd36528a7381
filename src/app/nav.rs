//! Navigation state for kaser.
//!
//! [NavState] owns the current directory, its [DirectoryListing], the cursor and
//! the filter. The listing is never patched: every directory change or mutation
//! rebuilds it from disk. Filtering only changes which rows are shown.

use crate::core::fm::{DirectoryEntry, DirectoryListing, ListEntry};
use crate::core::formatter::{EntryFilter, Formatter};
use crate::core::error::{FsResult, IoResultExt};

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct NavState {
    listing: DirectoryListing,
    /// Indices into `listing.rows()` currently shown.
    shown: Vec<usize>,
    selected: usize,
    filter: Option<EntryFilter>,
    filter_active: bool,
}

impl NavState {
    /// Lists `path`. Fails without side effects if it cannot be read.
    ///
    /// A relative `path` is resolved against the working directory first so that
    /// `..` and the root row always have somewhere to go.
    pub fn open(path: &Path, formatter: &Formatter) -> FsResult<Self> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            fs::canonicalize(path).at(path)?
        };
        let listing = DirectoryListing::read(&path, formatter)?;
        let mut nav = Self {
            shown: Vec::new(),
            listing,
            selected: 0,
            filter: None,
            filter_active: false,
        };
        nav.rebuild_shown();
        Ok(nav)
    }

    // Getters / Accessors

    #[inline]
    pub fn current_dir(&self) -> &Path {
        self.listing.path()
    }

    #[inline]
    pub fn listing(&self) -> &DirectoryListing {
        &self.listing
    }

    #[inline]
    pub fn selected_idx(&self) -> usize {
        self.selected
    }

    #[inline]
    pub fn filter(&self) -> Option<&EntryFilter> {
        self.filter.as_ref()
    }

    #[inline]
    pub fn filter_active(&self) -> bool {
        self.filter_active
    }

    /// Number of rows shown, synthetic rows included. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &ListEntry> {
        self.shown.iter().map(|&i| &self.listing.rows()[i])
    }

    pub fn selected_row(&self) -> Option<&ListEntry> {
        self.shown
            .get(self.selected)
            .map(|&i| &self.listing.rows()[i])
    }

    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.selected_row().and_then(ListEntry::entry)
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_entry()
            .map(|e| self.current_dir().join(e.name()))
    }

    // Cursor

    /// Moves the cursor up. Stays put at the top.
    pub fn move_up(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        true
    }

    /// Moves the cursor down. Stays put at the bottom.
    pub fn move_down(&mut self) -> bool {
        if self.selected + 1 >= self.shown.len() {
            return false;
        }
        self.selected += 1;
        true
    }

    /// Selects the shown entry named `name`, if any.
    pub fn select_name(&mut self, name: &OsStr) -> bool {
        match self.listing.position_of(name) {
            Some(row) => match self.shown.iter().position(|&i| i == row) {
                Some(pos) => {
                    self.selected = pos;
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    fn clamp(&mut self) {
        self.selected = self.selected.min(self.shown.len().saturating_sub(1));
    }

    // Listing

    /// Switches to `path` with the cursor on the first row.
    /// On failure the current directory and listing stay as they were.
    pub fn change_dir(&mut self, path: &Path, formatter: &Formatter) -> FsResult<()> {
        let listing = DirectoryListing::read(path, formatter)?;
        self.listing = listing;
        self.selected = 0;
        self.rebuild_shown();
        Ok(())
    }

    /// Re-reads the current directory, then selects `focus` or clamps the cursor.
    pub fn refresh(&mut self, formatter: &Formatter, focus: Option<&OsStr>) -> FsResult<()> {
        let keep = self.selected_entry().map(|e| e.name().to_os_string());
        self.listing = DirectoryListing::read(self.listing.path(), formatter)?;
        self.rebuild_shown();

        let target = focus.map(OsStr::to_os_string).or(keep);
        if !target.is_some_and(|name| self.select_name(&name)) {
            self.clamp();
        }
        Ok(())
    }

    // Filter

    /// Stores `filter` and turns filtering on.
    pub fn set_filter(&mut self, filter: EntryFilter) {
        self.filter = Some(filter);
        self.filter_active = true;
        self.refilter();
    }

    /// Flips filtering on or off. Returns false when no filter was chosen yet.
    pub fn toggle_filter(&mut self) -> bool {
        if self.filter.is_none() {
            return false;
        }
        self.filter_active = !self.filter_active;
        self.refilter();
        true
    }

    fn refilter(&mut self) {
        let keep = self.selected_row().map(|r| match r {
            ListEntry::Entry(e) => Some(e.name().to_os_string()),
            _ => None,
        });
        let keep_idx = self.shown.get(self.selected).copied();
        self.rebuild_shown();

        let restored = match keep {
            Some(Some(name)) => self.select_name(&name),
            Some(None) => match keep_idx.and_then(|row| self.shown.iter().position(|&i| i == row)) {
                Some(pos) => {
                    self.selected = pos;
                    true
                }
                None => false,
            },
            None => false,
        };
        if !restored {
            self.clamp();
        }
    }

    fn rebuild_shown(&mut self) {
        let active = self.filter.as_ref().filter(|_| self.filter_active);
        self.shown = self
            .listing
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| match (row, active) {
                (ListEntry::Entry(e), Some(f)) => f.matches(e),
                _ => true,
            })
            .map(|(i, _)| i)
            .collect();
        self.clamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortBy;
    use std::error;
    use std::fs;
    use tempfile::tempdir;

    fn formatter() -> Formatter {
        Formatter::new(true, false, SortBy::Name)
    }

    fn names(nav: &NavState) -> Vec<String> {
        nav.rows().map(|r| r.display_name().into_owned()).collect()
    }

    #[test]
    fn cursor_is_clamped_at_both_ends() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a"), "")?;
        fs::write(dir.path().join("b"), "")?;
        let mut nav = NavState::open(dir.path(), &formatter())?;
        assert_eq!(nav.len(), 4);

        assert!(!nav.move_up());
        assert_eq!(nav.selected_idx(), 0);

        while nav.move_down() {}
        assert_eq!(nav.selected_idx(), 3);
        assert!(!nav.move_down());
        assert_eq!(nav.selected_idx(), 3);
        Ok(())
    }

    #[test]
    fn filter_toggle_restores_listing() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("docs"))?;
        fs::write(dir.path().join("notes.txt"), "")?;
        fs::write(dir.path().join("photo.png"), "")?;
        let mut nav = NavState::open(dir.path(), &formatter())?;
        let before = names(&nav);

        assert!(!nav.toggle_filter());
        nav.set_filter(EntryFilter::Images);
        assert_eq!(names(&nav), ["..", "/", "photo.png"]);

        assert!(nav.toggle_filter());
        assert!(!nav.filter_active());
        assert_eq!(names(&nav), before);
        Ok(())
    }

    #[test]
    fn filter_keeps_or_clamps_cursor() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        for name in ["a.txt", "b.png", "c.txt"] {
            fs::write(dir.path().join(name), "")?;
        }
        let mut nav = NavState::open(dir.path(), &formatter())?;
        nav.select_name(OsStr::new("c.txt"));
        nav.set_filter(EntryFilter::TextFiles);
        assert_eq!(nav.selected_entry().map(|e| e.name_str().into_owned()).as_deref(), Some("c.txt"));

        nav.select_name(OsStr::new("c.txt"));
        nav.set_filter(EntryFilter::Images);
        assert!(nav.selected_idx() < nav.len());
        Ok(())
    }

    #[test]
    fn failed_change_dir_keeps_state() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("file"), "")?;
        let mut nav = NavState::open(dir.path(), &formatter())?;
        nav.move_down();

        assert!(nav.change_dir(&dir.path().join("missing"), &formatter()).is_err());
        assert_eq!(nav.current_dir(), dir.path());
        assert_eq!(nav.selected_idx(), 1);
        Ok(())
    }

    #[test]
    fn refresh_focuses_new_entry() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a"), "")?;
        let mut nav = NavState::open(dir.path(), &formatter())?;
        fs::write(dir.path().join("z"), "")?;
        nav.refresh(&formatter(), Some(OsStr::new("z")))?;
        assert_eq!(nav.selected_entry().map(|e| e.name().to_os_string()), Some("z".into()));
        Ok(())
    }
}
