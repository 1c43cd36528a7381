//! Line buffer editor for kaser.
//!
//! [EditorBuffer] holds a file as lines plus a cursor. Saving writes to a temp
//! file in the same directory and persists it over the original, so an
//! interrupted save never leaves a half-written file. Line endings, a leading
//! BOM and the final newline are written back the way they were read.

use crate::core::content::TextFile;
use crate::core::error::{FsError, FsResult, IoResultExt};

use tempfile::NamedTempFile;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const UTF8_BOM: &str = "\u{FEFF}";

#[derive(Debug, Clone)]
pub struct EditorBuffer {
    path: PathBuf,
    lines: Vec<String>,
    dirty: bool,
    crlf: bool,
    had_bom: bool,
    trailing_newline: bool,
    row: usize,
    col: usize,
    overwrite: bool,
}

impl EditorBuffer {
    pub fn open(path: &Path) -> FsResult<Self> {
        Ok(Self::from_text_file(TextFile::load(path)?))
    }

    pub fn from_text_file(file: TextFile) -> Self {
        let mut lines = file.lines();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            path: file.path().to_path_buf(),
            crlf: file.uses_crlf(),
            had_bom: file.had_bom(),
            trailing_newline: file.ends_with_newline(),
            lines,
            dirty: false,
            row: 0,
            col: 0,
            overwrite: false,
        }
    }

    // Accessors

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Cursor as (row, column in chars).
    #[inline]
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    #[inline]
    pub fn is_overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn encoding_label(&self) -> &'static str {
        match (self.had_bom, self.crlf) {
            (true, true) => "UTF-8 BOM CRLF",
            (true, false) => "UTF-8 BOM",
            (false, true) => "UTF-8 CRLF",
            (false, false) => "UTF-8",
        }
    }

    fn current_len(&self) -> usize {
        self.lines[self.row].chars().count()
    }

    fn byte_at(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    // Cursor movement

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.current_len());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.current_len());
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.current_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.current_len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.current_len();
    }

    pub fn page_up(&mut self, height: usize) {
        self.row = self.row.saturating_sub(height.max(1));
        self.col = self.col.min(self.current_len());
    }

    pub fn page_down(&mut self, height: usize) {
        self.row = (self.row + height.max(1)).min(self.lines.len() - 1);
        self.col = self.col.min(self.current_len());
    }

    pub fn toggle_overwrite(&mut self) {
        self.overwrite = !self.overwrite;
    }

    // Editing

    /// Inserts `c` at the cursor, or replaces the char under it in overwrite mode.
    pub fn insert_char(&mut self, c: char) {
        let col = self.col;
        let line = &mut self.lines[self.row];
        let at = Self::byte_at(line, col);
        if self.overwrite && at < line.len() {
            let next = Self::byte_at(line, col + 1);
            line.replace_range(at..next, c.encode_utf8(&mut [0; 4]));
        } else {
            line.insert(at, c);
        }
        self.col += 1;
        self.dirty = true;
    }

    /// Splits the current line at the cursor.
    pub fn insert_newline(&mut self) {
        let line = &mut self.lines[self.row];
        let at = Self::byte_at(line, self.col);
        let tail = line.split_off(at);
        self.lines.insert(self.row + 1, tail);
        self.row += 1;
        self.col = 0;
        self.dirty = true;
    }

    /// Deletes before the cursor, joining with the previous line at column 0.
    pub fn backspace(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let start = Self::byte_at(line, self.col - 1);
            let end = Self::byte_at(line, self.col);
            line.replace_range(start..end, "");
            self.col -= 1;
            self.dirty = true;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.current_len();
            self.lines[self.row].push_str(&line);
            self.dirty = true;
        }
    }

    /// Deletes under the cursor, joining with the next line at the end.
    pub fn delete(&mut self) {
        if self.col < self.current_len() {
            let line = &mut self.lines[self.row];
            let start = Self::byte_at(line, self.col);
            let end = Self::byte_at(line, self.col + 1);
            line.replace_range(start..end, "");
            self.dirty = true;
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            self.dirty = true;
        }
    }

    /// Replaces a whole line. Out-of-range rows are ignored.
    pub fn replace_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            *line = text.to_string();
            if row == self.row {
                self.col = self.col.min(self.current_len());
            }
            self.dirty = true;
        }
    }

    /// Removes the cursor line. The buffer always keeps one line.
    pub fn delete_line(&mut self) {
        if self.lines.len() == 1 {
            self.lines[0].clear();
        } else {
            self.lines.remove(self.row);
            self.row = self.row.min(self.lines.len() - 1);
        }
        self.col = self.col.min(self.current_len());
        self.dirty = true;
    }

    /// The text as it will be written, BOM excluded.
    ///
    /// A file that contained any CRLF when loaded is written with CRLF after
    /// every line, so mixed endings are normalized on save.
    pub fn contents(&self) -> String {
        let eol = if self.crlf { "\r\n" } else { "\n" };
        let mut out = self.lines.join(eol);
        if self.trailing_newline {
            out.push_str(eol);
        }
        out
    }

    /// Writes the buffer back atomically.
    ///
    /// With `backup` the current file is first copied to `<name>.bak`. On failure
    /// the buffer stays dirty so the user can retry or discard.
    pub fn save(&mut self, backup: bool) -> FsResult<()> {
        // Write through symlinks so the link itself survives the rename.
        let target = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let existing = fs::metadata(&target).ok();
        if backup && existing.is_some() {
            fs::copy(&target, backup_path(&self.path)).at(&self.path)?;
        }

        let mut tmp = NamedTempFile::new_in(dir).at(dir)?;
        if self.had_bom {
            tmp.write_all(UTF8_BOM.as_bytes()).at(tmp.path())?;
        }
        tmp.write_all(self.contents().as_bytes()).at(tmp.path())?;
        tmp.as_file().sync_all().at(tmp.path())?;
        if let Some(meta) = existing {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .at(tmp.path())?;
        }
        tmp.persist(&target)
            .map_err(|e| FsError::from_io(e.error, &self.path))?;

        self.dirty = false;
        tracing::info!(path = %self.path.display(), lines = self.lines.len(), "saved");
        Ok(())
    }
}

/// `notes.txt` -> `notes.txt.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error;
    use tempfile::tempdir;

    fn buffer(dir: &Path, name: &str, bytes: &[u8]) -> Result<EditorBuffer, Box<dyn error::Error>> {
        let path = dir.join(name);
        fs::write(&path, bytes)?;
        Ok(EditorBuffer::open(&path)?)
    }

    #[test]
    fn typing_and_line_joins() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let mut buf = buffer(dir.path(), "a.txt", b"hello\nworld\n")?;
        assert!(!buf.is_dirty());

        buf.move_end();
        buf.insert_newline();
        for c in "ß🦀".chars() {
            buf.insert_char(c);
        }
        assert_eq!(buf.lines(), ["hello", "ß🦀", "world"]);
        assert_eq!(buf.cursor(), (1, 2));

        buf.move_home();
        buf.backspace();
        assert_eq!(buf.lines(), ["helloß🦀", "world"]);
        assert_eq!(buf.cursor(), (0, 5));

        buf.move_end();
        buf.delete();
        assert_eq!(buf.lines(), ["helloß🦀world"]);
        assert!(buf.is_dirty());
        Ok(())
    }

    #[test]
    fn overwrite_mode_replaces_chars() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let mut buf = buffer(dir.path(), "a.txt", b"abc")?;
        buf.toggle_overwrite();
        buf.insert_char('X');
        buf.move_end();
        buf.insert_char('Z');
        assert_eq!(buf.lines(), ["XbcZ"]);

        buf.replace_line(0, "fresh");
        assert_eq!(buf.lines(), ["fresh"]);
        assert_eq!(buf.cursor(), (0, 4));
        Ok(())
    }

    #[test]
    fn save_preserves_crlf_bom_and_backs_up() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let mut buf = buffer(dir.path(), "win.txt", b"\xEF\xBB\xBFone\r\ntwo")?;
        buf.move_down();
        buf.move_end();
        buf.insert_char('!');
        buf.save(true)?;

        assert!(!buf.is_dirty());
        assert_eq!(fs::read(dir.path().join("win.txt"))?, b"\xEF\xBB\xBFone\r\ntwo!");
        assert_eq!(
            fs::read(dir.path().join("win.txt.bak"))?,
            b"\xEF\xBB\xBFone\r\ntwo"
        );
        Ok(())
    }

    #[test]
    fn mixed_line_endings_save_as_crlf() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let mut buf = buffer(dir.path(), "mixed.txt", b"a\r\nb\nc\r\n")?;
        buf.insert_char('>');
        buf.save(false)?;
        assert_eq!(fs::read(dir.path().join("mixed.txt"))?, b">a\r\nb\r\nc\r\n");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn save_through_symlink_keeps_link() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let real = dir.path().join("real.txt");
        let link = dir.path().join("link.txt");
        fs::write(&real, "old\n")?;
        std::os::unix::fs::symlink(&real, &link)?;

        let mut buf = EditorBuffer::from_text_file(TextFile::load(&link)?);
        buf.move_end();
        buf.insert_char('!');
        buf.save(true)?;

        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read_link(&link)?, real);
        assert_eq!(fs::read_to_string(&real)?, "old!\n");
        assert_eq!(fs::read_to_string(dir.path().join("link.txt.bak"))?, "old\n");
        Ok(())
    }

    #[test]
    fn failed_save_keeps_buffer_dirty() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let sub = dir.path().join("sub");
        fs::create_dir(&sub)?;
        let mut buf = buffer(&sub, "gone.txt", b"text\n")?;
        buf.insert_char('x');
        fs::remove_dir_all(&sub)?;

        assert!(buf.save(false).is_err());
        assert!(buf.is_dirty());
        assert_eq!(buf.lines(), ["xtext"]);
        Ok(())
    }

    #[test]
    fn delete_line_keeps_one_line() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let mut buf = buffer(dir.path(), "a.txt", b"")?;
        assert_eq!(buf.lines(), [""]);
        buf.insert_char('q');
        buf.delete_line();
        assert_eq!(buf.lines(), [""]);
        assert_eq!(buf.contents(), "");
        Ok(())
    }
}
