//! Edit session for kaser.
//!
//! Wraps an [EditorBuffer] with the pieces only the interactive editor needs:
//! the scroll offset, the discard confirmation and the editor status line.

use crate::app::actions::is_yes;
use crate::app::keymap::Key;
use crate::config::Translator;
use crate::core::editor::EditorBuffer;

/// What the engine should do after the editor handled a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSignal {
    Stay,
    /// The session is over. `saved` is true if any save succeeded.
    Close { saved: bool },
}

#[derive(Debug)]
pub struct EditorSession {
    buffer: EditorBuffer,
    backup: bool,
    scroll: usize,
    height: usize,
    confirm_discard: bool,
    saved: bool,
    status: Option<(String, bool)>,
}

impl EditorSession {
    pub fn new(buffer: EditorBuffer, backup: bool) -> Self {
        Self {
            buffer,
            backup,
            scroll: 0,
            height: 20,
            confirm_discard: false,
            saved: false,
            status: None,
        }
    }

    // Getters

    #[inline]
    pub fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    #[inline]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    #[inline]
    pub fn is_confirming_discard(&self) -> bool {
        self.confirm_discard
    }

    /// Last status text and whether it reports an error.
    pub fn status(&self) -> Option<(&str, bool)> {
        self.status.as_ref().map(|(t, e)| (t.as_str(), *e))
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.follow_cursor();
    }

    fn follow_cursor(&mut self) {
        let (row, _) = self.buffer.cursor();
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + self.height {
            self.scroll = row + 1 - self.height;
        }
    }

    fn save(&mut self, tr: &Translator) {
        match self.buffer.save(self.backup) {
            Ok(()) => {
                self.saved = true;
                self.status = Some((tr.t("saved").into_owned(), false));
            }
            Err(e) => {
                tracing::warn!(path = %self.buffer.path().display(), error = %e, "save failed");
                self.status = Some((format!("{}: {}", tr.t("save_failed"), e), true));
            }
        }
    }

    pub fn handle_key(&mut self, key: Key, tr: &Translator) -> EditorSignal {
        if self.confirm_discard {
            self.confirm_discard = false;
            return match key {
                Key::Char(c) if is_yes(c, &tr.t("yes_no")) => EditorSignal::Close { saved: self.saved },
                _ => {
                    self.status = None;
                    EditorSignal::Stay
                }
            };
        }

        self.status = None;
        match key {
            Key::Ctrl('s') => self.save(tr),
            Key::Ctrl('d') => return EditorSignal::Close { saved: self.saved },
            Key::Esc if self.buffer.is_dirty() => {
                self.confirm_discard = true;
                self.status = Some((
                    format!("{} {}", tr.t("discard_changes"), tr.t("yes_no")),
                    false,
                ));
            }
            Key::Esc => return EditorSignal::Close { saved: self.saved },
            Key::Ctrl('k') => self.buffer.delete_line(),
            Key::Up => self.buffer.move_up(),
            Key::Down => self.buffer.move_down(),
            Key::Left => self.buffer.move_left(),
            Key::Right => self.buffer.move_right(),
            Key::Home => self.buffer.move_home(),
            Key::End => self.buffer.move_end(),
            Key::PageUp => self.buffer.page_up(self.height),
            Key::PageDown => self.buffer.page_down(self.height),
            Key::Insert => self.buffer.toggle_overwrite(),
            Key::Enter => self.buffer.insert_newline(),
            Key::Backspace => self.buffer.backspace(),
            Key::Delete => self.buffer.delete(),
            Key::Tab => self.buffer.insert_char('\t'),
            Key::Char(c) => self.buffer.insert_char(c),
            Key::Ctrl(_) => {}
        }
        self.follow_cursor();
        EditorSignal::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn save_then_close_reports_saved() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("a.txt");
        fs::write(&path, "abc\n")?;
        let tr = Translator::default();
        let mut session = EditorSession::new(EditorBuffer::open(&path)?, false);

        session.handle_key(Key::Char('x'), &tr);
        session.handle_key(Key::Ctrl('s'), &tr);
        assert_eq!(session.status(), Some(("Saved", false)));
        assert_eq!(fs::read_to_string(&path)?, "xabc\n");
        assert_eq!(session.handle_key(Key::Esc, &tr), EditorSignal::Close { saved: true });
        Ok(())
    }

    #[test]
    fn esc_on_dirty_buffer_asks_first() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("a.txt");
        fs::write(&path, "abc\n")?;
        let tr = Translator::default();
        let mut session = EditorSession::new(EditorBuffer::open(&path)?, false);

        session.handle_key(Key::Enter, &tr);
        assert_eq!(session.handle_key(Key::Esc, &tr), EditorSignal::Stay);
        assert!(session.is_confirming_discard());
        assert_eq!(session.handle_key(Key::Char('n'), &tr), EditorSignal::Stay);
        assert!(session.buffer().is_dirty());

        session.handle_key(Key::Esc, &tr);
        assert_eq!(session.handle_key(Key::Char('y'), &tr), EditorSignal::Close { saved: false });
        assert_eq!(fs::read_to_string(&path)?, "abc\n");
        Ok(())
    }

    #[test]
    fn scroll_follows_cursor() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("long.txt");
        fs::write(&path, "x\n".repeat(30))?;
        let tr = Translator::default();
        let mut session = EditorSession::new(EditorBuffer::open(&path)?, false);
        session.set_height(10);

        for _ in 0..12 {
            session.handle_key(Key::Down, &tr);
        }
        assert_eq!(session.scroll(), 3);
        session.handle_key(Key::PageUp, &tr);
        assert_eq!(session.scroll(), 2);
        Ok(())
    }
}
