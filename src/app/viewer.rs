//! Viewer state for kaser.
//!
//! Holds a rendered [Document], the first visible line, the page height given
//! by the ui and the current search matches.

use crate::app::keymap::Key;
use crate::core::content::{Document, StyledLine};

use std::path::Path;

/// Smallest page the viewer will lay out.
pub const MIN_PAGE_HEIGHT: usize = 5;

/// What the engine should do after the viewer handled a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerSignal {
    Stay,
    Close,
    Edit,
    /// Open the search prompt.
    Search,
}

#[derive(Debug, Clone, Default)]
struct Search {
    term: String,
    matches: Vec<usize>,
    current: usize,
}

#[derive(Debug)]
pub struct ViewerState {
    doc: Document,
    top: usize,
    height: usize,
    search: Option<Search>,
}

impl ViewerState {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            top: 0,
            height: 20,
            search: None,
        }
    }

    // Accessors

    #[inline]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[inline]
    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    #[inline]
    pub fn top(&self) -> usize {
        self.top
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.term.as_str())
    }

    /// `(current match, match count)`, 1-based.
    pub fn match_position(&self) -> Option<(usize, usize)> {
        self.search
            .as_ref()
            .filter(|s| !s.matches.is_empty())
            .map(|s| (s.current + 1, s.matches.len()))
    }

    pub fn is_match(&self, line: usize) -> bool {
        self.search
            .as_ref()
            .is_some_and(|s| s.matches.binary_search(&line).is_ok())
    }

    /// `(k, n)` for the page header.
    pub fn page(&self) -> (usize, usize) {
        (self.top / self.height + 1, self.doc.page_count(self.height))
    }

    pub fn visible_lines(&self) -> &[StyledLine] {
        let lines = self.doc.lines();
        let start = self.top.min(lines.len());
        let end = (start + self.height).min(lines.len());
        &lines[start..end]
    }

    /// Sets the page height from the ui area. Keeps the top line page aligned
    /// when it was before.
    pub fn set_height(&mut self, height: usize) {
        let height = height.max(MIN_PAGE_HEIGHT);
        if height != self.height {
            let aligned = self.top % self.height == 0;
            self.height = height;
            if aligned {
                self.top = self.top / height * height;
            }
            self.top = self.top.min(self.max_top());
        }
    }

    fn max_top(&self) -> usize {
        (self.doc.page_count(self.height) - 1) * self.height
    }

    // Scrolling

    pub fn scroll_up(&mut self) {
        self.top = self.top.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.top < self.max_top() {
            self.top += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.top = self.top.saturating_sub(self.height);
    }

    pub fn next_page(&mut self) {
        self.top = ((self.top / self.height + 1) * self.height).min(self.max_top());
    }

    pub fn first_page(&mut self) {
        self.top = 0;
    }

    pub fn last_page(&mut self) {
        self.top = self.max_top();
    }

    // Search

    /// Finds `term` and jumps to the first match at or after the top line.
    /// Returns false when nothing matched.
    pub fn search(&mut self, term: &str) -> bool {
        let matches = self.doc.find(term);
        if matches.is_empty() {
            self.search = None;
            return false;
        }
        let current = matches.iter().position(|&l| l >= self.top).unwrap_or(0);
        self.search = Some(Search {
            term: term.to_string(),
            matches,
            current,
        });
        self.jump_to_match();
        true
    }

    pub fn next_match(&mut self) {
        if let Some(s) = self.search.as_mut().filter(|s| !s.matches.is_empty()) {
            s.current = (s.current + 1) % s.matches.len();
            self.jump_to_match();
        }
    }

    pub fn prev_match(&mut self) {
        if let Some(s) = self.search.as_mut().filter(|s| !s.matches.is_empty()) {
            s.current = s.current.checked_sub(1).unwrap_or(s.matches.len() - 1);
            self.jump_to_match();
        }
    }

    fn jump_to_match(&mut self) {
        if let Some(line) = self.search.as_ref().and_then(|s| s.matches.get(s.current)) {
            self.top = (*line).min(self.max_top());
        }
    }

    pub fn handle_key(&mut self, key: Key) -> ViewerSignal {
        match key {
            Key::Up => self.scroll_up(),
            Key::Down => self.scroll_down(),
            Key::Left | Key::PageUp => self.prev_page(),
            Key::Right | Key::PageDown | Key::Char(' ') => self.next_page(),
            Key::Home => self.first_page(),
            Key::End => self.last_page(),
            Key::Char('/') => return ViewerSignal::Search,
            Key::Char('n' | 'N') => self.next_match(),
            Key::Char('p' | 'P') => self.prev_match(),
            Key::Char('e' | 'E') => return ViewerSignal::Edit,
            Key::Char('q' | 'Q') | Key::Esc => return ViewerSignal::Close,
            _ => {}
        }
        ViewerSignal::Stay
    }
}
