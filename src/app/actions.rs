//! Action context and input mode logic for kaser.
//!
//! Contains the [ActionContext] struct, tracking the prompt shown to the user,
//! the line being typed, and the [PendingOperation] waiting on that input or on
//! a yes/no confirmation.

use crate::core::fileops::PendingOperation;

/// Describes the current mode for action handling/input.
///
/// Variants:
/// * `Normal` - No prompt open.
/// * `Input` - A line prompt of the given [InputMode].
/// * `Confirm` - A yes/no question about the pending operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionMode {
    Normal,
    Input { mode: InputMode, prompt: String },
    Confirm { prompt: String },
}

/// Enumerates all the available input prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    CopyTo,
    MoveTo,
    Rename,
    NewFile,
    NewFolder,
    Filter,
    /// Search term in the viewer.
    Search,
}

/// Tracks the current prompt, input buffer and pending operation.
#[derive(Debug)]
pub struct ActionContext {
    mode: ActionMode,
    input_buffer: String,
    input_cursor_pos: usize,
    pending: Option<PendingOperation>,
}

impl ActionContext {
    // Getters / accessors

    #[inline]
    pub fn mode(&self) -> &ActionMode {
        &self.mode
    }

    #[inline]
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    /// Cursor as a byte offset into the input buffer.
    #[inline]
    pub fn input_cursor_pos(&self) -> usize {
        self.input_cursor_pos
    }

    #[inline]
    pub fn pending(&self) -> Option<&PendingOperation> {
        self.pending.as_ref()
    }

    pub fn input_mode(&self) -> Option<InputMode> {
        match self.mode {
            ActionMode::Input { mode, .. } => Some(mode),
            _ => None,
        }
    }

    #[inline]
    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, ActionMode::Input { .. })
    }

    #[inline]
    pub fn is_confirm_mode(&self) -> bool {
        matches!(self.mode, ActionMode::Confirm { .. })
    }

    // Mode functions

    /// Opens a line prompt with `initial_value` typed in and the cursor at the end.
    pub fn enter_input(&mut self, mode: InputMode, prompt: String, initial_value: String) {
        self.mode = ActionMode::Input { mode, prompt };
        self.input_buffer = initial_value;
        self.input_cursor_pos = self.input_buffer.len();
    }

    pub fn enter_confirm(&mut self, prompt: String) {
        self.mode = ActionMode::Confirm { prompt };
        self.input_buffer.clear();
        self.input_cursor_pos = 0;
    }

    /// Closes any prompt. The pending operation is kept.
    pub fn exit_mode(&mut self) {
        self.mode = ActionMode::Normal;
        self.input_buffer.clear();
        self.input_cursor_pos = 0;
    }

    /// Closes any prompt and drops the pending operation.
    pub fn cancel(&mut self) {
        self.exit_mode();
        self.pending = None;
    }

    pub fn set_pending(&mut self, op: PendingOperation) {
        self.pending = Some(op);
    }

    pub fn take_pending(&mut self) -> Option<PendingOperation> {
        self.pending.take()
    }

    /// Returns the typed text and closes the prompt.
    pub fn take_input(&mut self) -> String {
        let text = std::mem::take(&mut self.input_buffer);
        self.exit_mode();
        text
    }

    // Cursor actions

    pub fn action_move_cursor_left(&mut self) {
        if let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_cursor_pos = previous;
        }
    }

    pub fn action_move_cursor_right(&mut self) {
        if let Some(ch) = self.input_buffer[self.input_cursor_pos..].chars().next() {
            self.input_cursor_pos += ch.len_utf8();
        }
    }

    pub fn action_insert_at_cursor(&mut self, ch: char) {
        self.input_buffer.insert(self.input_cursor_pos, ch);
        self.input_cursor_pos += ch.len_utf8();
    }

    /// Deletes the character before the cursor.
    pub fn action_backspace_at_cursor(&mut self) {
        if let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_buffer.remove(previous);
            self.input_cursor_pos = previous;
        }
    }

    /// Deletes the character under the cursor.
    pub fn action_delete_at_cursor(&mut self) {
        if self.input_cursor_pos < self.input_buffer.len() {
            self.input_buffer.remove(self.input_cursor_pos);
        }
    }

    pub fn action_cursor_home(&mut self) {
        self.input_cursor_pos = 0;
    }

    pub fn action_cursor_end(&mut self) {
        self.input_cursor_pos = self.input_buffer.len();
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            mode: ActionMode::Normal,
            input_buffer: String::new(),
            input_cursor_pos: 0,
            pending: None,
        }
    }
}

/// True if `c` answers yes to a `[y/N]` prompt. `y` always counts, as does
/// the first letter of the localized label (`[o/N]`, `[j/N]`).
pub fn is_yes(c: char, yes_no_label: &str) -> bool {
    let c = c.to_ascii_lowercase();
    c == 'y'
        || yes_no_label
            .trim_start_matches('[')
            .chars()
            .next()
            .is_some_and(|y| y.to_ascii_lowercase() == c)
}
