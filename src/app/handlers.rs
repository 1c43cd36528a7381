//! Input action handler methods for kaser.
//!
//! This module implements [AppState] methods that process keys for every engine
//! state: browsing, yes/no confirmation, line prompts, the viewer and the editor.
//! Every failure ends up as a status message. Nothing here returns an error.

use crate::app::actions::{InputMode, is_yes};
use crate::app::editing::{EditorSession, EditorSignal};
use crate::app::keymap::{Action, FileAction, Key, NavAction, SystemAction};
use crate::app::state::{AppState, KeypressResult, View};
use crate::app::viewer::{ViewerSignal, ViewerState};
use crate::core::content::Document;
use crate::core::editor::EditorBuffer;
use crate::core::fileops::{self, OpKind, OpSettings, PendingOperation};
use crate::core::fm::ListEntry;
use crate::core::formatter::EntryFilter;
use crate::ui::overlays::Overlay;
use crate::utils::get_home;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

impl<'a> AppState<'a> {
    // Browsing

    pub(super) fn handle_browse_key(&mut self, key: Key) -> KeypressResult {
        if self.help_visible() && matches!(key, Key::Esc) {
            self.overlays.retain(|o| !matches!(o, Overlay::KeybindHelp));
            return KeypressResult::Consumed;
        }

        match self.keymap.lookup(key) {
            Some(Action::Nav(action)) => self.handle_nav_action(action),
            Some(Action::File(action)) => self.handle_file_action(action),
            Some(Action::System(action)) => self.handle_sys_action(action),
            None => KeypressResult::Continue,
        }
    }

    fn handle_nav_action(&mut self, action: NavAction) -> KeypressResult {
        match action {
            NavAction::GoUp => {
                self.nav.move_up();
            }
            NavAction::GoDown => {
                self.nav.move_down();
            }
            NavAction::Open => return self.handle_open(),
            NavAction::GoHome => match get_home() {
                Some(home) => self.change_dir(&home, None),
                None => self.push_overlay_message("Home directory not found".into(), true),
            },
            NavAction::ToggleFilter => {
                if self.nav.toggle_filter() {
                    let key = if self.nav.filter_active() {
                        "filter_applied"
                    } else {
                        "filter_cleared"
                    };
                    let msg = self.translator.t(key).into_owned();
                    self.push_overlay_message(msg, false);
                } else {
                    self.open_filter_prompt();
                }
            }
            NavAction::ChooseFilter => self.open_filter_prompt(),
        }
        KeypressResult::Consumed
    }

    fn handle_file_action(&mut self, action: FileAction) -> KeypressResult {
        let cwd = self.nav.current_dir().to_path_buf();
        match action {
            FileAction::Create => {
                self.actions
                    .set_pending(PendingOperation::new(OpKind::CreateFile, cwd));
                let prompt = self.translator.t("prompt_new_file").into_owned();
                self.actions
                    .enter_input(InputMode::NewFile, prompt, String::new());
                return KeypressResult::Consumed;
            }
            FileAction::CreateDirectory => {
                self.actions
                    .set_pending(PendingOperation::new(OpKind::CreateDirectory, cwd));
                let prompt = self.translator.t("prompt_new_folder").into_owned();
                self.actions
                    .enter_input(InputMode::NewFolder, prompt, String::new());
                return KeypressResult::Consumed;
            }
            _ => {}
        }

        // The rest act on the selected real entry.
        let Some(path) = self.nav.selected_path() else {
            return KeypressResult::Continue;
        };
        let is_dir = self.nav.selected_entry().is_some_and(|e| e.is_dir_like());

        match action {
            FileAction::View => {
                if is_dir {
                    return KeypressResult::Continue;
                }
                self.open_viewer(&path);
            }
            FileAction::Copy => self.begin_input_op(OpKind::Copy, path, InputMode::CopyTo),
            FileAction::Rename => self.begin_input_op(OpKind::Rename, path, InputMode::Rename),
            FileAction::Move => self.begin_confirm_op(OpKind::Move, path, "confirm_move"),
            FileAction::Delete => self.begin_confirm_op(OpKind::Delete, path, "confirm_delete"),
            FileAction::Create | FileAction::CreateDirectory => {}
        }
        KeypressResult::Consumed
    }

    fn handle_sys_action(&mut self, action: SystemAction) -> KeypressResult {
        match action {
            SystemAction::Quit => KeypressResult::Quit,
            SystemAction::KeyBindHelp => {
                if self.help_visible() {
                    self.overlays.retain(|o| !matches!(o, Overlay::KeybindHelp));
                } else {
                    self.overlays.push(Overlay::KeybindHelp);
                }
                KeypressResult::Consumed
            }
        }
    }

    /// Enter on the selected row.
    fn handle_open(&mut self) -> KeypressResult {
        let cwd = self.nav.current_dir().to_path_buf();
        let target = match self.nav.selected_row() {
            Some(ListEntry::Parent) => {
                let Some(parent) = cwd.parent() else {
                    return KeypressResult::Continue;
                };
                let left = cwd.file_name().map(OsStr::to_os_string);
                self.change_dir(parent, left);
                return KeypressResult::Consumed;
            }
            Some(ListEntry::Root) => filesystem_root(&cwd),
            Some(ListEntry::Entry(e)) if e.is_dir_like() => cwd.join(e.name()),
            Some(ListEntry::Entry(e)) => {
                let path = cwd.join(e.name());
                self.open_viewer(&path);
                return KeypressResult::Consumed;
            }
            None => return KeypressResult::Continue,
        };
        self.change_dir(&target, None);
        KeypressResult::Consumed
    }

    /// Lists `path` and selects `focus`. On failure the engine stays where it was.
    fn change_dir(&mut self, path: &Path, focus: Option<OsString>) {
        match self.nav.change_dir(path, &self.formatter) {
            Ok(()) => {
                if let Some(name) = focus {
                    self.nav.select_name(&name);
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot list directory");
                self.push_overlay_message(e.to_string(), true);
            }
        }
    }

    fn refresh_listing(&mut self, focus: Option<&OsStr>) {
        if let Err(e) = self.nav.refresh(&self.formatter, focus) {
            tracing::warn!(error = %e, "cannot refresh listing");
            self.push_overlay_message(e.to_string(), true);
        }
    }

    fn open_filter_prompt(&mut self) {
        let initial = self
            .nav
            .filter()
            .map(EntryFilter::prompt_value)
            .unwrap_or_default();
        let prompt = self.translator.t("prompt_filter").into_owned();
        self.actions.enter_input(InputMode::Filter, prompt, initial);
    }

    // Pending operations

    fn begin_input_op(&mut self, kind: OpKind, source: PathBuf, mode: InputMode) {
        let op = PendingOperation::new(kind, source);
        let name = op.source_name();
        let (prompt_key, initial) = match mode {
            InputMode::Rename => ("prompt_rename", name.clone()),
            _ => ("prompt_copy_to", String::new()),
        };
        let prompt = format!("{} ({})", self.translator.t(prompt_key), name);
        self.actions.set_pending(op);
        self.actions.enter_input(mode, prompt, initial);
    }

    fn begin_confirm_op(&mut self, kind: OpKind, source: PathBuf, question_key: &str) {
        let op = PendingOperation::new(kind, source);
        let prompt = format!(
            "{} {}? {}",
            self.translator.t(question_key),
            op.source_name(),
            self.translator.t("yes_no")
        );
        self.actions.set_pending(op);
        self.actions.enter_confirm(prompt);
    }

    pub(super) fn handle_confirm(&mut self, key: Key) -> KeypressResult {
        let yes = matches!(key, Key::Char(c) if is_yes(c, &self.translator.t("yes_no")));
        if !yes {
            self.actions.cancel();
            let msg = self.translator.t("cancelled").into_owned();
            self.push_overlay_message(msg, false);
            return KeypressResult::Consumed;
        }

        self.actions.exit_mode();
        let Some(op) = self.actions.take_pending() else {
            return KeypressResult::Consumed;
        };
        match op.kind() {
            OpKind::Move => {
                let prompt = format!(
                    "{} ({})",
                    self.translator.t("prompt_move_to"),
                    op.source_name()
                );
                self.actions.set_pending(op);
                self.actions
                    .enter_input(InputMode::MoveTo, prompt, String::new());
            }
            _ => self.run_operation(op),
        }
        KeypressResult::Consumed
    }

    /// Executes `op`, rebuilds the listing and reports the outcome.
    fn run_operation(&mut self, op: PendingOperation) {
        let settings = OpSettings::from(self.config.general());
        match fileops::execute(&op, settings) {
            Ok(outcome) => {
                let focus = outcome.focus();
                self.refresh_listing(focus.as_deref());
                let name = outcome
                    .target()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| outcome.target().display().to_string());
                let msg = format!("{}: {}", self.translator.t(outcome.message_key()), name);
                self.push_overlay_message(msg, false);
            }
            Err(e) => {
                self.refresh_listing(None);
                self.push_overlay_message(e.to_string(), true);
            }
        }
    }

    // Line prompts

    pub(super) fn handle_input_mode(&mut self, key: Key) -> KeypressResult {
        let Some(mode) = self.actions.input_mode() else {
            return KeypressResult::Continue;
        };

        match key {
            Key::Enter => {
                let text = self.actions.take_input();
                self.submit_input(mode, text);
            }
            Key::Esc => {
                self.actions.cancel();
                if !matches!(mode, InputMode::Filter | InputMode::Search) {
                    let msg = self.translator.t("cancelled").into_owned();
                    self.push_overlay_message(msg, false);
                }
            }
            Key::Left => self.actions.action_move_cursor_left(),
            Key::Right => self.actions.action_move_cursor_right(),
            Key::Home => self.actions.action_cursor_home(),
            Key::End => self.actions.action_cursor_end(),
            Key::Backspace => self.actions.action_backspace_at_cursor(),
            Key::Delete => self.actions.action_delete_at_cursor(),
            Key::Char(c) => self.actions.action_insert_at_cursor(c),
            _ => {}
        }
        KeypressResult::Consumed
    }

    fn submit_input(&mut self, mode: InputMode, text: String) {
        match mode {
            InputMode::Filter => match EntryFilter::parse(&text) {
                Some(filter) => {
                    let msg =
                        format!("{}: {}", self.translator.t("filter_applied"), filter.label());
                    self.nav.set_filter(filter);
                    self.push_overlay_message(msg, false);
                }
                None => self.actions.cancel(),
            },
            InputMode::Search => {
                let found = match &mut self.view {
                    View::Viewer(v) => text.trim().is_empty() || v.search(text.trim()),
                    _ => true,
                };
                if !found {
                    let msg = self.translator.t("no_matches").into_owned();
                    self.push_overlay_message(msg, false);
                }
            }
            InputMode::CopyTo
            | InputMode::MoveTo
            | InputMode::Rename
            | InputMode::NewFile
            | InputMode::NewFolder => {
                let Some(mut op) = self.actions.take_pending() else {
                    return;
                };
                let unchanged = mode == InputMode::Rename && text.trim() == op.source_name();
                if text.trim().is_empty() || unchanged {
                    let msg = self.translator.t("cancelled").into_owned();
                    self.push_overlay_message(msg, false);
                    return;
                }

                let cwd = self.nav.current_dir().to_path_buf();
                let destination = match mode {
                    InputMode::CopyTo | InputMode::MoveTo => {
                        Ok(fileops::resolve_destination(&cwd, &text, op.source()))
                    }
                    InputMode::Rename => {
                        let dir = op.source().parent().unwrap_or(&cwd).to_path_buf();
                        fileops::resolve_name(&dir, &text)
                    }
                    _ => fileops::resolve_name(&cwd, &text),
                };
                match destination {
                    Ok(dest) => {
                        op.set_destination(dest);
                        self.run_operation(op);
                    }
                    Err(e) => self.push_overlay_message(e.to_string(), true),
                }
            }
        }
    }

    // Viewer and editor

    fn open_viewer(&mut self, path: &Path) {
        match Document::open(path, self.renderer.as_ref()) {
            Ok(doc) => self.view = View::Viewer(Box::new(ViewerState::new(doc))),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "not viewable");
                self.push_overlay_message(e.to_string(), true);
            }
        }
    }

    fn open_editor(&mut self, path: &Path) {
        match EditorBuffer::open(path) {
            Ok(buffer) => {
                let backup = self.config.general().backup_on_save();
                self.view = View::Editor(Box::new(EditorSession::new(buffer, backup)));
            }
            Err(e) => self.push_overlay_message(e.to_string(), true),
        }
    }

    pub(super) fn handle_viewer_key(&mut self, key: Key) -> KeypressResult {
        let View::Viewer(viewer) = &mut self.view else {
            return KeypressResult::Continue;
        };
        match viewer.handle_key(key) {
            ViewerSignal::Stay => {}
            ViewerSignal::Close => self.view = View::Browser,
            ViewerSignal::Edit => {
                let path = viewer.path().to_path_buf();
                self.open_editor(&path);
            }
            ViewerSignal::Search => {
                let initial = viewer.search_term().unwrap_or_default().to_string();
                let prompt = self.translator.t("prompt_search").into_owned();
                self.actions.enter_input(InputMode::Search, prompt, initial);
            }
        }
        KeypressResult::Consumed
    }

    pub(super) fn handle_editor_key(&mut self, key: Key) -> KeypressResult {
        let View::Editor(session) = &mut self.view else {
            return KeypressResult::Continue;
        };
        let signal = session.handle_key(key, &self.translator);
        let dirty = session.buffer().is_dirty();

        if let EditorSignal::Close { saved } = signal {
            self.view = View::Browser;
            self.refresh_listing(None);
            if dirty {
                let msg = self.translator.t("discarded").into_owned();
                self.push_overlay_message(msg, false);
            } else if saved {
                let msg = self.translator.t("saved").into_owned();
                self.push_overlay_message(msg, false);
            }
        }
        KeypressResult::Consumed
    }
}

/// Root of the filesystem `path` lives on: `/`, or the drive prefix on Windows.
fn filesystem_root(path: &Path) -> PathBuf {
    path.ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(std::path::MAIN_SEPARATOR_STR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_of_absolute_path() {
        assert_eq!(filesystem_root(Path::new("/home/user/docs")), Path::new("/"));
    }
}
