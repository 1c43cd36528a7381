//! Application state and main controller module for kaser.
//!
//! This module defines the [AppState] struct, which owns everything the
//! navigation engine needs while it runs:
//! - a borrowed [Config] and the [Keymap] and [Formatter] built from it
//! - the [Translator] and [ContentRenderer] chosen once at startup
//! - the [NavState] for the current directory
//! - the [ActionContext] for prompts and the pending operation
//! - the active [View]: the browser, the viewer or the editor
//! - the overlay stack for timed messages and the help screen
//!
//! Key handling lives in the handlers module. This is the state object the
//! terminal loop and the ui read from.

use crate::app::actions::{ActionContext, ActionMode};
use crate::app::editing::EditorSession;
use crate::app::keymap::{Key, Keymap};
use crate::app::nav::NavState;
use crate::app::viewer::ViewerState;
use crate::config::{Config, Translator};
use crate::core::content::ContentRenderer;
use crate::core::error::FsResult;
use crate::core::formatter::Formatter;
use crate::ui::overlays::{Overlay, OverlayStack};

use std::path::Path;
use std::time::{Duration, Instant};

pub(crate) const MESSAGE_DURATION: Duration = Duration::from_secs(3);
pub(crate) const ERROR_DURATION: Duration = Duration::from_secs(7);

/// Result of one processed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypressResult {
    /// The key meant nothing in the current state.
    Continue,
    Consumed,
    Quit,
}

/// Engine state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Browsing,
    ConfirmingDestructiveOp,
    AwaitingTextInput,
    Viewing,
    Editing,
    Exiting,
}

/// What occupies the main area.
#[derive(Debug)]
pub enum View {
    Browser,
    Viewer(Box<ViewerState>),
    Editor(Box<EditorSession>),
}

/// Main struct which holds the central application state of kaser.
pub struct AppState<'a> {
    pub(super) config: &'a Config,
    pub(super) keymap: Keymap,
    pub(super) formatter: Formatter,
    pub(super) translator: Translator,
    pub(super) renderer: Box<dyn ContentRenderer>,

    pub(super) nav: NavState,
    pub(super) actions: ActionContext,
    pub(super) view: View,

    pub(super) notification_time: Option<Instant>,
    pub(super) overlays: OverlayStack,
    pub(super) exiting: bool,
}

impl<'a> AppState<'a> {
    /// Lists `start` and enters Browsing. Fails if `start` cannot be listed.
    pub fn new(
        config: &'a Config,
        start: &Path,
        translator: Translator,
        renderer: Box<dyn ContentRenderer>,
    ) -> FsResult<Self> {
        let general = config.general();
        let formatter = Formatter::new(
            general.dirs_first(),
            general.show_hidden(),
            general.sort_by(),
        );
        let nav = NavState::open(start, &formatter)?;
        tracing::debug!(
            start = %start.display(),
            renderer = renderer.name(),
            language = translator.language(),
            "engine started"
        );

        Ok(Self {
            config,
            keymap: Keymap::from_keys(config.keys()),
            formatter,
            translator,
            renderer,
            nav,
            actions: ActionContext::default(),
            view: View::Browser,
            notification_time: None,
            overlays: OverlayStack::new(),
            exiting: false,
        })
    }

    // Getters / accessors

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    #[inline]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    #[inline]
    pub fn renderer(&self) -> &dyn ContentRenderer {
        self.renderer.as_ref()
    }

    #[inline]
    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    #[inline]
    pub fn actions(&self) -> &ActionContext {
        &self.actions
    }

    #[inline]
    pub fn view(&self) -> &View {
        &self.view
    }

    #[inline]
    pub fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }

    pub fn mode(&self) -> EngineMode {
        if self.exiting {
            return EngineMode::Exiting;
        }
        match (&self.view, self.actions.mode()) {
            (View::Editor(_), _) => EngineMode::Editing,
            (View::Viewer(_), _) => EngineMode::Viewing,
            (View::Browser, ActionMode::Confirm { .. }) => EngineMode::ConfirmingDestructiveOp,
            (View::Browser, ActionMode::Input { .. }) => EngineMode::AwaitingTextInput,
            (View::Browser, ActionMode::Normal) => EngineMode::Browsing,
        }
    }

    /// Text of the status message currently shown, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.overlays.message().map(|(text, _)| text)
    }

    pub fn help_visible(&self) -> bool {
        self.overlays.contains(&Overlay::KeybindHelp)
    }

    /// Hands the height of the viewer or editor area to the open session.
    pub fn set_view_height(&mut self, height: usize) {
        match &mut self.view {
            View::Viewer(v) => v.set_height(height),
            View::Editor(e) => e.set_height(height),
            View::Browser => {}
        }
    }

    /// Drops expired messages. Returns true if a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if let Some(expiry) = self.notification_time
            && Instant::now() >= expiry
        {
            self.notification_time = None;
            self.overlays
                .retain(|o| !matches!(o, Overlay::Message { .. }));
            return true;
        }
        false
    }

    /// Central key handler.
    pub fn handle_key(&mut self, key: Key) -> KeypressResult {
        if self.exiting {
            return KeypressResult::Quit;
        }

        let result = match self.view {
            View::Editor(_) => self.handle_editor_key(key),
            View::Viewer(_) if self.actions.is_input_mode() => self.handle_input_mode(key),
            View::Viewer(_) => self.handle_viewer_key(key),
            View::Browser if self.actions.is_confirm_mode() => self.handle_confirm(key),
            View::Browser if self.actions.is_input_mode() => self.handle_input_mode(key),
            View::Browser => self.handle_browse_key(key),
        };

        if result == KeypressResult::Quit {
            self.exiting = true;
        }
        result
    }

    // Messages

    pub(crate) fn push_overlay_message(&mut self, text: String, is_error: bool) {
        let duration = if is_error {
            ERROR_DURATION
        } else {
            MESSAGE_DURATION
        };
        self.notification_time = Some(Instant::now() + duration);

        if matches!(self.overlays.top(), Some(Overlay::Message { .. })) {
            self.overlays.pop();
        }
        self.overlays.push(Overlay::Message { text, is_error });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::PlainRenderer;
    use std::error;
    use std::fs;
    use tempfile::tempdir;

    fn app<'a>(config: &'a Config, dir: &Path) -> FsResult<AppState<'a>> {
        AppState::new(config, dir, Translator::default(), Box::new(PlainRenderer))
    }

    #[test]
    fn modes_follow_prompts_and_views() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.txt"), "hello\n")?;
        let config = Config::default();
        let mut app = app(&config, dir.path())?;
        assert_eq!(app.mode(), EngineMode::Browsing);

        app.nav.select_name("a.txt".as_ref());
        app.handle_key(Key::Char('d'));
        assert_eq!(app.mode(), EngineMode::ConfirmingDestructiveOp);
        app.handle_key(Key::Char('n'));
        assert_eq!(app.mode(), EngineMode::Browsing);
        assert!(dir.path().join("a.txt").exists());

        app.handle_key(Key::Char('r'));
        assert_eq!(app.mode(), EngineMode::AwaitingTextInput);
        app.handle_key(Key::Esc);
        assert_eq!(app.mode(), EngineMode::Browsing);

        app.handle_key(Key::Char('v'));
        assert_eq!(app.mode(), EngineMode::Viewing);
        app.handle_key(Key::Char('e'));
        assert_eq!(app.mode(), EngineMode::Editing);
        app.handle_key(Key::Esc);
        assert_eq!(app.mode(), EngineMode::Browsing);

        assert_eq!(app.handle_key(Key::Esc), KeypressResult::Quit);
        assert_eq!(app.mode(), EngineMode::Exiting);
        Ok(())
    }

    #[test]
    fn help_overlay_closes_before_quitting() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let config = Config::default();
        let mut app = app(&config, dir.path())?;

        app.handle_key(Key::Char('?'));
        assert!(app.help_visible());
        assert_eq!(app.handle_key(Key::Esc), KeypressResult::Consumed);
        assert!(!app.help_visible());
        assert_eq!(app.mode(), EngineMode::Browsing);
        Ok(())
    }

    #[test]
    fn messages_expire() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let config = Config::default();
        let mut app = app(&config, dir.path())?;

        app.push_overlay_message("first".into(), false);
        app.push_overlay_message("second".into(), false);
        assert_eq!(app.status_message(), Some("second"));
        assert!(!app.tick());

        app.notification_time = Some(Instant::now());
        assert!(app.tick());
        assert_eq!(app.status_message(), None);
        Ok(())
    }
}
