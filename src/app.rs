//! Application layer for kaser: the navigation engine.
//!
//! - [state]: [AppState], the engine state and key dispatch
//! - [handlers]: per-state key handling and operation sequencing
//! - [nav]: current directory, listing, cursor and filter
//! - [actions]: prompts and the pending operation
//! - [keymap]: logical keys and the browse key map
//! - [viewer] / [editing]: the viewer and editor sessions

pub mod actions;
mod handlers;
pub mod editing;
pub mod keymap;
pub mod nav;
pub mod state;
pub mod viewer;

pub use actions::{ActionContext, ActionMode, InputMode};
pub use editing::{EditorSession, EditorSignal};
pub use keymap::{Action, Key, Keymap};
pub use nav::NavState;
pub use state::{AppState, EngineMode, KeypressResult, View};
pub use viewer::{ViewerSignal, ViewerState};
