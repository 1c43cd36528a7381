//! Overlay stack for widgets drawn over the main view.
//!
//! Holds the timed status message and the key binding help. Pushed by the
//! engine handlers, drawn last by the ui.

use std::slice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Message { text: String, is_error: bool },
    KeybindHelp,
}

#[derive(Debug, Default)]
pub struct OverlayStack {
    overlays: Vec<Overlay>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self {
            overlays: Vec::new(),
        }
    }

    pub fn push(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    pub fn pop(&mut self) -> Option<Overlay> {
        self.overlays.pop()
    }

    pub fn top(&self) -> Option<&Overlay> {
        self.overlays.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, Overlay> {
        self.overlays.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn contains(&self, overlay: &Overlay) -> bool {
        self.overlays.contains(overlay)
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Overlay) -> bool,
    {
        self.overlays.retain(f);
    }

    /// The newest message, if one is showing.
    pub fn message(&self) -> Option<(&str, bool)> {
        self.overlays.iter().rev().find_map(|o| match o {
            Overlay::Message { text, is_error } => Some((text.as_str(), *is_error)),
            _ => None,
        })
    }
}
