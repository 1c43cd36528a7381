//! Key decoding and key mapping for kaser.
//!
//! [Key] is the logical key event the engine consumes. [Key::decode] turns a
//! crossterm [KeyEvent] into one, so nothing past this module sees raw terminal
//! input. [Keymap] maps logical keys to browse [Action]s from the `[keys]` config.

use crate::config::Keys;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;

/// Decoded key event.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Esc,
    Backspace,
    Delete,
    Insert,
    Tab,
    Char(char),
    Ctrl(char),
}

impl Key {
    /// Decodes a terminal key event. Releases and unknown keys yield `None`.
    pub fn decode(event: &KeyEvent) -> Option<Key> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let key = match event.code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Insert => Key::Insert,
            KeyCode::Tab => Key::Tab,
            KeyCode::Char(c) if ctrl => Key::Ctrl(c.to_ascii_lowercase()),
            KeyCode::Char(c) => Key::Char(c),
            _ => return None,
        };
        Some(key)
    }

    /// Label used by the help overlay.
    pub fn label(&self) -> String {
        match self {
            Key::Up => "Up".into(),
            Key::Down => "Down".into(),
            Key::Left => "Left".into(),
            Key::Right => "Right".into(),
            Key::PageUp => "PgUp".into(),
            Key::PageDown => "PgDn".into(),
            Key::Home => "Home".into(),
            Key::End => "End".into(),
            Key::Enter => "Enter".into(),
            Key::Esc => "Esc".into(),
            Key::Backspace => "Backspace".into(),
            Key::Delete => "Del".into(),
            Key::Insert => "Ins".into(),
            Key::Tab => "Tab".into(),
            Key::Char(' ') => "Space".into(),
            Key::Char(c) => c.to_string(),
            Key::Ctrl(c) => format!("Ctrl+{}", c),
        }
    }
}

/// Represents any action in the browsing view: navigation, file, or system.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Nav(NavAction),
    File(FileAction),
    System(SystemAction),
}

impl Action {
    /// Short description for the help overlay and `--keybinds`.
    pub fn describe(self) -> &'static str {
        use FileAction as F;
        use NavAction as N;
        use SystemAction as S;
        match self {
            Action::Nav(N::GoUp) => "Move up",
            Action::Nav(N::GoDown) => "Move down",
            Action::Nav(N::Open) => "Open directory or view file",
            Action::Nav(N::GoHome) => "Go to home directory",
            Action::Nav(N::ToggleFilter) => "Toggle filter",
            Action::Nav(N::ChooseFilter) => "Choose filter",
            Action::File(F::View) => "View file",
            Action::File(F::Copy) => "Copy",
            Action::File(F::Move) => "Move",
            Action::File(F::Delete) => "Delete",
            Action::File(F::Rename) => "Rename",
            Action::File(F::Create) => "New file",
            Action::File(F::CreateDirectory) => "New folder",
            Action::System(S::KeyBindHelp) => "Show this help",
            Action::System(S::Quit) => "Quit",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    GoUp,
    GoDown,
    Open,
    GoHome,
    ToggleFilter,
    ChooseFilter,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileAction {
    View,
    Copy,
    Move,
    Delete,
    Rename,
    Create,
    CreateDirectory,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SystemAction {
    Quit,
    KeyBindHelp,
}

/// Stores the mapping from [Key] to [Action], built from the config.
#[derive(Debug, Clone)]
pub struct Keymap {
    map: HashMap<Key, Action>,
}

impl Keymap {
    #[rustfmt::skip]
    pub fn from_keys(keys: &Keys) -> Self {
        let mut map = HashMap::new();

        macro_rules! bind {
            ($keys:expr, $action:expr) => {
                bind($keys, $action, &mut map);
            };
        }

        use NavAction as N;
        use FileAction as F;
        use SystemAction as S;

        bind!(keys.go_up(),            Action::Nav(N::GoUp));
        bind!(keys.go_down(),          Action::Nav(N::GoDown));
        bind!(keys.open(),             Action::Nav(N::Open));
        bind!(keys.go_home(),          Action::Nav(N::GoHome));
        bind!(keys.toggle_filter(),    Action::Nav(N::ToggleFilter));
        bind!(keys.choose_filter(),    Action::Nav(N::ChooseFilter));

        bind!(keys.view(),             Action::File(F::View));
        bind!(keys.copy(),             Action::File(F::Copy));
        bind!(keys.move_file(),        Action::File(F::Move));
        bind!(keys.delete(),           Action::File(F::Delete));
        bind!(keys.rename(),           Action::File(F::Rename));
        bind!(keys.create(),           Action::File(F::Create));
        bind!(keys.create_directory(), Action::File(F::CreateDirectory));

        bind!(keys.keybind_help(),     Action::System(S::KeyBindHelp));
        bind!(keys.quit(),             Action::System(S::Quit));

        Keymap { map }
    }

    /// Looks up the action for a key. Letters match in either case
    /// unless the other case is bound to something else.
    pub fn lookup(&self, key: Key) -> Option<Action> {
        if let Some(action) = self.map.get(&key) {
            return Some(*action);
        }
        match key {
            Key::Char(c) if c.is_ascii_alphabetic() => {
                let swapped = if c.is_ascii_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                };
                self.map.get(&Key::Char(swapped)).copied()
            }
            _ => None,
        }
    }

    /// Bound keys grouped per action, for the help overlay.
    pub fn bindings(&self) -> Vec<(Action, Vec<Key>)> {
        let mut grouped: Vec<(Action, Vec<Key>)> = Vec::new();
        for (key, action) in &self.map {
            match grouped.iter_mut().find(|(a, _)| a == action) {
                Some((_, keys)) => keys.push(*key),
                None => grouped.push((*action, vec![*key])),
            }
        }
        for (_, keys) in &mut grouped {
            keys.sort_by_key(Key::label);
        }
        grouped.sort_by_key(|(a, _)| action_order(*a));
        grouped
    }
}

fn action_order(action: Action) -> usize {
    use FileAction as F;
    use NavAction as N;
    use SystemAction as S;
    const ORDER: [Action; 15] = [
        Action::Nav(N::GoUp),
        Action::Nav(N::GoDown),
        Action::Nav(N::Open),
        Action::Nav(N::GoHome),
        Action::File(F::View),
        Action::File(F::Copy),
        Action::File(F::Move),
        Action::File(F::Delete),
        Action::File(F::Rename),
        Action::File(F::Create),
        Action::File(F::CreateDirectory),
        Action::Nav(N::ToggleFilter),
        Action::Nav(N::ChooseFilter),
        Action::System(S::KeyBindHelp),
        Action::System(S::Quit),
    ];
    ORDER.iter().position(|a| *a == action).unwrap_or(ORDER.len())
}

/// Parses a config key name such as `"up"`, `"esc"`, `"d"`, `"ctrl+s"` or `"<c-s>"`.
pub fn parse_key(s: &str) -> Option<Key> {
    let is_bracketed = s.starts_with('<') && s.ends_with('>') && s.len() > 2;
    let input = if is_bracketed { &s[1..s.len() - 1] } else { s };

    if input.chars().count() == 1 {
        return input.chars().next().map(Key::Char);
    }

    let normalized = input.replace('-', "+");
    let mut parts: Vec<&str> = normalized.split('+').collect();
    let last = parts.pop()?;
    let mut ctrl = false;
    for prefix in parts {
        match prefix.to_lowercase().as_str() {
            "c" | "ctrl" | "control" => ctrl = true,
            _ => return None,
        }
    }

    let key = match last.to_lowercase().as_str() {
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "pageup" | "pgup" => Key::PageUp,
        "pagedown" | "pgdn" => Key::PageDown,
        "home" => Key::Home,
        "end" => Key::End,
        "enter" | "return" => Key::Enter,
        "esc" | "escape" => Key::Esc,
        "backspace" | "back" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "insert" | "ins" => Key::Insert,
        "tab" => Key::Tab,
        "space" | "spc" => Key::Char(' '),
        _ => {
            let mut chars = last.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if ctrl {
                return Some(Key::Ctrl(c.to_ascii_lowercase()));
            }
            Key::Char(c)
        }
    };
    if ctrl {
        return None;
    }
    Some(key)
}

fn bind(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, action);
            }
            None => tracing::warn!(key = %k, ?action, "unknown key name in config"),
        }
    }
}
