//! Theme configuration for kaser.
//!
//! The settings record names a theme (`default`, `dark`, `light` or `plain`).
//! A `[theme]` section may override single colors on top of the named palette.
//! Also maps content tags from the renderer onto styles.
//!
//! # Examples
//! ```toml
//! [general]
//! theme = "dark"
//!
//! [theme]
//! directory = "#7aa2f7"
//! selection = "darkgray"
//! ```

use crate::core::content::Tag;
use crate::utils::parse_color;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Single color overrides read from the `[theme]` section.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct ThemeOverrides {
    accent: Option<String>,
    selection: Option<String>,
    directory: Option<String>,
    executable: Option<String>,
    symlink: Option<String>,
    path: Option<String>,
    status: Option<String>,
    error: Option<String>,
    heading: Option<String>,
    keyword: Option<String>,
    string: Option<String>,
    comment: Option<String>,
    number: Option<String>,
    code: Option<String>,
}

/// Resolved color set used by the ui.
#[derive(Debug, Clone)]
pub struct Theme {
    name: String,
    accent: Color,
    selection: Color,
    directory: Color,
    executable: Color,
    symlink: Color,
    path: Color,
    status: Color,
    error: Color,
    heading: Color,
    keyword: Color,
    string: Color,
    comment: Color,
    number: Color,
    code: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::named("default")
    }
}

impl Theme {
    /// Builds a theme from a palette name. Unknown names fall back to `default`.
    pub fn named(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "dark" => Theme {
                name: "dark".into(),
                accent: Color::Rgb(86, 95, 137),
                selection: Color::Rgb(41, 46, 66),
                directory: Color::Rgb(122, 162, 247),
                executable: Color::Rgb(158, 206, 106),
                symlink: Color::Rgb(125, 207, 255),
                path: Color::Rgb(187, 154, 247),
                status: Color::Rgb(169, 177, 214),
                error: Color::Rgb(247, 118, 142),
                heading: Color::Rgb(255, 158, 100),
                keyword: Color::Rgb(187, 154, 247),
                string: Color::Rgb(158, 206, 106),
                comment: Color::Rgb(86, 95, 137),
                number: Color::Rgb(255, 158, 100),
                code: Color::Rgb(224, 175, 104),
            },
            "light" => Theme {
                name: "light".into(),
                accent: Color::Gray,
                selection: Color::Rgb(220, 220, 230),
                directory: Color::Blue,
                executable: Color::Green,
                symlink: Color::Cyan,
                path: Color::Magenta,
                status: Color::Black,
                error: Color::Red,
                heading: Color::Rgb(175, 80, 0),
                keyword: Color::Magenta,
                string: Color::Green,
                comment: Color::DarkGray,
                number: Color::Rgb(175, 80, 0),
                code: Color::Rgb(160, 40, 40),
            },
            "plain" => Theme {
                name: "plain".into(),
                accent: Color::Reset,
                selection: Color::Reset,
                directory: Color::Reset,
                executable: Color::Reset,
                symlink: Color::Reset,
                path: Color::Reset,
                status: Color::Reset,
                error: Color::Reset,
                heading: Color::Reset,
                keyword: Color::Reset,
                string: Color::Reset,
                comment: Color::Reset,
                number: Color::Reset,
                code: Color::Reset,
            },
            _ => Theme {
                name: "default".into(),
                accent: Color::Indexed(238),
                selection: Color::Indexed(236),
                directory: Color::Blue,
                executable: Color::Green,
                symlink: Color::Cyan,
                path: Color::Magenta,
                status: Color::Gray,
                error: Color::Red,
                heading: Color::Yellow,
                keyword: Color::Magenta,
                string: Color::Green,
                comment: Color::DarkGray,
                number: Color::Cyan,
                code: Color::LightRed,
            },
        }
    }

    /// Applies `[theme]` overrides on top of the palette.
    pub fn with_overrides(mut self, o: &ThemeOverrides) -> Self {
        let apply = |slot: &mut Color, value: &Option<String>| {
            if let Some(s) = value {
                *slot = parse_color(s);
            }
        };
        apply(&mut self.accent, &o.accent);
        apply(&mut self.selection, &o.selection);
        apply(&mut self.directory, &o.directory);
        apply(&mut self.executable, &o.executable);
        apply(&mut self.symlink, &o.symlink);
        apply(&mut self.path, &o.path);
        apply(&mut self.status, &o.status);
        apply(&mut self.error, &o.error);
        apply(&mut self.heading, &o.heading);
        apply(&mut self.keyword, &o.keyword);
        apply(&mut self.string, &o.string);
        apply(&mut self.comment, &o.comment);
        apply(&mut self.number, &o.number);
        apply(&mut self.code, &o.code);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_plain(&self) -> bool {
        self.name == "plain"
    }

    // Styles

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn selection_style(&self) -> Style {
        if self.is_plain() {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().bg(self.selection).add_modifier(Modifier::BOLD)
        }
    }

    pub fn directory_style(&self) -> Style {
        Style::default().fg(self.directory).add_modifier(Modifier::BOLD)
    }

    pub fn executable_style(&self) -> Style {
        Style::default().fg(self.executable)
    }

    pub fn symlink_style(&self) -> Style {
        Style::default().fg(self.symlink)
    }

    pub fn path_style(&self) -> Style {
        Style::default().fg(self.path).add_modifier(Modifier::BOLD)
    }

    pub fn status_style(&self) -> Style {
        Style::default().fg(self.status)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    /// Style for a rendered content segment.
    pub fn tag_style(&self, tag: Tag) -> Style {
        let base = Style::default();
        match tag {
            Tag::Plain => base,
            Tag::Heading(1) => base
                .fg(self.heading)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            Tag::Heading(_) => base.fg(self.heading).add_modifier(Modifier::BOLD),
            Tag::Keyword => base.fg(self.keyword).add_modifier(Modifier::BOLD),
            Tag::Str => base.fg(self.string),
            Tag::Comment => base.fg(self.comment).add_modifier(Modifier::ITALIC),
            Tag::Number => base.fg(self.number),
            Tag::Code | Tag::Fence => base.fg(self.code),
            Tag::Emphasis => base.add_modifier(Modifier::ITALIC),
            Tag::Strong => base.add_modifier(Modifier::BOLD),
            Tag::Bullet => base.fg(self.heading),
            Tag::Quote => base.fg(self.comment).add_modifier(Modifier::ITALIC),
            Tag::Rule => base.fg(self.accent),
            Tag::Link => base.fg(self.directory).add_modifier(Modifier::UNDERLINED),
            Tag::LineNumber => base.fg(self.accent),
        }
    }
}
