//! UI pane drawing module for kaser.
//!
//! Draws whatever occupies the main area: the directory listing, the viewer
//! or the editor. Used internally by [crate::ui::render].

use crate::app::{AppState, EditorSession, ViewerState};
use crate::config::Theme;
use crate::core::content::{StyledLine, Tag};
use crate::core::fm::{EntryKind, ListEntry};
use crate::core::formatter::{format_file_size, sanitize_to_exact_width};
use crate::ui::icons::icon_for;

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

const SIZE_COLUMN: usize = 10;

/// Draws the listing with the selection highlighted.
pub fn draw_browser(frame: &mut Frame, app: &AppState, area: Rect, block: Block) {
    let theme = app.config().theme();
    let inner_width = block.inner(area).width as usize;
    let name_width = inner_width.saturating_sub(SIZE_COLUMN + 4);
    let show_icons = !theme.is_plain();

    let items: Vec<ListItem> = app
        .nav()
        .rows()
        .map(|row| ListItem::new(row_line(row, theme, name_width, show_icons)))
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.nav().selected_idx()));

    frame.render_stateful_widget(
        List::new(items)
            .block(block)
            .highlight_style(theme.selection_style())
            .highlight_symbol("› ")
            .scroll_padding(2),
        area,
        &mut state,
    );
}

fn row_line(row: &ListEntry, theme: &Theme, name_width: usize, show_icons: bool) -> Line<'static> {
    let (icon, name, style, size) = match row {
        ListEntry::Parent => ("⬆️", "..".to_string(), theme.directory_style(), String::new()),
        ListEntry::Root => ("💽", "/".to_string(), theme.directory_style(), String::new()),
        ListEntry::Entry(e) => {
            let mut name = e.name_str().into_owned();
            if e.is_dir_like() {
                name.push('/');
            }
            let style = match e.kind() {
                _ if e.is_broken_link() => theme.error_style(),
                EntryKind::Symlink => theme.symlink_style(),
                _ if e.is_dir_like() => theme.directory_style(),
                _ if e.is_executable() => theme.executable_style(),
                _ => Style::default(),
            };
            (
                icon_for(e.kind(), &e.name_str()),
                name,
                style,
                format_file_size(e),
            )
        }
    };

    let mut spans = Vec::with_capacity(4);
    let mut width = name_width;
    if show_icons {
        // Emoji are two cells wide; pad narrow ones so names line up.
        let pad = 2usize.saturating_sub(icon.width());
        spans.push(Span::raw(format!("{icon}{} ", " ".repeat(pad))));
        width = width.saturating_sub(3);
    }
    spans.push(Span::styled(sanitize_to_exact_width(&name, width), style));
    spans.push(Span::raw(format!(" {:>SIZE_COLUMN$}", size)));
    Line::from(spans)
}

/// Converts a rendered line into ratatui spans. Tags are ignored when `plain`.
pub fn styled_line(line: &StyledLine, theme: &Theme, plain: bool) -> Line<'static> {
    Line::from(
        line.segments()
            .iter()
            .map(|s| {
                let style = if plain {
                    Style::default()
                } else {
                    theme.tag_style(s.tag)
                };
                Span::styled(s.text.replace('\t', "    "), style)
            })
            .collect::<Vec<_>>(),
    )
}

/// Draws the visible page of the viewer. Lines matching the search are underlined.
pub fn draw_viewer(frame: &mut Frame, app: &AppState, viewer: &ViewerState, area: Rect, block: Block) {
    let theme = app.config().theme();
    let plain = !app.renderer().is_rich();

    let lines: Vec<Line> = viewer
        .visible_lines()
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let line = styled_line(l, theme, plain);
            if viewer.is_match(viewer.top() + i) {
                line.patch_style(Style::default().add_modifier(Modifier::UNDERLINED))
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draws the editor buffer with line numbers and places the terminal cursor.
pub fn draw_editor(frame: &mut Frame, app: &AppState, session: &EditorSession, area: Rect, block: Block) {
    let theme = app.config().theme();
    let inner = block.inner(area);
    let buffer = session.buffer();
    let digits = buffer.lines().len().to_string().len().max(3);
    let number_style = theme.tag_style(Tag::LineNumber);

    let lines: Vec<Line> = buffer
        .lines()
        .iter()
        .enumerate()
        .skip(session.scroll())
        .take(inner.height as usize)
        .map(|(row, text)| {
            Line::from(vec![
                Span::styled(format!("{:>digits$} ", row + 1), number_style),
                Span::raw(text.replace('\t', "    ")),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);

    let (row, col) = buffer.cursor();
    let before: String = buffer
        .lines()
        .get(row)
        .map(|l| l.chars().take(col).collect())
        .unwrap_or_default();
    let x = inner.x as usize + digits + 1 + before.replace('\t', "    ").width();
    let y = inner.y as usize + row.saturating_sub(session.scroll());
    if x < (inner.x + inner.width) as usize && y < (inner.y + inner.height) as usize {
        frame.set_cursor_position(Position::new(x as u16, y as u16));
    }
}
