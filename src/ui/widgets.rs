//! Dialog and status widgets drawn on top of the main area.
//!
//! All dialogs are centered boxes cleared before drawing. The input dialog
//! scrolls its text horizontally so the cursor stays visible.

use crate::app::AppState;
use crate::app::actions::ActionMode;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Rectangle of `width` x `height` centered in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(ratatui::layout::Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(ratatui::layout::Flex::Center)
        .areas(row);
    rect
}

fn dialog_block(title: String, border_style: Style) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(format!(" {title} "), border_style))
}

/// Draws the open line prompt or yes/no question, if any.
pub fn draw_prompt(frame: &mut Frame, app: &AppState) {
    let theme = app.config().theme();
    match app.actions().mode() {
        ActionMode::Normal => {}
        ActionMode::Confirm { prompt } => {
            let area = centered_rect(frame.area(), prompt.width() as u16 + 6, 5);
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(format!("\n{prompt}"))
                    .block(dialog_block(String::new(), theme.error_style()))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
        ActionMode::Input { prompt, .. } => {
            let width = (frame.area().width.saturating_sub(4)).clamp(20, 70);
            let area = centered_rect(frame.area(), width, 3);
            let block = dialog_block(prompt.clone(), theme.accent_style());
            let inner = block.inner(area);
            let visible_width = inner.width.saturating_sub(1) as usize;
            let (visible, cursor_offset) = input_field_view(
                app.actions().input_buffer(),
                app.actions().input_cursor_pos(),
                visible_width,
            );

            frame.render_widget(Clear, area);
            frame.render_widget(Paragraph::new(visible.to_string()).block(block), area);
            frame.set_cursor_position(Position::new(
                inner.x + cursor_offset as u16,
                inner.y,
            ));
        }
    }
}

/// Tail of `input_text` that fits `visible_width` cells, and the cursor's
/// cell offset into it. `cursor_pos` is a byte index.
fn input_field_view(input_text: &str, cursor_pos: usize, visible_width: usize) -> (&str, usize) {
    let cursor_pos = cursor_pos.min(input_text.len());
    if input_text.width() <= visible_width {
        return (input_text, input_text[..cursor_pos].width());
    }

    let mut current_w = 0;
    let mut start = 0;
    for (idx, ch) in input_text.char_indices().rev() {
        current_w += ch.width().unwrap_or(0);
        if current_w > visible_width {
            start = idx + ch.len_utf8();
            break;
        }
    }

    let cursor_offset = if cursor_pos < start {
        0
    } else {
        input_text[start..cursor_pos].width()
    };
    (&input_text[start..], cursor_offset)
}

/// Draws the key binding table built from the active keymap.
pub fn draw_keybind_help(frame: &mut Frame, app: &AppState) {
    let theme = app.config().theme();
    let tr = app.translator();
    let bindings = app.keymap().bindings();

    let key_style = theme.accent_style().add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = bindings
        .iter()
        .map(|(action, keys)| {
            let labels: Vec<String> = keys.iter().map(|k| k.label()).collect();
            Line::from(vec![
                Span::styled(format!("{:<16}", labels.join(", ")), key_style),
                Span::raw(action.describe()),
            ])
        })
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(tr.t("viewer_help").into_owned(), theme.status_style()));
    lines.push(Line::styled(tr.t("editor_help").into_owned(), theme.status_style()));

    let area = centered_rect(frame.area(), 72, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(dialog_block(tr.t("help_title").into_owned(), theme.accent_style()))
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// One-line status bar: `left` aligned left, `right` aligned right.
pub fn draw_status_line(frame: &mut Frame, area: Rect, left: Span, right: Span) {
    let [l, r] = Layout::horizontal([Constraint::Min(0), Constraint::Length(right.width() as u16)])
        .areas(area);
    frame.render_widget(Paragraph::new(Line::from(left)), l);
    frame.render_widget(Paragraph::new(Line::from(right)).alignment(Alignment::Right), r);
}
