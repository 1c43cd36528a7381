//! UI renderer implementation.
//!
//! Contains the top-level [render] entry point used by the terminal loop. The
//! screen is a header line, a bordered main area and a status line, with
//! dialogs drawn over the top.
//!
//! This module should stay mostly pure rendering: it reads state and config and
//! produces widgets. The only thing it writes back is the main area height.

use crate::app::{AppState, View};
use crate::core::formatter::{format_entry_kind, format_file_size, format_file_time};
use crate::ui::{overlays::Overlay, panes, widgets};
use crate::utils::shorten_home_path;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Renders the entire terminal UI for one frame.
pub fn render(frame: &mut Frame, app: &mut AppState) {
    let [header, main, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    app.set_view_height(main.height.saturating_sub(2) as usize);
    let app = &*app;

    render_header(frame, app, header);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.config().theme().accent_style());
    match app.view() {
        View::Browser => {
            panes::draw_browser(frame, app, main, block);
            if app.nav().listing().real_entries().next().is_none() {
                render_empty_hint(frame, app, main);
            }
        }
        View::Viewer(viewer) => panes::draw_viewer(frame, app, viewer, main, block),
        View::Editor(session) => panes::draw_editor(frame, app, session, main, block),
    }

    render_footer(frame, app, footer);
    render_overlays(frame, app);
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let theme = app.config().theme();
    let tr = app.translator();

    let line = match app.view() {
        View::Browser => Line::from(vec![
            Span::styled(
                format!("{}: ", tr.t("current_directory")),
                theme.status_style(),
            ),
            Span::styled(shorten_home_path(app.nav().current_dir()), theme.path_style()),
        ]),
        View::Viewer(viewer) => {
            let (page, pages) = viewer.page();
            Line::from(vec![
                Span::styled(shorten_home_path(viewer.path()), theme.path_style()),
                Span::styled(
                    format!(
                        "  {} {} | {} {}/{}",
                        viewer.document().line_count(),
                        tr.t("line"),
                        tr.t("page"),
                        page,
                        pages
                    ),
                    theme.status_style(),
                ),
            ])
        }
        View::Editor(session) => {
            let buffer = session.buffer();
            let mut spans = vec![Span::styled(
                shorten_home_path(buffer.path()),
                theme.path_style(),
            )];
            if buffer.is_dirty() {
                spans.push(Span::styled(
                    format!(" [{}]", tr.t("modified")),
                    theme.error_style(),
                ));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_empty_hint(frame: &mut Frame, app: &AppState, main: Rect) {
    let rows = app.nav().len() as u16;
    let area = Rect {
        x: main.x + 3,
        y: main.y + 1 + rows,
        width: main.width.saturating_sub(4),
        height: 1,
    };
    if area.y < main.y + main.height.saturating_sub(1) {
        frame.render_widget(
            Paragraph::new(Span::styled(
                app.translator().t("empty_directory").into_owned(),
                app.config().theme().status_style(),
            )),
            area,
        );
    }
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let theme = app.config().theme();
    let tr = app.translator();

    if let Some((text, is_error)) = app.overlays().message() {
        let style = if is_error {
            theme.error_style()
        } else {
            theme.status_style()
        };
        frame.render_widget(Paragraph::new(Span::styled(text.to_string(), style)), area);
        return;
    }

    let (left, right) = match app.view() {
        View::Browser => {
            let left = app
                .nav()
                .selected_entry()
                .map(|e| {
                    format!(
                        "{}  {}  {}",
                        format_entry_kind(e.kind()),
                        format_file_size(e),
                        format_file_time(e.modified())
                    )
                })
                .unwrap_or_default();
            let count = app
                .nav()
                .len()
                .saturating_sub(app.nav().listing().synthetic_len());
            let mut right = format!("{} {}", count, tr.t("entries"));
            if let Some(filter) = app.nav().filter()
                && app.nav().filter_active()
            {
                right = format!("[{}]  {}", filter.label(), right);
            }
            (left, right)
        }
        View::Viewer(viewer) => {
            let right = match (viewer.search_term(), viewer.match_position()) {
                (Some(term), Some((k, n))) => format!("\"{term}\" {k}/{n}"),
                _ => String::new(),
            };
            (tr.t("viewer_help").into_owned(), right)
        }
        View::Editor(session) => {
            if let Some((text, is_error)) = session.status() {
                let style = if is_error {
                    theme.error_style()
                } else {
                    theme.status_style()
                };
                frame.render_widget(Paragraph::new(Span::styled(text.to_string(), style)), area);
                return;
            }
            let buffer = session.buffer();
            let (row, col) = buffer.cursor();
            let mode = if buffer.is_overwrite() {
                tr.t("overwrite")
            } else {
                tr.t("insert")
            };
            (
                tr.t("editor_help").into_owned(),
                format!(
                    "{}:{}  {}  {} ",
                    row + 1,
                    col + 1,
                    mode,
                    buffer.encoding_label()
                ),
            )
        }
    };

    widgets::draw_status_line(
        frame,
        area,
        Span::styled(left, theme.status_style()),
        Span::styled(right, theme.status_style()),
    );
}

fn render_overlays(frame: &mut Frame, app: &AppState) {
    widgets::draw_prompt(frame, app);
    for overlay in app.overlays().iter() {
        match overlay {
            Overlay::KeybindHelp => widgets::draw_keybind_help(frame, app),
            // Shown in the status line.
            Overlay::Message { .. } => {}
        }
    }
}
