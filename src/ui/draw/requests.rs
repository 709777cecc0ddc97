//! Main screen drawing:
//! - Filter bar
//! - Source list
//! - Details pane for the selection
//! - Status bar

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::ui::details::details_lines;
use crate::ui::source_row::{Markers, SourceRowWidget};
use crate::ui::theme::Theme;

pub(crate) fn draw_requests(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(app.theme().background));
    f.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter bar
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let (list_area, details_area) = if app.config().behavior.show_details {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        (body[0], Some(body[1]))
    } else {
        (chunks[1], None)
    };

    // Hit-testing uses the same area the rows are drawn into.
    app.view_mut().set_area(list_area);

    let app = &*app;
    let theme = app.theme();
    draw_filter_bar(f, app, chunks[0], theme);
    draw_source_list(f, app, list_area, theme);
    if let Some(details_area) = details_area {
        draw_details(f, app, details_area, theme);
    }
    draw_status_bar(f, app, chunks[2], theme);
}

fn draw_filter_bar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let prompt = &app.config().appearance.prompt;

    let filter_text = if app.is_filtering() || !app.filter_text().is_empty() {
        format!("{}{}", prompt, app.filter_text())
    } else {
        format!("{}Type to filter...", prompt)
    };

    let style = if app.is_filtering() {
        Style::default()
            .fg(theme.search_highlight)
            .bg(theme.background)
    } else {
        Style::default().fg(theme.dimmed).bg(theme.background)
    };

    let bar = Paragraph::new(filter_text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" netlog-view ")
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(bar, area);

    if app.is_filtering() {
        // +1 for the left border
        let cursor_x = area.x + 1 + prompt.width() as u16 + app.filter_text().width() as u16;
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_source_list(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let list = app.view().list();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed))
        .title(" Sources ")
        .style(Style::default().bg(theme.background));
    f.render_widget(block, area);

    // Mid-batch the list is hidden; only the frame is drawn.
    if !list.is_visible() {
        return;
    }

    let appearance = &app.config().appearance;
    let markers = Markers {
        selected: &appearance.selected_marker,
        unselected: &appearance.unselected_marker,
    };
    let columns = app.view().columns();

    for (uid, rect) in list.viewport() {
        let Some(row) = list.get(uid).and_then(|entry| entry.row()) else {
            continue;
        };
        f.render_widget(SourceRowWidget::new(row, theme, columns, markers), rect);
    }
}

fn draw_details(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed))
        .title(" Details ")
        .style(Style::default().bg(theme.background));

    let entries = app.view().selected_entries();
    let paragraph = if entries.is_empty() {
        Paragraph::new("No source selected").style(Style::default().fg(theme.dimmed))
    } else {
        Paragraph::new(details_lines(&entries, theme)).scroll((app.details_scroll(), 0))
    };
    f.render_widget(paragraph.block(block), area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let view = app.view();
    let reading = if app.input_finished() { "" } else { " (reading)" };
    let pending = match view.pending_sources() {
        0 => String::new(),
        n => format!(" | {} pending", n),
    };

    let status = format!(
        " {}/{} sources | {} selected | {} records{}{} | /: filter  m: menu  d: delete  q: quit",
        view.postfilter_count(),
        view.total_sources(),
        view.selected_count(),
        app.records_seen(),
        reading,
        pending,
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().fg(theme.dimmed).bg(theme.background));
    f.render_widget(status_bar, area);
}
