use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::truncate_to_width;
use crate::app::{App, Focus};
use crate::list::{self, ListLayout, ADD_LABEL, DELETE_WIDTH, ROW_HEIGHT};
use crate::markup;

pub fn render_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;
    let notes = list::sorted_by_recency(app.store.notes());
    let active_id = app.store.active_id();

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_rows = (area.height.saturating_sub(2) / ROW_HEIGHT).max(1) as usize;

    // Keep the list cursor on screen
    if app.list_cursor < app.list_scroll {
        app.list_scroll = app.list_cursor;
    } else if app.list_cursor >= app.list_scroll + visible_rows {
        app.list_scroll = app.list_cursor + 1 - visible_rows;
    }
    app.list_scroll = app.list_scroll.min(notes.len().saturating_sub(1));

    let list_focused = app.focus == Focus::List;
    let title_width = inner_width.saturating_sub(DELETE_WIDTH as usize);

    let mut lines: Vec<Line> = Vec::new();
    let mut visible_ids = Vec::new();
    for (idx, note) in notes.iter().enumerate().skip(app.list_scroll).take(visible_rows) {
        visible_ids.push(note.id.clone());

        let is_active = active_id == Some(note.id.as_str());
        let under_cursor = list_focused && idx == app.list_cursor;
        let row_bg = if under_cursor {
            Style::default().bg(theme.selection)
        } else {
            Style::default()
        };

        let title_style = if is_active {
            Style::default().fg(theme.sidebar.title_active).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.sidebar.title)
        };
        let title = truncate_to_width(&note.title, title_width);
        let padding = title_width.saturating_sub(unicode_width::UnicodeWidthStr::width(title.as_str()));
        lines.push(
            Line::from(vec![
                Span::styled(title, title_style),
                Span::raw(" ".repeat(padding)),
                Span::styled(" ✕ ", Style::default().fg(theme.sidebar.delete)),
            ])
            .style(row_bg),
        );

        // Preview renders inline formatting, as the row would in a browser
        let preview = list::preview(&note.body);
        let mut remaining = inner_width;
        let mut spans = Vec::new();
        for (text, modifier) in markup::styled_runs(&preview) {
            if remaining == 0 {
                break;
            }
            let cut = truncate_to_width(&text, remaining);
            remaining -= unicode_width::UnicodeWidthStr::width(cut.as_str());
            spans.push(Span::styled(
                cut,
                Style::default().fg(theme.sidebar.preview).add_modifier(modifier),
            ));
        }
        lines.push(Line::from(spans).style(row_bg));

        lines.push(
            Line::from(Span::styled(
                list::format_timestamp(note.last_modified),
                Style::default().fg(theme.sidebar.date),
            ))
            .style(row_bg),
        );
    }

    let border_style = if list_focused {
        Style::default().fg(theme.border_focused)
    } else {
        Style::default().fg(theme.border)
    };

    let add_line = Line::from(Span::styled(
        ADD_LABEL,
        Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
    ));
    let add_width = add_line.width() as u16;

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" Notes ({}) ", notes.len()))
            .title_top(add_line.right_aligned())
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(sidebar, area);

    let right = area.x + area.width;
    let add_button = (area.width > add_width + 2).then(|| (right - 1 - add_width, right - 1));
    app.list_layout = ListLayout {
        area,
        add_button,
        visible_ids,
    };
}
