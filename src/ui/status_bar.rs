use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bar = &theme.statusbar;

    let mode_indicator = match app.focus {
        Focus::List => "NOTES",
        Focus::Title => "TITLE",
        Focus::Body => "BODY",
        Focus::FontFamily => "FONT",
        Focus::FontSize => "SIZE",
    };

    let logo = Span::styled(
        " ◆ Inkpad ",
        Style::default()
            .fg(theme.background)
            .bg(bar.brand)
            .add_modifier(Modifier::BOLD),
    );

    let mode = Span::styled(
        format!(" {} ", mode_indicator),
        Style::default().fg(theme.background).bg(bar.mode),
    );

    let title = app
        .active_note()
        .map(|n| n.title)
        .unwrap_or_else(|| "No note".to_string());
    let current = Span::styled(format!(" {} ", title), Style::default().fg(bar.foreground));

    let count_text = if app.store.is_empty() {
        "no notes".to_string()
    } else {
        format!("{} notes", app.store.len())
    };
    let count = Span::styled(count_text, Style::default().fg(theme.secondary));

    let separator = Span::styled(" │ ", Style::default().fg(theme.muted));

    let help_key = Span::styled(
        " ? for help ",
        Style::default().fg(bar.foreground).bg(theme.selection),
    );

    let mut right_content = Vec::new();
    if !app.is_persistent() {
        right_content.push(Span::styled(
            " memory only ",
            Style::default()
                .fg(theme.background)
                .bg(theme.error)
                .add_modifier(Modifier::BOLD),
        ));
        right_content.push(separator.clone());
    }
    right_content.extend([count, separator, help_key]);

    // Justify-between layout
    let left_content = vec![logo, Span::raw(" "), mode, current];
    let left_width: usize = left_content.iter().map(|s| s.content.width()).sum();
    let right_width: usize = right_content.iter().map(|s| s.content.width()).sum();
    let padding = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_content;
    spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bar.background)));
    spans.extend(right_content);

    let status_bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(bar.background));
    f.render_widget(status_bar, area);
}
