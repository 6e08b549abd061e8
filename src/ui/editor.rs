use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::truncate_to_width;
use crate::app::{App, EditorHit, Focus};
use crate::editor::FormatCommand;
use crate::panel::PLACEHOLDER;

pub fn render_editor(f: &mut Frame, app: &mut App, area: Rect) {
    app.editor_hits.clear();

    let Some(note) = app.active_note() else {
        render_placeholder(f, app, area);
        return;
    };

    let theme = app.theme.clone();
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Font controls
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Formatting toolbar
        ])
        .split(inner);

    // Font controls
    let control_style = |focused: bool| {
        if focused {
            Style::default().fg(theme.background).bg(theme.editor.control).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.editor.control)
        }
    };
    let family_focused = app.focus == Focus::FontFamily;
    let size_focused = app.focus == Focus::FontSize;
    let size_text = if size_focused {
        format!("[{}_]", app.size_input)
    } else {
        format!("[{}]", note.font_size)
    };
    let spans = vec![
        Span::styled(" Font ", Style::default().fg(theme.muted)),
        Span::styled("◂", control_style(family_focused)),
        Span::styled(format!(" {} ", note.font_family), control_style(family_focused)),
        Span::styled("▸", control_style(family_focused)),
        Span::styled("   Size ", Style::default().fg(theme.muted)),
        Span::styled(size_text, control_style(size_focused)),
    ];
    let mut x = chunks[0].x;
    let y = chunks[0].y;
    for (idx, span) in spans.iter().enumerate() {
        let width = span.width() as u16;
        let hit = match idx {
            1 => Some(EditorHit::FontPrevious),
            2 => Some(EditorHit::FontNext),
            3 => Some(EditorHit::FontNext),
            5 => Some(EditorHit::FontSize),
            _ => None,
        };
        if let Some(hit) = hit {
            app.editor_hits.push((Rect::new(x, y, width, 1), hit));
        }
        x = x.saturating_add(width);
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    // Title input
    let title_focused = app.focus == Focus::Title;
    let title_block = Block::default()
        .borders(Borders::ALL)
        .title(" Title ")
        .border_style(Style::default().fg(if title_focused { theme.border_focused } else { theme.border }));
    let title_width = chunks[1].width.saturating_sub(2) as usize;
    let title_line = if title_focused {
        title_with_cursor(&note.title, app.title_cursor, title_width, &theme)
    } else {
        Line::from(Span::styled(
            truncate_to_width(&note.title, title_width),
            Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD),
        ))
    };
    f.render_widget(Paragraph::new(title_line).block(title_block), chunks[1]);
    app.editor_hits.push((chunks[1], EditorHit::Title));

    // Body surface
    let body_area = chunks[2];
    app.body_area = body_area;
    app.editor
        .surface_mut()
        .set_view_size(body_area.width.saturating_sub(2) as usize, body_area.height.saturating_sub(2) as usize);
    f.render_widget(app.editor.surface(), body_area);
    app.editor_hits.push((body_area, EditorHit::Body));

    // Formatting toolbar
    let mut x = chunks[3].x + 1;
    let y = chunks[3].y;
    let mut spans = vec![Span::raw(" ")];
    for command in FormatCommand::all() {
        let modifier = match command {
            FormatCommand::Bold => Modifier::BOLD,
            FormatCommand::Italic => Modifier::ITALIC,
            FormatCommand::Underline => Modifier::UNDERLINED,
            FormatCommand::Undo | FormatCommand::Redo => Modifier::empty(),
        };
        let button = Span::styled(
            format!(" {} ", command.label()),
            Style::default().fg(theme.foreground).bg(theme.selection).add_modifier(modifier),
        );
        let width = button.width() as u16;
        app.editor_hits.push((Rect::new(x, y, width, 1), EditorHit::Format(*command)));
        x = x.saturating_add(width + 1);
        spans.push(button);
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[3]);
}

fn title_with_cursor(
    title: &str,
    cursor: usize,
    width: usize,
    theme: &crate::config::Theme,
) -> Line<'static> {
    let chars: Vec<char> = title.chars().collect();
    let cursor = cursor.min(chars.len());
    // Scroll so the cursor stays inside the box
    let start = (cursor + 1).saturating_sub(width).min(cursor);
    let text_style = Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD);

    let before: String = chars[start..cursor].iter().collect();
    let at: String = chars.get(cursor).map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
    let after: String = chars.iter().skip(cursor + 1).collect();
    let after = truncate_to_width(&after, width.saturating_sub(cursor - start + 1));

    Line::from(vec![
        Span::styled(before, text_style),
        Span::styled(at, text_style.add_modifier(Modifier::REVERSED)),
        Span::styled(after, text_style),
    ])
}

fn render_placeholder(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let top = inner.height.saturating_sub(2) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        PLACEHOLDER,
        Style::default().fg(theme.editor.placeholder).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "press n or click [+]",
        Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
    )));
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
