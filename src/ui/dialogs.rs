use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::app::App;

const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("Tab/S-Tab", "Cycle focus"),
            ("Ctrl+N", "New note"),
            ("Esc", "Back to the note list"),
            ("?/F1", "Toggle this help"),
            ("Ctrl+Q", "Quit"),
        ],
    ),
    (
        "Notes",
        &[
            ("j/k", "Move up/down"),
            ("g/G", "First/last note"),
            ("Enter", "Open note"),
            ("n", "New note"),
            ("d/Del", "Delete note"),
            ("q", "Quit"),
        ],
    ),
    (
        "Body",
        &[
            ("Ctrl+B/I/U", "Bold / italic / underline"),
            ("Ctrl+Z/Y", "Undo / redo"),
            ("Shift+Arrows", "Select text"),
            ("Ctrl+A", "Select all"),
            ("Ctrl+C/X/V", "Copy / cut / paste"),
        ],
    ),
    (
        "Font",
        &[
            ("←/→", "Previous/next family"),
            ("0-9 ↑/↓", "Edit or step size"),
        ],
    ),
];

pub fn render_help_dialog(f: &mut Frame, app: &App) {
    let theme = &app.theme;

    let key_style = Style::default().fg(theme.warning);
    let desc_style = Style::default().fg(theme.foreground);
    let header_style = Style::default().fg(theme.primary).add_modifier(Modifier::BOLD);

    let mut content = vec![Line::from("")];
    for (header, keys) in HELP_SECTIONS {
        content.push(Line::from(Span::styled(format!("  {}", header), header_style)));
        for (key, desc) in *keys {
            content.push(Line::from(vec![
                Span::styled(format!("  {:<14}", key), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
        content.push(Line::from(""));
    }
    content.push(Line::from(Span::styled(
        "  Press Esc or ? to close",
        Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
    )));

    let dialog_area = centered_rect(f.area(), 50, content.len() as u16 + 2);
    f.render_widget(Clear, dialog_area);

    let help = Paragraph::new(content).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(help, dialog_area);
}
