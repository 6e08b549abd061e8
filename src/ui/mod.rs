mod dialogs;
mod editor;
mod sidebar;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, DialogState};

pub use dialogs::render_help_dialog;
pub use editor::render_editor;
pub use sidebar::render_sidebar;
pub use status_bar::render_status_bar;

pub fn render(f: &mut Frame, app: &mut App) {
    // Create vertical layout: main area + status bar
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Main area
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let sidebar_width = app.config.sidebar_width();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(sidebar_width),
            Constraint::Percentage(100 - sidebar_width),
        ])
        .split(vertical_chunks[0]);

    render_sidebar(f, app, chunks[0]);
    render_editor(f, app, chunks[1]);
    render_status_bar(f, app, vertical_chunks[1]);

    if app.dialog == DialogState::Help {
        render_help_dialog(f, app);
    }
}

/// Cut `text` to at most `width` terminal cells.
pub(crate) fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::Clipboard;
    use crate::config::{Config, Theme};
    use crate::list::ListIntent;
    use crate::panel::PLACEHOLDER;
    use crate::storage::MemoryStorage;
    use crate::store::NoteStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        let store = NoteStore::initialize(Box::new(MemoryStorage::new()));
        App::new(Config::default(), Theme::default(), store, Clipboard::internal())
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("ok", 10), "ok");
    }

    #[test]
    fn test_render_shows_note_and_records_layout() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("This is your first note!"));
        assert!(text.contains("Type your text here!..."));
        assert_eq!(app.list_layout.visible_ids.len(), 1);
        assert!(app.list_layout.add_button.is_some());
    }

    #[test]
    fn test_render_placeholder_without_active_note() {
        let mut app = app();
        let id = app.store.active_id().unwrap().to_string();
        app.dispatch(ListIntent::Delete(id));
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains(PLACEHOLDER));
        assert!(app.editor_hits.is_empty());
    }

    #[test]
    fn test_clicks_on_rendered_list() {
        let mut app = app();
        let first = app.store.active_id().unwrap().to_string();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let (start, _) = app.list_layout.add_button.unwrap();
        let header_y = app.list_layout.area.y;
        assert_eq!(app.list_layout.hit_test(start + 1, header_y), Some(ListIntent::Add));

        let area = app.list_layout.area;
        let delete_x = area.x + area.width - 3;
        assert_eq!(
            app.list_layout.hit_test(delete_x, area.y + 1),
            Some(ListIntent::Delete(first.clone()))
        );
        assert_eq!(
            app.list_layout.hit_test(area.x + 2, area.y + 2),
            Some(ListIntent::Select(first))
        );
    }

    #[test]
    fn test_status_bar_storage_and_count() {
        let store = NoteStore::initialize(Box::new(MemoryStorage::failing()));
        let mut app = App::new(Config::default(), Theme::default(), store, Clipboard::internal());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        let status = text.lines().last().unwrap();
        assert!(status.contains("memory only"));
        assert!(status.contains("1 notes"));

        let buffer = terminal.backend().buffer();
        let y = buffer.area.height - 1;
        let chip_x = status.find("memory only").map(|i| status[..i].chars().count()).unwrap();
        assert_eq!(buffer[(chip_x as u16, y)].bg, app.theme.error);
        let count_x = status.find("1 notes").map(|i| status[..i].chars().count()).unwrap();
        assert_eq!(buffer[(count_x as u16, y)].fg, app.theme.secondary);

        let id = app.store.active_id().unwrap().to_string();
        app.dispatch(ListIntent::Delete(id));
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.lines().last().unwrap().contains("no notes"));
    }
}
