use std::io;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::app::{App, DialogState, Focus};
use crate::editor::{CursorMove, FormatCommand};
use crate::list::ListIntent;
use crate::ui;

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal.draw(|f| ui::render(f, app))?;
            needs_render = false;
        }

        // idle block until event to avoid unnecessary cpu usage
        process_events(app, &mut needs_render)?;
        if app.should_quit {
            return Ok(());
        }
    }
}

// Drain bursts of input (held keys, pastes) before the next frame
fn process_events(app: &mut App, needs_render: &mut bool) -> io::Result<()> {
    const MAX_EVENTS_PER_BATCH: u8 = 8;
    let mut count = 0u8;

    loop {
        let event = event::read()?;
        count += 1;
        *needs_render = true;

        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
            Event::Mouse(mouse) => handle_mouse_event(app, mouse),
            Event::Paste(text) => handle_paste_event(app, text),
            _ => {}
        }

        if app.should_quit || count >= MAX_EVENTS_PER_BATCH || !event::poll(std::time::Duration::ZERO)? {
            break;
        }
    }

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if app.dialog == DialogState::Help {
        handle_help_dialog(app, key);
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('n') if ctrl => {
            app.dispatch(ListIntent::Add);
            return;
        }
        KeyCode::Tab => {
            app.toggle_focus(false);
            return;
        }
        KeyCode::BackTab => {
            app.toggle_focus(true);
            return;
        }
        KeyCode::F(1) => {
            app.dialog = DialogState::Help;
            return;
        }
        KeyCode::Esc => {
            app.set_focus(Focus::List);
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::List => handle_list_keys(app, key),
        Focus::Title => handle_title_keys(app, key),
        Focus::Body => handle_body_keys(app, key),
        Focus::FontFamily => handle_font_family_keys(app, key),
        Focus::FontSize => handle_font_size_keys(app, key),
    }
}

fn handle_help_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) | KeyCode::Enter => {
            app.dialog = DialogState::None;
        }
        _ => {}
    }
}

fn handle_list_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.dialog = DialogState::Help,
        KeyCode::Char('j') | KeyCode::Down => app.next_list_item(),
        KeyCode::Char('k') | KeyCode::Up => app.previous_list_item(),
        KeyCode::Char('g') | KeyCode::Home => app.goto_first_list_item(),
        KeyCode::Char('G') | KeyCode::End => app.goto_last_list_item(),
        KeyCode::Char('n') | KeyCode::Char('a') => app.dispatch(ListIntent::Add),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if let Some(id) = app.id_under_list_cursor() {
                app.dispatch(ListIntent::Select(id));
                app.set_focus(Focus::Body);
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.id_under_list_cursor() {
                app.dispatch(ListIntent::Select(id));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.id_under_list_cursor() {
                app.dispatch(ListIntent::Delete(id));
            }
        }
        _ => {}
    }
}

fn handle_title_keys(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('v') if ctrl => app.paste(),
        KeyCode::Char(c) if !ctrl => app.title_insert_char(c),
        KeyCode::Backspace => app.title_backspace(),
        KeyCode::Delete => app.title_delete(),
        KeyCode::Left => app.move_title_cursor(CursorMove::Back),
        KeyCode::Right => app.move_title_cursor(CursorMove::Forward),
        KeyCode::Home => app.move_title_cursor(CursorMove::Head),
        KeyCode::End => app.move_title_cursor(CursorMove::End),
        KeyCode::Enter | KeyCode::Down => app.set_focus(Focus::Body),
        _ => {}
    }
}

fn handle_body_keys(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl {
        match key.code {
            KeyCode::Char('b') => app.apply_format(FormatCommand::Bold),
            KeyCode::Char('i') => app.apply_format(FormatCommand::Italic),
            KeyCode::Char('u') => app.apply_format(FormatCommand::Underline),
            KeyCode::Char('z') => app.apply_format(FormatCommand::Undo),
            KeyCode::Char('y') => app.apply_format(FormatCommand::Redo),
            KeyCode::Char('a') => app.editor.surface_mut().select_all(),
            KeyCode::Char('c') => app.copy_selection(),
            KeyCode::Char('x') => app.cut_selection(),
            KeyCode::Char('v') => app.paste(),
            KeyCode::Left => app.move_body_cursor(CursorMove::WordBack, shift),
            KeyCode::Right => app.move_body_cursor(CursorMove::WordForward, shift),
            KeyCode::Home => app.move_body_cursor(CursorMove::Top, shift),
            KeyCode::End => app.move_body_cursor(CursorMove::Bottom, shift),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char(c) => app.edit_body(|surface| {
            surface.insert_char(c);
            true
        }),
        KeyCode::Enter => app.edit_body(|surface| {
            surface.insert_newline();
            true
        }),
        KeyCode::Backspace => app.edit_body(|surface| surface.backspace()),
        KeyCode::Delete => app.edit_body(|surface| surface.delete_forward()),
        KeyCode::Left => app.move_body_cursor(CursorMove::Back, shift),
        KeyCode::Right => app.move_body_cursor(CursorMove::Forward, shift),
        KeyCode::Up => app.move_body_cursor(CursorMove::Up, shift),
        KeyCode::Down => app.move_body_cursor(CursorMove::Down, shift),
        KeyCode::Home => app.move_body_cursor(CursorMove::Head, shift),
        KeyCode::End => app.move_body_cursor(CursorMove::End, shift),
        _ => {}
    }
}

fn handle_font_family_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('k') | KeyCode::Up => app.cycle_font_family(true),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('j') | KeyCode::Down => app.cycle_font_family(false),
        KeyCode::Enter => app.set_focus(Focus::Body),
        _ => {}
    }
}

fn handle_font_size_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() => app.size_input_char(c),
        KeyCode::Backspace => app.size_input_backspace(),
        KeyCode::Up | KeyCode::Char('+') => app.step_font_size(1),
        KeyCode::Down | KeyCode::Char('-') => app.step_font_size(-1),
        KeyCode::Enter => app.set_focus(Focus::Body),
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.dialog != DialogState::None {
        if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            app.dialog = DialogState::None;
        }
        return;
    }

    let (x, y) = (mouse.column, mouse.row);
    let area = app.list_layout.area;
    let in_list = x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if in_list {
                if let Some(intent) = app.list_layout.hit_test(x, y) {
                    debug!(x, y, "list click");
                    app.set_focus(Focus::List);
                    app.dispatch(intent);
                }
            } else if let Some(hit) = app.editor_hit_at(x, y) {
                app.handle_editor_click(hit, x, y);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if app.focus == Focus::Body => {
            let body = app.body_area;
            app.editor.surface_mut().extend_selection_to_screen(body, x, y);
        }
        MouseEventKind::ScrollDown => {
            if in_list {
                app.next_list_item();
            } else if app.focus == Focus::Body {
                app.move_body_cursor(CursorMove::Down, false);
            }
        }
        MouseEventKind::ScrollUp => {
            if in_list {
                app.previous_list_item();
            } else if app.focus == Focus::Body {
                app.move_body_cursor(CursorMove::Up, false);
            }
        }
        _ => {}
    }
}

fn handle_paste_event(app: &mut App, text: String) {
    match app.focus {
        Focus::Body => app.edit_body(|surface| {
            surface.insert_text(&text);
            true
        }),
        Focus::Title => {
            for c in text.chars().filter(|c| !c.is_control()) {
                app.title_insert_char(c);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::Clipboard;
    use crate::config::{Config, Theme};
    use crate::storage::MemoryStorage;
    use crate::store::NoteStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        let store = NoteStore::initialize(Box::new(MemoryStorage::new()));
        App::new(Config::default(), Theme::default(), store, Clipboard::internal())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        handle_key_event(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn click(app: &mut App, x: u16, y: u16) {
        handle_mouse_event(
            app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: x,
                row: y,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui::render(f, app)).unwrap();
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = self::app();
        app.set_focus(Focus::Body);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        ctrl(&mut app, 'q');
        assert!(app.should_quit);
    }

    #[test]
    fn test_new_note_then_type_title() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.focus, Focus::Title);
        press(&mut app, KeyCode::Char('!'));
        assert_eq!(app.active_note().unwrap().title, "Untitled!");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Body);
    }

    #[test]
    fn test_body_typing_and_bold() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Body);
        handle_key_event(&mut app, KeyEvent::new(KeyCode::End, KeyModifiers::CONTROL));
        press(&mut app, KeyCode::Char('!'));
        assert_eq!(app.active_note().unwrap().body, "Type your text here!!");

        ctrl(&mut app, 'a');
        ctrl(&mut app, 'b');
        assert_eq!(app.active_note().unwrap().body, "<b>Type your text here!!</b>");
        ctrl(&mut app, 'z');
        assert_eq!(app.active_note().unwrap().body, "Type your text here!!");
    }

    #[test]
    fn test_delete_from_list() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        assert!(app.store.is_empty());
        // nothing left to delete
        press(&mut app, KeyCode::Char('d'));
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_help_dialog_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.dialog, DialogState::Help);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.len(), 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.dialog, DialogState::None);
    }

    #[test]
    fn test_font_keys() {
        let mut app = app();
        app.set_focus(Focus::FontFamily);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.active_note().unwrap().font_family.name(), "Times New Roman");
        app.set_focus(Focus::FontSize);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.active_note().unwrap().font_size, 17);
    }

    #[test]
    fn test_click_add_and_format_buttons() {
        let mut app = app();
        draw(&mut app);

        let (start, _) = app.list_layout.add_button.unwrap();
        let header_y = app.list_layout.area.y;
        click(&mut app, start + 1, header_y);
        assert_eq!(app.store.len(), 2);

        draw(&mut app);
        let (rect, _) = app
            .editor_hits
            .iter()
            .find(|(_, hit)| *hit == crate::app::EditorHit::Format(FormatCommand::Bold))
            .copied()
            .unwrap();
        app.editor.surface_mut().select_all();
        click(&mut app, rect.x, rect.y);
        assert_eq!(app.active_note().unwrap().body, "<b></b>");
        assert_eq!(app.focus, Focus::Body);
    }

    #[test]
    fn test_paste_event_into_body() {
        let mut app = app();
        app.set_focus(Focus::Body);
        app.editor.surface_mut().select_all();
        handle_paste_event(&mut app, "pasted".to_string());
        assert_eq!(app.active_note().unwrap().body, "pasted");
    }
}
