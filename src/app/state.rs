use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders},
};
use tracing::debug;

use crate::clipboard::Clipboard;
use crate::config::{Config, Theme};
use crate::editor::{CursorMove, EditingSurface, FormatCommand, TextSurface};
use crate::list::{self, ListIntent, ListLayout};
use crate::note::{FontFamily, Note};
use crate::panel::{self, EditorPanel};
use crate::store::NoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Title,
    Body,
    FontFamily,
    FontSize,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::List,
        Focus::Title,
        Focus::Body,
        Focus::FontFamily,
        Focus::FontSize,
    ];

    fn cycle(self, backwards: bool) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ORDER.len();
        let next = if backwards { (idx + len - 1) % len } else { (idx + 1) % len };
        Self::ORDER[next]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    None,
    Help,
}

/// Clickable regions of the editor panel, recorded during render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorHit {
    FontPrevious,
    FontNext,
    FontSize,
    Title,
    Body,
    Format(FormatCommand),
}

pub struct App {
    pub store: NoteStore,
    pub editor: EditorPanel<TextSurface>,
    pub clipboard: Clipboard,
    pub config: Config,
    pub theme: Theme,
    pub focus: Focus,
    pub dialog: DialogState,
    pub list_cursor: usize,
    pub list_scroll: usize,
    pub list_layout: ListLayout,
    pub title_cursor: usize,
    pub size_input: String,
    pub editor_hits: Vec<(Rect, EditorHit)>,
    pub body_area: Rect,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, theme: Theme, store: NoteStore, clipboard: Clipboard) -> Self {
        let mut surface = TextSurface::new();
        surface.set_text_style(Style::default().fg(theme.editor.text));
        surface.set_tag_style(Style::default().fg(theme.editor.tag));
        surface.set_selection_style(Style::default().bg(theme.selection));

        let mut app = Self {
            store,
            editor: EditorPanel::new(surface),
            clipboard,
            config,
            theme,
            focus: Focus::List,
            dialog: DialogState::None,
            list_cursor: 0,
            list_scroll: 0,
            list_layout: ListLayout::default(),
            title_cursor: 0,
            size_input: String::new(),
            editor_hits: Vec::new(),
            body_area: Rect::default(),
            should_quit: false,
        };
        app.sync_editor();
        app.follow_active();
        app
    }

    pub fn active_note(&self) -> Option<Note> {
        self.store.get_active()
    }

    /// Ids in display order.
    pub fn sorted_ids(&self) -> Vec<String> {
        list::sorted_by_recency(self.store.notes())
            .into_iter()
            .map(|n| n.id.clone())
            .collect()
    }

    /// Rebind the editor after the active note may have changed.
    fn sync_editor(&mut self) {
        let active = self.store.get_active();
        if self.editor.sync(active.as_ref()) {
            debug!(note = ?self.editor.bound_id(), "editor rebound");
            if let Some(note) = &active {
                self.title_cursor = note.title.chars().count();
                self.size_input = note.font_size.to_string();
            } else {
                self.size_input.clear();
                self.title_cursor = 0;
            }
        }
        self.update_surface_block();
        if active.is_none() && self.focus != Focus::List {
            self.set_focus(Focus::List);
        }
    }

    /// Keep the list cursor on the active note.
    fn follow_active(&mut self) {
        let Some(active) = self.store.active_id().map(str::to_string) else {
            let len = self.store.len();
            self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
            return;
        };
        if let Some(idx) = self.sorted_ids().iter().position(|id| *id == active) {
            self.list_cursor = idx;
        }
    }

    pub fn update_surface_block(&mut self) {
        let style = self.editor.surface().style();
        let focused = self.editor.surface().is_focused();
        let border = if focused { self.theme.border_focused } else { self.theme.border };
        let title = if focused {
            format!(" {} · {}px | ^B ^I ^U  ^Z ^Y ", style.font_family, style.font_size)
        } else {
            format!(" {} · {}px ", style.font_family, style.font_size)
        };
        self.editor.surface_mut().set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title),
        );
    }

    pub fn set_focus(&mut self, focus: Focus) {
        let focus = if self.store.get_active().is_none() { Focus::List } else { focus };
        self.focus = focus;
        if focus == Focus::Body {
            self.editor.surface_mut().focus();
        } else {
            self.editor.surface_mut().blur();
        }
        if focus == Focus::FontSize {
            if let Some(note) = self.store.get_active() {
                self.size_input = note.font_size.to_string();
            }
        }
        self.update_surface_block();
    }

    pub fn toggle_focus(&mut self, backwards: bool) {
        let next = self.focus.cycle(backwards);
        self.set_focus(next);
    }

    // ------------------------------------------------------------------
    // List intents
    // ------------------------------------------------------------------

    pub fn dispatch(&mut self, intent: ListIntent) {
        debug!(?intent, "list intent");
        match intent {
            ListIntent::Select(id) => self.select_note(id),
            ListIntent::Delete(id) => self.delete_note(&id),
            ListIntent::Add => self.add_note(),
        }
    }

    pub fn add_note(&mut self) {
        self.store.add_note();
        self.sync_editor();
        self.follow_active();
        self.set_focus(Focus::Title);
    }

    pub fn select_note(&mut self, id: String) {
        self.store.set_active(Some(id));
        self.sync_editor();
        self.follow_active();
    }

    pub fn delete_note(&mut self, id: &str) {
        self.store.delete_note(id);
        self.sync_editor();
        self.follow_active();
    }

    pub fn next_list_item(&mut self) {
        let len = self.store.len();
        if len > 0 && self.list_cursor + 1 < len {
            self.list_cursor += 1;
        }
    }

    pub fn previous_list_item(&mut self) {
        self.list_cursor = self.list_cursor.saturating_sub(1);
    }

    pub fn goto_first_list_item(&mut self) {
        self.list_cursor = 0;
    }

    pub fn goto_last_list_item(&mut self) {
        self.list_cursor = self.store.len().saturating_sub(1);
    }

    pub fn id_under_list_cursor(&self) -> Option<String> {
        self.sorted_ids().get(self.list_cursor).cloned()
    }

    // ------------------------------------------------------------------
    // Editor edits; each one pushes a full note to the store
    // ------------------------------------------------------------------

    fn push_update(&mut self, note: Note) {
        self.store.update_note(note);
        self.follow_active();
    }

    /// Push the surface's current content after an edit inside it.
    pub fn commit_body_edit(&mut self) {
        if let Some(active) = self.store.get_active() {
            let updated = self.editor.on_input(&active);
            self.push_update(updated);
        }
    }

    pub fn edit_body(&mut self, edit: impl FnOnce(&mut TextSurface) -> bool) {
        if self.store.get_active().is_none() {
            return;
        }
        if edit(self.editor.surface_mut()) {
            self.commit_body_edit();
        }
    }

    pub fn move_body_cursor(&mut self, movement: CursorMove, select: bool) {
        self.editor.surface_mut().move_cursor(movement, select);
    }

    pub fn apply_format(&mut self, command: FormatCommand) {
        if self.store.get_active().is_none() {
            return;
        }
        debug!(command = command.name(), "format command");
        if self.editor.format(command) {
            self.commit_body_edit();
        }
        self.set_focus(Focus::Body);
    }

    pub fn cycle_font_family(&mut self, backwards: bool) {
        if let Some(active) = self.store.get_active() {
            let family = if backwards {
                active.font_family.previous()
            } else {
                active.font_family.next()
            };
            self.set_font_family(family);
        }
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        if let Some(active) = self.store.get_active() {
            let updated = self.editor.set_font_family(&active, family);
            self.push_update(updated);
            self.update_surface_block();
        }
    }

    /// Apply the size field's text. Non-numeric text leaves the note alone.
    fn apply_size_input(&mut self) {
        if let Some(active) = self.store.get_active() {
            if let Some(updated) = self.editor.set_font_size(&active, &self.size_input) {
                self.push_update(updated);
                self.update_surface_block();
            }
        }
    }

    pub fn size_input_char(&mut self, c: char) {
        if c.is_ascii_digit() && self.size_input.len() < 3 {
            self.size_input.push(c);
            self.apply_size_input();
        }
    }

    pub fn size_input_backspace(&mut self) {
        self.size_input.pop();
        self.apply_size_input();
    }

    pub fn step_font_size(&mut self, delta: i32) {
        if let Some(active) = self.store.get_active() {
            self.size_input = panel::step_font_size(active.font_size, delta).to_string();
            self.apply_size_input();
        }
    }

    fn replace_title(&mut self, title: String) {
        if let Some(active) = self.store.get_active() {
            let updated = self.editor.set_title(&active, title);
            self.push_update(updated);
        }
    }

    pub fn title_insert_char(&mut self, c: char) {
        if let Some(active) = self.store.get_active() {
            let mut chars: Vec<char> = active.title.chars().collect();
            let at = self.title_cursor.min(chars.len());
            chars.insert(at, c);
            self.title_cursor = at + 1;
            self.replace_title(chars.into_iter().collect());
        }
    }

    pub fn title_backspace(&mut self) {
        if let Some(active) = self.store.get_active() {
            let mut chars: Vec<char> = active.title.chars().collect();
            let at = self.title_cursor.min(chars.len());
            if at == 0 {
                return;
            }
            chars.remove(at - 1);
            self.title_cursor = at - 1;
            self.replace_title(chars.into_iter().collect());
        }
    }

    pub fn title_delete(&mut self) {
        if let Some(active) = self.store.get_active() {
            let mut chars: Vec<char> = active.title.chars().collect();
            if self.title_cursor >= chars.len() {
                return;
            }
            chars.remove(self.title_cursor);
            self.replace_title(chars.into_iter().collect());
        }
    }

    pub fn move_title_cursor(&mut self, movement: CursorMove) {
        let len = self
            .store
            .get_active()
            .map(|n| n.title.chars().count())
            .unwrap_or(0);
        self.title_cursor = match movement {
            CursorMove::Back => self.title_cursor.saturating_sub(1),
            CursorMove::Forward => (self.title_cursor + 1).min(len),
            CursorMove::Head | CursorMove::Top => 0,
            _ => len,
        };
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    pub fn copy_selection(&mut self) {
        if let Some(text) = self.editor.surface().selected_text() {
            self.clipboard.set_text(text);
        }
    }

    pub fn cut_selection(&mut self) {
        if let Some(text) = self.editor.surface().selected_text() {
            self.clipboard.set_text(text);
            self.edit_body(|surface| surface.delete_selection());
        }
    }

    pub fn paste(&mut self) {
        let Some(text) = self.clipboard.get_text() else {
            return;
        };
        match self.focus {
            Focus::Body => self.edit_body(|surface| {
                surface.insert_text(&text);
                true
            }),
            Focus::Title => {
                for c in text.chars().filter(|c| !c.is_control()) {
                    self.title_insert_char(c);
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Mouse
    // ------------------------------------------------------------------

    pub fn editor_hit_at(&self, x: u16, y: u16) -> Option<EditorHit> {
        self.editor_hits
            .iter()
            .find(|(rect, _)| x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height)
            .map(|(_, hit)| *hit)
    }

    pub fn handle_editor_click(&mut self, hit: EditorHit, x: u16, y: u16) {
        match hit {
            EditorHit::FontPrevious => {
                self.set_focus(Focus::FontFamily);
                self.cycle_font_family(true);
            }
            EditorHit::FontNext => {
                self.set_focus(Focus::FontFamily);
                self.cycle_font_family(false);
            }
            EditorHit::FontSize => self.set_focus(Focus::FontSize),
            EditorHit::Title => {
                self.set_focus(Focus::Title);
                self.move_title_cursor(CursorMove::End);
            }
            EditorHit::Body => {
                self.set_focus(Focus::Body);
                let area = self.body_area;
                self.editor.surface_mut().set_cursor_from_screen(area, x, y);
            }
            EditorHit::Format(command) => self.apply_format(command),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_persistent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::WELCOME_TITLE;
    use crate::storage::MemoryStorage;

    fn app() -> App {
        let store = NoteStore::initialize(Box::new(MemoryStorage::new()));
        App::new(Config::default(), Theme::default(), store, Clipboard::internal())
    }

    #[test]
    fn test_startup_binds_welcome_note() {
        let app = app();
        assert_eq!(app.editor.bound_id(), app.store.active_id());
        assert_eq!(app.active_note().unwrap().title, WELCOME_TITLE);
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn test_add_focuses_title_of_new_note() {
        let mut app = app();
        app.dispatch(ListIntent::Add);
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.focus, Focus::Title);
        assert_eq!(app.editor.bound_id(), app.store.active_id());
        assert_eq!(app.list_cursor, 0);
    }

    #[test]
    fn test_delete_intent_does_not_select() {
        let mut app = app();
        let first = app.store.active_id().unwrap().to_string();
        app.dispatch(ListIntent::Add);
        let second = app.store.active_id().unwrap().to_string();
        app.dispatch(ListIntent::Delete(first.clone()));
        assert_eq!(app.store.active_id(), Some(second.as_str()));
        assert!(app.store.get(&first).is_none());
    }

    #[test]
    fn test_delete_only_note_leaves_placeholder() {
        let mut app = app();
        let id = app.store.active_id().unwrap().to_string();
        app.set_focus(Focus::Body);
        app.dispatch(ListIntent::Delete(id));
        assert!(app.active_note().is_none());
        assert!(app.editor.bound_id().is_none());
        assert_eq!(app.focus, Focus::List);
        // edits without an active note do nothing
        app.title_insert_char('x');
        app.apply_format(FormatCommand::Bold);
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_title_typing_updates_store() {
        let mut app = app();
        app.dispatch(ListIntent::Add);
        app.move_title_cursor(CursorMove::End);
        app.title_insert_char('!');
        assert_eq!(app.active_note().unwrap().title, "Untitled!");
        app.title_backspace();
        app.title_backspace();
        assert_eq!(app.active_note().unwrap().title, "Untitle");
    }

    #[test]
    fn test_body_edit_keeps_other_fields() {
        let mut app = app();
        let before = app.active_note().unwrap();
        app.set_focus(Focus::Body);
        app.edit_body(|s| {
            s.move_cursor(CursorMove::End, false);
            s.insert_char('?');
            true
        });
        let after = app.active_note().unwrap();
        assert_eq!(after.body, format!("{}?", before.body));
        assert_eq!(after.title, before.title);
        assert_eq!(after.id, before.id);
    }

    #[test]
    fn test_format_goes_through_surface() {
        let mut app = app();
        app.set_focus(Focus::Body);
        app.editor.surface_mut().select_all();
        app.apply_format(FormatCommand::Bold);
        let body = app.active_note().unwrap().body;
        assert!(body.starts_with("<b>") && body.ends_with("</b>"));
        app.apply_format(FormatCommand::Undo);
        assert!(!app.active_note().unwrap().body.starts_with("<b>"));
        assert_eq!(app.focus, Focus::Body);
    }

    #[test]
    fn test_font_controls() {
        let mut app = app();
        app.cycle_font_family(false);
        assert_eq!(app.active_note().unwrap().font_family, FontFamily::TimesNewRoman);
        app.set_focus(Focus::FontSize);
        app.size_input_backspace();
        app.size_input_backspace();
        app.size_input_char('2');
        app.size_input_char('4');
        assert_eq!(app.active_note().unwrap().font_size, 24);
        app.step_font_size(100);
        assert_eq!(app.active_note().unwrap().font_size, 72);
        assert_eq!(app.editor.surface().style().font_size, 72);
    }

    #[test]
    fn test_list_cursor_follows_selection() {
        let mut app = app();
        let welcome = app.store.active_id().unwrap().to_string();
        app.dispatch(ListIntent::Add);
        app.dispatch(ListIntent::Select(welcome.clone()));
        let idx = app.sorted_ids().iter().position(|id| *id == welcome).unwrap();
        assert_eq!(app.list_cursor, idx);
        assert_eq!(app.id_under_list_cursor(), Some(welcome));
    }

    #[test]
    fn test_cut_and_paste() {
        let mut app = app();
        app.set_focus(Focus::Body);
        app.editor.surface_mut().select_all();
        app.cut_selection();
        assert_eq!(app.active_note().unwrap().body, "");
        app.paste();
        assert_eq!(app.active_note().unwrap().body, crate::note::WELCOME_BODY);
    }

    #[test]
    fn test_focus_cycle() {
        let mut app = app();
        app.toggle_focus(false);
        assert_eq!(app.focus, Focus::Title);
        app.toggle_focus(true);
        app.toggle_focus(true);
        assert_eq!(app.focus, Focus::FontSize);
    }

    #[test]
    fn test_surface_focus_follows_body_focus() {
        let mut app = app();
        assert!(!app.editor.surface().is_focused());
        app.set_focus(Focus::Body);
        assert!(app.editor.surface().is_focused());
        app.set_focus(Focus::Title);
        assert!(!app.editor.surface().is_focused());

        let id = app.store.active_id().unwrap().to_string();
        app.dispatch(ListIntent::Delete(id));
        app.set_focus(Focus::Body);
        assert_eq!(app.focus, Focus::List);
        assert!(!app.editor.surface().is_focused());
    }
}
