//! Binding between the active note and the editing surface.
//!
//! The panel never mutates a note it was handed. Every edit produces a new
//! note value for the caller to pass to `NoteStore::update_note`.

use crate::editor::{EditingSurface, FormatCommand, SurfaceStyle, SurfaceView};
use crate::note::{FontFamily, Note, NoteId, MAX_FONT_SIZE, MIN_FONT_SIZE};

pub const PLACEHOLDER: &str = "Create a new note!";

pub struct EditorPanel<S: EditingSurface> {
    surface: S,
    bound: Option<NoteId>,
}

impl<S: EditingSurface> EditorPanel<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            bound: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn bound_id(&self) -> Option<&str> {
        self.bound.as_deref()
    }

    /// Follow the active note. The surface is reset only when the note's
    /// identity changes, so edits to the same note keep the cursor in place.
    /// Returns true when a reset happened.
    pub fn sync(&mut self, active: Option<&Note>) -> bool {
        let id = active.map(|n| n.id.as_str());
        if id == self.bound.as_deref() {
            return false;
        }
        self.bound = id.map(str::to_string);
        if let Some(note) = active {
            self.surface.load(&SurfaceView::from(note));
        }
        true
    }

    /// The note after a content edit: body and font read back from the
    /// surface, timestamp refreshed.
    pub fn on_input(&self, active: &Note) -> Note {
        let style = self.surface.style();
        Note {
            body: self.surface.content(),
            font_family: style.font_family,
            font_size: style.font_size,
            ..active.touched()
        }
    }

    pub fn set_font_family(&mut self, active: &Note, family: FontFamily) -> Note {
        let updated = Note {
            font_family: family,
            ..active.touched()
        };
        self.apply_style(&updated);
        updated
    }

    /// Parse size input as a number and truncate it to an integer. Returns
    /// None when the input is not a number.
    pub fn set_font_size(&mut self, active: &Note, raw: &str) -> Option<Note> {
        let size = parse_font_size(raw)?;
        let updated = Note {
            font_size: size,
            ..active.touched()
        };
        self.apply_style(&updated);
        Some(updated)
    }

    pub fn set_title(&self, active: &Note, title: impl Into<String>) -> Note {
        Note {
            title: title.into(),
            ..active.touched()
        }
    }

    /// Hand a formatting command to the surface and give it focus back.
    /// Returns true when the surface content changed.
    pub fn format(&mut self, command: FormatCommand) -> bool {
        let changed = self.surface.exec_command(command);
        self.surface.focus();
        changed
    }

    fn apply_style(&mut self, note: &Note) {
        self.surface.set_style(SurfaceStyle {
            font_family: note.font_family,
            font_size: note.font_size,
        });
    }
}

/// Number input coerced to an integer font size. Negative input clamps to
/// zero; range checks belong to the size control.
pub fn parse_font_size(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc().max(0.0).min(u32::MAX as f64) as u32)
}

/// Step a font size within the range the size control allows.
pub fn step_font_size(size: u32, delta: i32) -> u32 {
    let stepped = size as i64 + delta as i64;
    stepped.clamp(MIN_FONT_SIZE as i64, MAX_FONT_SIZE as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextSurface;
    use crate::note::DEFAULT_FONT_SIZE;
    use crate::store::NoteStore;
    use crate::storage::MemoryStorage;

    /// Surface that records what the panel asked of it.
    #[derive(Default)]
    struct RecordingSurface {
        loads: Vec<SurfaceView>,
        commands: Vec<FormatCommand>,
        content: String,
        style: SurfaceStyle,
        focused: bool,
    }

    impl EditingSurface for RecordingSurface {
        fn load(&mut self, view: &SurfaceView) {
            self.loads.push(view.clone());
            self.content = view.body.clone();
            self.style = view.style;
        }

        fn content(&self) -> String {
            self.content.clone()
        }

        fn style(&self) -> SurfaceStyle {
            self.style
        }

        fn set_style(&mut self, style: SurfaceStyle) {
            self.style = style;
        }

        fn exec_command(&mut self, command: FormatCommand) -> bool {
            self.commands.push(command);
            true
        }

        fn focus(&mut self) {
            self.focused = true;
        }

        fn is_focused(&self) -> bool {
            self.focused
        }
    }

    fn note(body: &str) -> Note {
        Note {
            body: body.to_string(),
            last_modified: 1,
            ..Note::untitled()
        }
    }

    #[test]
    fn test_sync_resets_only_on_identity_change() {
        let mut panel = EditorPanel::new(RecordingSurface::default());
        let a = note("first");
        assert!(panel.sync(Some(&a)));
        let edited = Note {
            body: "first, edited".to_string(),
            ..a.clone()
        };
        assert!(!panel.sync(Some(&edited)));
        assert_eq!(panel.surface().loads.len(), 1);

        let b = note("second");
        assert!(panel.sync(Some(&b)));
        assert_eq!(panel.surface().loads.len(), 2);
        assert_eq!(panel.surface().loads[1].body, "second");
    }

    #[test]
    fn test_sync_to_none_unbinds() {
        let mut panel = EditorPanel::new(RecordingSurface::default());
        let a = note("x");
        panel.sync(Some(&a));
        assert!(panel.sync(None));
        assert!(panel.bound_id().is_none());
        // coming back to the same note reloads it
        assert!(panel.sync(Some(&a)));
        assert_eq!(panel.surface().loads.len(), 2);
    }

    #[test]
    fn test_view_binding_sets_font() {
        let mut panel = EditorPanel::new(RecordingSurface::default());
        let a = Note {
            font_family: FontFamily::CourierNew,
            font_size: 24,
            ..note("x")
        };
        panel.sync(Some(&a));
        let style = panel.surface().style();
        assert_eq!(style.font_family, FontFamily::CourierNew);
        assert_eq!(style.font_size, 24);
    }

    #[test]
    fn test_on_input_reads_surface() {
        let mut panel = EditorPanel::new(RecordingSurface::default());
        let a = note("old");
        panel.sync(Some(&a));
        panel.surface_mut().content = "new <b>body</b>".to_string();
        panel.surface_mut().style.font_size = 30;
        let updated = panel.on_input(&a);
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.title, a.title);
        assert_eq!(updated.body, "new <b>body</b>");
        assert_eq!(updated.font_size, 30);
        assert!(updated.last_modified > a.last_modified);
    }

    #[test]
    fn test_title_change_keeps_other_fields() {
        let panel = EditorPanel::new(RecordingSurface::default());
        let a = note("body");
        let updated = panel.set_title(&a, "New title");
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.body, a.body);
        assert_eq!(updated.font_family, a.font_family);
        assert_eq!(updated.font_size, a.font_size);
        assert!(updated.last_modified >= a.last_modified);
    }

    #[test]
    fn test_font_changes_apply_to_live_surface() {
        let mut panel = EditorPanel::new(RecordingSurface::default());
        let a = note("x");
        panel.sync(Some(&a));
        let updated = panel.set_font_family(&a, FontFamily::Georgia);
        assert_eq!(updated.font_family, FontFamily::Georgia);
        assert_eq!(panel.surface().style().font_family, FontFamily::Georgia);

        let sized = panel.set_font_size(&updated, "18.9").unwrap();
        assert_eq!(sized.font_size, 18);
        assert_eq!(sized.font_family, FontFamily::Georgia);
        assert_eq!(panel.surface().style().font_size, 18);
    }

    #[test]
    fn test_font_size_rejects_garbage() {
        let mut panel = EditorPanel::new(RecordingSurface::default());
        let a = note("x");
        assert!(panel.set_font_size(&a, "big").is_none());
        assert_eq!(parse_font_size(" 12 "), Some(12));
        assert_eq!(parse_font_size("-4"), Some(0));
    }

    #[test]
    fn test_step_font_size_clamps() {
        assert_eq!(step_font_size(DEFAULT_FONT_SIZE, 1), 17);
        assert_eq!(step_font_size(8, -1), 8);
        assert_eq!(step_font_size(72, 5), 72);
        assert_eq!(step_font_size(200, 0), 72);
    }

    #[test]
    fn test_format_delegates_and_refocuses() {
        let mut panel = EditorPanel::new(RecordingSurface::default());
        for command in FormatCommand::all() {
            panel.format(*command);
        }
        assert_eq!(panel.surface().commands, FormatCommand::all());
        assert!(panel.surface().is_focused());
    }

    #[test]
    fn test_typing_flows_into_store() {
        let mut store = NoteStore::initialize(Box::new(MemoryStorage::new()));
        let mut panel = EditorPanel::new(TextSurface::new());
        let active = store.get_active().unwrap();
        panel.sync(Some(&active));

        panel.surface_mut().set_cursor(0, usize::MAX);
        panel.surface_mut().insert_char('!');
        let updated = panel.on_input(&active);
        assert!(store.update_note(updated));

        let stored = store.get_active().unwrap();
        assert_eq!(stored.body, format!("{}!", active.body));
        // identity unchanged, so no reset
        assert!(!panel.sync(Some(&stored)));
        assert_eq!(panel.surface().cursor(), (0, active.body.chars().count() + 1));
    }

    #[test]
    fn test_deleting_only_note_shows_placeholder_state() {
        let mut store = NoteStore::initialize(Box::new(MemoryStorage::new()));
        let mut panel = EditorPanel::new(TextSurface::new());
        panel.sync(store.get_active().as_ref());
        let id = store.active_id().unwrap().to_string();
        store.delete_note(&id);
        assert!(store.get_active().is_none());
        assert!(panel.sync(store.get_active().as_ref()));
        assert!(panel.bound_id().is_none());
    }
}
