mod cursor;
mod history;
mod surface;

pub use cursor::CursorMove;
pub use surface::TextSurface;

use crate::note::{FontFamily, Note};

/// Rich-text commands the editor panel hands to the surface by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Undo,
    Redo,
}

impl FormatCommand {
    pub fn all() -> &'static [FormatCommand] {
        &[
            FormatCommand::Bold,
            FormatCommand::Italic,
            FormatCommand::Underline,
            FormatCommand::Undo,
            FormatCommand::Redo,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::Undo => "undo",
            FormatCommand::Redo => "redo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "B",
            FormatCommand::Italic => "I",
            FormatCommand::Underline => "U",
            FormatCommand::Undo => "↩",
            FormatCommand::Redo => "↪",
        }
    }

    /// Markup tag wrapped around a selection, if the command formats text.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            FormatCommand::Bold => Some("b"),
            FormatCommand::Italic => Some("i"),
            FormatCommand::Underline => Some("u"),
            FormatCommand::Undo | FormatCommand::Redo => None,
        }
    }
}

/// Visual font settings of the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceStyle {
    pub font_family: FontFamily,
    pub font_size: u32,
}

/// Everything the surface shows for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceView {
    pub body: String,
    pub style: SurfaceStyle,
}

impl From<&Note> for SurfaceView {
    fn from(note: &Note) -> Self {
        Self {
            body: note.body.clone(),
            style: SurfaceStyle {
                font_family: note.font_family,
                font_size: note.font_size,
            },
        }
    }
}

/// The editable region that renders a note body.
///
/// Formatting, undo and redo belong to the surface; callers only name the
/// command and read the resulting content back.
pub trait EditingSurface {
    /// Replace content and style wholesale, discarding edit history.
    fn load(&mut self, view: &SurfaceView);
    fn content(&self) -> String;
    fn style(&self) -> SurfaceStyle;
    fn set_style(&mut self, style: SurfaceStyle);
    /// Returns true when the content changed.
    fn exec_command(&mut self, command: FormatCommand) -> bool;
    fn focus(&mut self);
    fn is_focused(&self) -> bool;
}
