//! Derived views and click handling for the note list.

use chrono::{Local, TimeZone};
use ratatui::layout::Rect;

use crate::note::{Note, NoteId};

pub const PREVIEW_CHARS: usize = 45;
pub const ROW_HEIGHT: u16 = 3;
/// Width of the delete affordance at the right edge of a row's title line.
pub const DELETE_WIDTH: u16 = 3;
pub const ADD_LABEL: &str = " [+] ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListIntent {
    Select(NoteId),
    Delete(NoteId),
    Add,
}

/// Notes ordered most recently modified first. Ties keep collection order.
/// The collection itself is never reordered.
pub fn sorted_by_recency(notes: &[Note]) -> Vec<&Note> {
    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    sorted
}

/// First characters of the raw body, followed by `...` whenever the body has
/// any content at all, even when nothing was cut.
pub fn preview(body: &str) -> String {
    if body.is_empty() {
        return String::new();
    }
    let mut preview: String = body.chars().take(PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

/// Local date and time as `dd.mm.yyyy, HH:MM`.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%d.%m.%Y, %H:%M").to_string(),
        None => String::new(),
    }
}

/// Screen geometry of the last rendered list, used to turn clicks into intents.
#[derive(Debug, Clone, Default)]
pub struct ListLayout {
    /// Panel area including its border.
    pub area: Rect,
    /// Header columns covered by the add affordance.
    pub add_button: Option<(u16, u16)>,
    /// Ids in display order, starting at the first visible row.
    pub visible_ids: Vec<NoteId>,
}

impl ListLayout {
    fn inner(&self) -> Rect {
        Rect {
            x: self.area.x.saturating_add(1),
            y: self.area.y.saturating_add(1),
            width: self.area.width.saturating_sub(2),
            height: self.area.height.saturating_sub(2),
        }
    }

    /// Resolve a click to at most one intent. A click on a row's delete
    /// affordance yields only `Delete`, never `Select`.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<ListIntent> {
        if y == self.area.y {
            let (start, end) = self.add_button?;
            return (x >= start && x < end).then_some(ListIntent::Add);
        }

        let inner = self.inner();
        if x < inner.x || x >= inner.x + inner.width || y < inner.y || y >= inner.y + inner.height {
            return None;
        }

        let offset = y - inner.y;
        let row = (offset / ROW_HEIGHT) as usize;
        let id = self.visible_ids.get(row)?.clone();

        let on_title_line = offset % ROW_HEIGHT == 0;
        let delete_start = (inner.x + inner.width).saturating_sub(DELETE_WIDTH);
        if on_title_line && x >= delete_start {
            Some(ListIntent::Delete(id))
        } else {
            Some(ListIntent::Select(id))
        }
    }
}
