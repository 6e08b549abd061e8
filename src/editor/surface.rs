use ratatui::{
    buffer::Buffer as RatatuiBuffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Widget},
};
use unicode_width::UnicodeWidthChar;

use super::cursor::{find_word_back, find_word_forward, Cursor, CursorMove, Position};
use super::history::{EditKind, History, Snapshot};
use super::{EditingSurface, FormatCommand, SurfaceStyle, SurfaceView};
use crate::markup::{self, InlineState};

/// Plain-text editing surface over body markup.
///
/// Source lines are edited directly; `<br>` separates lines in the stored
/// body. Formatting commands wrap the selection in inline tags.
pub struct TextSurface {
    lines: Vec<String>,
    cursor: Cursor,
    history: History,
    style: SurfaceStyle,
    focused: bool,
    scroll_offset: usize,
    h_scroll_offset: usize,
    view_height: usize,
    view_width: usize,
    block: Option<Block<'static>>,
    text_style: Style,
    tag_style: Style,
    selection_style: Style,
}

impl Default for TextSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

impl TextSurface {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::new(),
            history: History::new(),
            style: SurfaceStyle::default(),
            focused: false,
            scroll_offset: 0,
            h_scroll_offset: 0,
            view_height: 0,
            view_width: 0,
            block: None,
            text_style: Style::default(),
            tag_style: Style::default().fg(Color::DarkGray),
            selection_style: Style::default().bg(Color::DarkGray),
        }
    }

    // Styling
    pub fn set_block(&mut self, block: Block<'static>) {
        self.block = Some(block);
    }

    pub fn set_text_style(&mut self, style: Style) {
        self.text_style = style;
    }

    pub fn set_tag_style(&mut self, style: Style) {
        self.tag_style = style;
    }

    pub fn set_selection_style(&mut self, style: Style) {
        self.selection_style = style;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        let pos = self.cursor.pos();
        (pos.row, pos.col)
    }

    pub fn blur(&mut self) {
        self.focused = false;
        self.cursor.cancel_selection();
    }

    pub fn set_view_size(&mut self, width: usize, height: usize) {
        self.view_width = width;
        self.view_height = height;
        self.ensure_cursor_visible();
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| char_len(l)).unwrap_or(0)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            lines: self.lines.clone(),
            cursor: self.cursor.pos(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.lines = snapshot.lines;
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let row = snapshot.cursor.row.min(self.lines.len() - 1);
        let col = snapshot.cursor.col.min(self.line_len(row));
        self.cursor.cancel_selection();
        self.cursor.move_to(row, col);
        self.ensure_cursor_visible();
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        let row = row.min(self.lines.len().saturating_sub(1));
        let col = col.min(self.line_len(row));
        self.cursor.cancel_selection();
        self.cursor.move_to(row, col);
        self.history.seal();
        self.ensure_cursor_visible();
    }

    /// Place the cursor at a screen cell inside `area` (the widget area).
    pub fn set_cursor_from_screen(&mut self, area: Rect, x: u16, y: u16) {
        if let Some(pos) = self.position_at_screen(area, x, y) {
            self.set_cursor(pos.row, pos.col);
        }
    }

    /// Drag the selection from its anchor to a screen cell.
    pub fn extend_selection_to_screen(&mut self, area: Rect, x: u16, y: u16) {
        if let Some(pos) = self.position_at_screen(area, x, y) {
            self.cursor.start_selection();
            self.cursor.move_to(pos.row, pos.col);
            self.history.seal();
            self.ensure_cursor_visible();
        }
    }

    fn position_at_screen(&self, area: Rect, x: u16, y: u16) -> Option<Position> {
        let inner = self.inner_area(area);
        if y < inner.y || x < inner.x {
            return None;
        }
        let row = self.scroll_offset + (y - inner.y) as usize;
        if row >= self.lines.len() {
            let last = self.lines.len() - 1;
            return Some(Position::new(last, self.line_len(last)));
        }
        let target = (x - inner.x) as usize;
        let mut width = 0;
        let mut col = self.h_scroll_offset;
        for c in self.lines[row].chars().skip(self.h_scroll_offset) {
            let w = c.width().unwrap_or(0);
            if width + w > target {
                break;
            }
            width += w;
            col += 1;
        }
        Some(Position::new(row, col.min(self.line_len(row))))
    }

    pub fn move_cursor(&mut self, movement: CursorMove, select: bool) {
        if select {
            self.cursor.start_selection();
        } else {
            self.cursor.cancel_selection();
        }
        self.history.seal();

        let pos = self.cursor.pos();
        let line_count = self.lines.len();
        match movement {
            CursorMove::Forward => {
                if pos.col < self.line_len(pos.row) {
                    self.cursor.move_to(pos.row, pos.col + 1);
                } else if pos.row + 1 < line_count {
                    self.cursor.move_to(pos.row + 1, 0);
                }
            }
            CursorMove::Back => {
                if pos.col > 0 {
                    self.cursor.move_to(pos.row, pos.col - 1);
                } else if pos.row > 0 {
                    let len = self.line_len(pos.row - 1);
                    self.cursor.move_to(pos.row - 1, len);
                }
            }
            CursorMove::Up => {
                if pos.row > 0 {
                    let len = self.line_len(pos.row - 1);
                    self.cursor.move_vertical(pos.row - 1, len);
                }
            }
            CursorMove::Down => {
                if pos.row + 1 < line_count {
                    let len = self.line_len(pos.row + 1);
                    self.cursor.move_vertical(pos.row + 1, len);
                }
            }
            CursorMove::WordForward => {
                let line = &self.lines[pos.row];
                let col = find_word_forward(line, pos.col);
                if col == pos.col && pos.row + 1 < line_count {
                    self.cursor.move_to(pos.row + 1, 0);
                } else {
                    self.cursor.move_to(pos.row, col);
                }
            }
            CursorMove::WordBack => {
                if pos.col == 0 && pos.row > 0 {
                    let len = self.line_len(pos.row - 1);
                    self.cursor.move_to(pos.row - 1, len);
                } else {
                    let col = find_word_back(&self.lines[pos.row], pos.col);
                    self.cursor.move_to(pos.row, col);
                }
            }
            CursorMove::Head => self.cursor.move_to(pos.row, 0),
            CursorMove::End => {
                let len = self.line_len(pos.row);
                self.cursor.move_to(pos.row, len);
            }
            CursorMove::Top => self.cursor.move_to(0, 0),
            CursorMove::Bottom => {
                let last = line_count - 1;
                let len = self.line_len(last);
                self.cursor.move_to(last, len);
            }
        }
        self.ensure_cursor_visible();
    }

    pub fn select_all(&mut self) {
        let last = self.lines.len() - 1;
        let end = Position::new(last, self.line_len(last));
        self.cursor.select_range(Position::default(), end);
        self.ensure_cursor_visible();
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.cursor.selection_range()?;
        Some(self.text_in_range(start, end))
    }

    fn text_in_range(&self, start: Position, end: Position) -> String {
        if start.row == end.row {
            let line = &self.lines[start.row];
            return line[byte_index(line, start.col)..byte_index(line, end.col)].to_string();
        }
        let mut parts = Vec::with_capacity(end.row - start.row + 1);
        let first = &self.lines[start.row];
        parts.push(&first[byte_index(first, start.col)..]);
        for line in &self.lines[start.row + 1..end.row] {
            parts.push(line.as_str());
        }
        let last = &self.lines[end.row];
        parts.push(&last[..byte_index(last, end.col)]);
        parts.join("\n")
    }

    fn remove_range(&mut self, start: Position, end: Position) {
        if start.row == end.row {
            let line = &mut self.lines[start.row];
            let (a, b) = (byte_index(line, start.col), byte_index(line, end.col));
            line.replace_range(a..b, "");
        } else {
            let tail = {
                let last = &self.lines[end.row];
                last[byte_index(last, end.col)..].to_string()
            };
            let first = &mut self.lines[start.row];
            let cut = byte_index(first, start.col);
            first.truncate(cut);
            first.push_str(&tail);
            self.lines.drain(start.row + 1..=end.row);
        }
        self.cursor.move_to(start.row, start.col);
    }

    fn insert_raw(&mut self, text: &str) {
        let pos = self.cursor.pos();
        let line = &self.lines[pos.row];
        let split = byte_index(line, pos.col);
        let head = line[..split].to_string();
        let tail = line[split..].to_string();

        let pieces: Vec<&str> = text.split('\n').map(|p| p.trim_end_matches('\r')).collect();
        if pieces.len() == 1 {
            self.lines[pos.row] = format!("{}{}{}", head, pieces[0], tail);
            self.cursor.move_to(pos.row, pos.col + char_len(pieces[0]));
            return;
        }

        let last_piece = pieces[pieces.len() - 1];
        let mut new_lines = Vec::with_capacity(pieces.len());
        new_lines.push(format!("{}{}", head, pieces[0]));
        for piece in &pieces[1..pieces.len() - 1] {
            new_lines.push(piece.to_string());
        }
        new_lines.push(format!("{}{}", last_piece, tail));
        let new_row = pos.row + pieces.len() - 1;
        self.lines.splice(pos.row..=pos.row, new_lines);
        self.cursor.move_to(new_row, char_len(last_piece));
    }

    /// Remove the selection, returning whether anything was removed.
    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.cursor.selection_range() else {
            return false;
        };
        self.history.record(self.snapshot(), EditKind::Other);
        self.cursor.cancel_selection();
        self.remove_range(start, end);
        self.ensure_cursor_visible();
        true
    }

    pub fn insert_char(&mut self, c: char) {
        let kind = if c.is_whitespace() || self.cursor.selection_range().is_some() {
            EditKind::Other
        } else {
            EditKind::Typing
        };
        self.history.record(self.snapshot(), kind);
        if let Some((start, end)) = self.cursor.selection_range() {
            self.cursor.cancel_selection();
            self.remove_range(start, end);
        }
        let mut buf = [0u8; 4];
        self.insert_raw(c.encode_utf8(&mut buf));
        self.ensure_cursor_visible();
    }

    pub fn insert_newline(&mut self) {
        self.insert_text("\n");
    }

    /// Insert text, replacing the selection. Newlines split lines.
    pub fn insert_text(&mut self, text: &str) {
        self.history.record(self.snapshot(), EditKind::Other);
        if let Some((start, end)) = self.cursor.selection_range() {
            self.cursor.cancel_selection();
            self.remove_range(start, end);
        }
        self.insert_raw(text);
        self.history.seal();
        self.ensure_cursor_visible();
    }

    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let pos = self.cursor.pos();
        if pos.col == 0 && pos.row == 0 {
            return false;
        }
        self.history.record(self.snapshot(), EditKind::Other);
        if pos.col > 0 {
            self.remove_range(Position::new(pos.row, pos.col - 1), pos);
        } else {
            let prev_len = self.line_len(pos.row - 1);
            self.remove_range(Position::new(pos.row - 1, prev_len), pos);
        }
        self.ensure_cursor_visible();
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let pos = self.cursor.pos();
        let len = self.line_len(pos.row);
        if pos.col < len {
            self.history.record(self.snapshot(), EditKind::Other);
            self.remove_range(pos, Position::new(pos.row, pos.col + 1));
        } else if pos.row + 1 < self.lines.len() {
            self.history.record(self.snapshot(), EditKind::Other);
            self.remove_range(pos, Position::new(pos.row + 1, 0));
        } else {
            return false;
        }
        self.ensure_cursor_visible();
        true
    }

    fn wrap_selection(&mut self, tag: &str) -> bool {
        let open = format!("<{}>", tag);
        let close = format!("</{}>", tag);

        let Some((start, end)) = self.cursor.selection_range() else {
            self.history.record(self.snapshot(), EditKind::Other);
            self.insert_raw(&format!("{}{}", open, close));
            let pos = self.cursor.pos();
            self.cursor.move_to(pos.row, pos.col - char_len(&close));
            self.history.seal();
            return true;
        };

        let selected = self.text_in_range(start, end);
        let replacement = match selected
            .strip_prefix(open.as_str())
            .and_then(|s| s.strip_suffix(close.as_str()))
        {
            Some(inner) => inner.to_string(),
            None => format!("{}{}{}", open, selected, close),
        };

        self.history.record(self.snapshot(), EditKind::Other);
        self.cursor.cancel_selection();
        self.remove_range(start, end);
        self.insert_raw(&replacement);
        let end = self.cursor.pos();
        self.cursor.select_range(start, end);
        self.history.seal();
        true
    }

    fn ensure_cursor_visible(&mut self) {
        let pos = self.cursor.pos();
        if self.view_height > 0 {
            if pos.row < self.scroll_offset {
                self.scroll_offset = pos.row;
            } else if pos.row >= self.scroll_offset + self.view_height {
                self.scroll_offset = pos.row + 1 - self.view_height;
            }
        }
        if self.view_width > 0 {
            if pos.col < self.h_scroll_offset {
                self.h_scroll_offset = pos.col;
            } else if pos.col >= self.h_scroll_offset + self.view_width {
                self.h_scroll_offset = pos.col + 1 - self.view_width;
            }
        }
    }

    fn inner_area(&self, area: Rect) -> Rect {
        match &self.block {
            Some(block) => block.inner(area),
            None => area,
        }
    }

    fn is_selected(&self, range: Option<(Position, Position)>, row: usize, col: usize) -> bool {
        match range {
            Some((start, end)) => {
                let here = Position::new(row, col);
                here >= start && here < end
            }
            None => false,
        }
    }
}

impl EditingSurface for TextSurface {
    fn load(&mut self, view: &SurfaceView) {
        self.lines = markup::body_to_lines(&view.body);
        self.style = view.style;
        self.cursor = Cursor::new();
        self.history.clear();
        self.scroll_offset = 0;
        self.h_scroll_offset = 0;
    }

    fn content(&self) -> String {
        markup::lines_to_body(&self.lines)
    }

    fn style(&self) -> SurfaceStyle {
        self.style
    }

    fn set_style(&mut self, style: SurfaceStyle) {
        self.style = style;
    }

    fn exec_command(&mut self, command: FormatCommand) -> bool {
        if let Some(tag) = command.tag() {
            return self.wrap_selection(tag);
        }
        let current = self.snapshot();
        let restored = match command {
            FormatCommand::Undo => self.history.undo(current),
            FormatCommand::Redo => self.history.redo(current),
            _ => None,
        };
        match restored {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

impl Widget for &TextSurface {
    fn render(self, area: Rect, buf: &mut RatatuiBuffer) {
        let inner = match &self.block {
            Some(block) => {
                block.clone().render(area, buf);
                block.inner(area)
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let selection = self.cursor.selection_range();
        let cursor = self.cursor.pos();
        let mut state = InlineState::default();

        for (row, line) in self.lines.iter().enumerate() {
            let classes = markup::classify_line(line, &mut state);
            if row < self.scroll_offset {
                continue;
            }
            let screen_row = (row - self.scroll_offset) as u16;
            if screen_row >= inner.height {
                break;
            }
            let y = inner.y + screen_row;
            let mut x = inner.x;
            let right = inner.x + inner.width;

            for (col, (c, class)) in line.chars().zip(classes.iter()).enumerate() {
                if col < self.h_scroll_offset {
                    continue;
                }
                let w = c.width().unwrap_or(0) as u16;
                if x + w > right {
                    break;
                }
                let mut style = if class.is_tag { self.tag_style } else { self.text_style };
                style = style.add_modifier(class.modifier);
                if self.is_selected(selection, row, col) {
                    style = style.patch(self.selection_style);
                }
                if self.focused && cursor.row == row && cursor.col == col {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                buf.set_string(x, y, c.to_string(), style);
                x += w;
            }

            let line_len = classes.len();
            if self.focused && cursor.row == row && cursor.col == line_len && x < right {
                buf.set_string(x, y, " ", self.text_style.add_modifier(Modifier::REVERSED));
            }
        }
    }
}
