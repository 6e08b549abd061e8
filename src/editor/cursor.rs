#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Forward,
    Back,
    Up,
    Down,
    WordForward,
    WordBack,
    Head,
    End,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Selection {
    pub anchor: Position,
    pub active: bool,
}

impl Selection {
    pub fn start(&mut self, pos: Position) {
        self.anchor = pos;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Ordered (start, end) of the selection, or None when nothing is selected
    /// or the selection is empty.
    pub fn range(&self, cursor_pos: Position) -> Option<(Position, Position)> {
        if !self.active || self.anchor == cursor_pos {
            return None;
        }
        if self.anchor < cursor_pos {
            Some((self.anchor, cursor_pos))
        } else {
            Some((cursor_pos, self.anchor))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cursor {
    pub position: Position,
    pub selection: Selection,
    pub preferred_col: Option<usize>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pos(&self) -> Position {
        self.position
    }

    pub fn move_to(&mut self, row: usize, col: usize) {
        self.position = Position::new(row, col);
        self.preferred_col = Some(col);
    }

    /// Vertical moves keep the remembered column.
    pub fn move_vertical(&mut self, row: usize, line_len: usize) {
        let col = self.preferred_col.unwrap_or(self.position.col).min(line_len);
        self.position = Position::new(row, col);
    }

    pub fn start_selection(&mut self) {
        if !self.selection.active {
            self.selection.start(self.position);
        }
    }

    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    pub fn select_range(&mut self, start: Position, end: Position) {
        self.selection.start(start);
        self.move_to(end.row, end.col);
    }

    pub fn selection_range(&self) -> Option<(Position, Position)> {
        self.selection.range(self.position)
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn find_word_forward(line: &str, col: usize) -> usize {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    if col >= len {
        return len;
    }

    let mut pos = col;
    while pos < len && is_word_char(chars[pos]) {
        pos += 1;
    }
    while pos < len && !is_word_char(chars[pos]) {
        pos += 1;
    }
    pos
}

pub fn find_word_back(line: &str, col: usize) -> usize {
    let chars: Vec<char> = line.chars().collect();
    if col == 0 {
        return 0;
    }

    let mut pos = col.min(chars.len()).saturating_sub(1);
    while pos > 0 && !is_word_char(chars[pos]) {
        pos -= 1;
    }
    while pos > 0 && is_word_char(chars[pos - 1]) {
        pos -= 1;
    }
    pos
}
