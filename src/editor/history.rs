use super::cursor::Position;

const MAX_HISTORY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub lines: Vec<String>,
    pub cursor: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Typing,
    Other,
}

/// Snapshot undo/redo stacks. Consecutive typing collapses into one step.
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    last_kind: Option<EditKind>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.last_kind = None;
    }

    /// Record the state before an edit of the given kind.
    pub fn record(&mut self, before: Snapshot, kind: EditKind) {
        self.redo.clear();
        if kind == EditKind::Typing && self.last_kind == Some(EditKind::Typing) {
            return;
        }
        self.undo.push(before);
        if self.undo.len() > MAX_HISTORY {
            self.undo.remove(0);
        }
        self.last_kind = Some(kind);
    }

    /// Break the typing run, e.g. after the cursor moved.
    pub fn seal(&mut self) {
        self.last_kind = None;
    }

    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        self.last_kind = None;
        Some(previous)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        self.last_kind = None;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(text: &str) -> Snapshot {
        Snapshot {
            lines: vec![text.to_string()],
            cursor: Position::default(),
        }
    }

    #[test]
    fn test_typing_run_is_one_step() {
        let mut h = History::new();
        h.record(snap(""), EditKind::Typing);
        h.record(snap("a"), EditKind::Typing);
        h.record(snap("ab"), EditKind::Typing);
        assert_eq!(h.undo(snap("abc")), Some(snap("")));
        assert_eq!(h.undo(snap("")), None);
    }

    #[test]
    fn test_seal_splits_runs() {
        let mut h = History::new();
        h.record(snap(""), EditKind::Typing);
        h.seal();
        h.record(snap("a"), EditKind::Typing);
        assert_eq!(h.undo(snap("ab")), Some(snap("a")));
        assert_eq!(h.undo(snap("a")), Some(snap("")));
    }

    #[test]
    fn test_redo_after_undo_and_cleared_by_edit() {
        let mut h = History::new();
        h.record(snap(""), EditKind::Other);
        let prev = h.undo(snap("x")).unwrap();
        assert_eq!(h.redo(prev.clone()), Some(snap("x")));
        h.undo(snap("x"));
        h.record(snap(""), EditKind::Other);
        assert_eq!(h.redo(snap("y")), None);
    }
}
