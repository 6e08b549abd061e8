//! The note collection and the active selection.
//!
//! `NoteStore` is the only owner of the notes. Every mutation that changes
//! the collection is written to storage before the call returns. Callers only
//! ever see borrowed slices or owned clones, so a note can only change through
//! [`NoteStore::update_note`].

use tracing::{debug, info, warn};

use crate::note::{Note, NoteId};
use crate::storage::{KeyValueStorage, MemoryStorage};

pub const NOTES_KEY: &str = "notes";

pub struct NoteStore {
    notes: Vec<Note>,
    active: Option<NoteId>,
    storage: Box<dyn KeyValueStorage>,
    persistent: bool,
}

impl NoteStore {
    /// Load the collection from storage, or seed the welcome note when
    /// nothing usable is stored.
    pub fn initialize(storage: Box<dyn KeyValueStorage>) -> Self {
        let mut store = Self {
            notes: Vec::new(),
            active: None,
            storage,
            persistent: true,
        };

        let saved = match store.storage.get(NOTES_KEY) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "storage unavailable, keeping notes in memory only");
                store.storage = Box::new(MemoryStorage::new());
                store.persistent = false;
                None
            }
        };

        if let Some(saved) = saved {
            match serde_json::from_str::<Vec<Note>>(&saved) {
                Ok(notes) => {
                    info!(count = notes.len(), "loaded notes");
                    store.active = notes.first().map(|n| n.id.clone());
                    store.notes = notes;
                    return store;
                }
                Err(e) => {
                    warn!(error = %e, "stored notes are malformed, starting over");
                }
            }
        }

        let first = Note::welcome();
        store.active = Some(first.id.clone());
        store.notes.push(first);
        store.persist();
        store
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// False once storage has failed; the session then runs on a
    /// `MemoryStorage` holding the last collection.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Create an empty note at the front of the collection and select it.
    pub fn add_note(&mut self) -> NoteId {
        let note = Note::untitled();
        let id = note.id.clone();
        debug!(id = %id, "adding note");
        self.notes.insert(0, note);
        self.active = Some(id.clone());
        self.persist();
        id
    }

    /// Replace the active note with `note`, field for field.
    ///
    /// Returns false when the active id matches nothing, in which case the
    /// collection is left alone.
    pub fn update_note(&mut self, note: Note) -> bool {
        let Some(active) = self.active.as_deref() else {
            debug!("update ignored, no active note");
            return false;
        };
        let Some(slot) = self.notes.iter_mut().find(|n| n.id == active) else {
            debug!(id = %active, "update ignored, active note no longer exists");
            return false;
        };
        // The active id is authoritative; a payload can never re-key a note.
        let id = slot.id.clone();
        *slot = Note { id, ..note };
        self.persist();
        true
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            debug!(id = %id, "delete ignored, no such note");
            return false;
        }
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        debug!(id = %id, "deleted note");
        self.persist();
        true
    }

    /// Select a note by id. The id is not checked; an unknown id reads back as
    /// no active note.
    pub fn set_active(&mut self, id: Option<NoteId>) {
        self.active = id;
    }

    pub fn get_active(&self) -> Option<Note> {
        let active = self.active.as_deref()?;
        self.notes.iter().find(|n| n.id == active).cloned()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<Note> {
        self.notes.iter().find(|n| n.id == id).cloned()
    }

    fn persist(&mut self) {
        let encoded = match serde_json::to_string(&self.notes) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode notes");
                return;
            }
        };
        if let Err(e) = self.storage.set(NOTES_KEY, &encoded) {
            warn!(error = %e, "failed to save notes, keeping them in memory only");
            self.storage = Box::new(MemoryStorage::with_value(NOTES_KEY, &encoded));
            self.persistent = false;
        }
    }
}
