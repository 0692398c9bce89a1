use anyhow::{Context, Result};

use crate::store::{fetch_or_seed, Note, NoteStore};

/// Placeholder body for notes created from the UI.
const NEW_NOTE_CONTENT: &str = " ";

pub struct ActionDispatcher<'a> {
    store: &'a dyn NoteStore,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(store: &'a dyn NoteStore) -> Self {
        Self { store }
    }

    pub fn reload(&self, placeholder: &str, seed_attempts: u32) -> Result<Vec<Note>> {
        fetch_or_seed(self.store, placeholder, seed_attempts).context("listing notes")
    }

    pub fn create_placeholder(&self, title: &str) -> Result<()> {
        self.store
            .create(title, NEW_NOTE_CONTENT)
            .context("creating note")
    }

    pub fn delete(&self, note: &Note) -> Result<()> {
        self.store
            .delete(&note.id)
            .with_context(|| format!("deleting note {}", note.id))
    }

    pub fn persist(&self, note: &Note) -> Result<()> {
        self.store
            .update(note)
            .with_context(|| format!("saving note {}", note.id))
    }
}
