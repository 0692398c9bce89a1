use std::cell::{Cell, RefCell};

use super::{Note, NoteStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Create { title: String, content: String },
    Delete(String),
    Update(Note),
}

/// In-process store that records every call made against it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: RefCell<Vec<Note>>,
    next_id: Cell<u64>,
    calls: RefCell<Vec<StoreCall>>,
    discard_creates: bool,
    fail_updates: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Self::default()
        }
    }

    pub fn with_titles(titles: &[&str]) -> Self {
        let store = Self::new();
        for title in titles {
            store.insert(title, &format!("{title} body"));
        }
        store
    }

    /// A store that accepts creations but never lists them.
    pub fn discarding_creates() -> Self {
        Self {
            discard_creates: true,
            ..Self::new()
        }
    }

    pub fn failing_updates(titles: &[&str]) -> Self {
        let mut store = Self::with_titles(titles);
        store.fail_updates = true;
        store
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes.borrow().clone()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count(&self, predicate: impl Fn(&StoreCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    fn insert(&self, title: &str, content: &str) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.notes.borrow_mut().push(Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            date: "2024-01-01".to_string(),
        });
    }
}

impl NoteStore for MemoryStore {
    fn list(&self) -> Result<Vec<Note>, StoreError> {
        self.calls.borrow_mut().push(StoreCall::List);
        Ok(self.notes())
    }

    fn create(&self, title: &str, content: &str) -> Result<(), StoreError> {
        self.calls.borrow_mut().push(StoreCall::Create {
            title: title.to_string(),
            content: content.to_string(),
        });
        if !self.discard_creates {
            self.insert(title, content);
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.calls
            .borrow_mut()
            .push(StoreCall::Delete(id.to_string()));
        self.notes.borrow_mut().retain(|note| note.id != id);
        Ok(())
    }

    fn update(&self, note: &Note) -> Result<(), StoreError> {
        self.calls.borrow_mut().push(StoreCall::Update(note.clone()));
        if self.fail_updates {
            return Err(StoreError::Status {
                endpoint: "modify_entry.php".into(),
                status: 500,
                body: "database offline".into(),
            });
        }
        if let Some(existing) = self.notes.borrow_mut().iter_mut().find(|n| n.id == note.id) {
            existing.title = note.title.clone();
            existing.content = note.content.clone();
        }
        Ok(())
    }
}
