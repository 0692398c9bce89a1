use std::collections::HashSet;

use anyhow::Result;
use strum::Display;
use time::OffsetDateTime;

use super::actions::ActionDispatcher;
use super::input::Input;
use crate::editor::{CaretDisplay, CaretStyle, Keystroke, TextBuffer};
use crate::store::{Note, NoteId, NoteStore};

/// Which field of which note an edit session writes back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Title(NoteId),
    Content(NoteId),
}

impl EditTarget {
    pub fn note_id(&self) -> &str {
        match self {
            EditTarget::Title(id) | EditTarget::Content(id) => id,
        }
    }

    fn caret_style(&self) -> CaretStyle {
        match self {
            EditTarget::Title(_) => CaretStyle::InsertionBar,
            EditTarget::Content(_) => CaretStyle::Highlight,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    target: EditTarget,
    buffer: TextBuffer,
}

impl EditSession {
    fn for_title(note: &Note) -> Self {
        Self {
            target: EditTarget::Title(note.id.clone()),
            buffer: TextBuffer::seeded(&note.title, note.title.chars().count() + 1),
        }
    }

    fn for_content(note: &Note) -> Self {
        Self {
            target: EditTarget::Content(note.id.clone()),
            buffer: TextBuffer::seeded(&note.content, note.content.chars().count()),
        }
    }

    pub fn target(&self) -> &EditTarget {
        &self.target
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn display(&self) -> CaretDisplay {
        self.buffer.display(self.target.caret_style())
    }
}

#[derive(Debug, Clone)]
pub enum Mode {
    Browse,
    Edit(EditSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ModeKind {
    #[strum(to_string = "BROWSE")]
    Browse,
    #[strum(to_string = "EDIT BODY")]
    EditBody,
    #[strum(to_string = "EDIT TITLE")]
    EditTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub notes: Vec<Note>,
    pub selected: usize,
    mode: Mode,
    default_title: String,
    seed_attempts: u32,
    status_message: Option<String>,
    last_synced: Option<OffsetDateTime>,
}

impl AppState {
    pub fn load(store: &dyn NoteStore, default_title: &str, seed_attempts: u32) -> Result<Self> {
        let notes = ActionDispatcher::new(store).reload(default_title, seed_attempts)?;
        let mut state = Self::from_notes(notes, default_title, seed_attempts);
        state.last_synced = Some(OffsetDateTime::now_utc());
        Ok(state)
    }

    pub fn from_notes(notes: Vec<Note>, default_title: &str, seed_attempts: u32) -> Self {
        Self {
            notes,
            selected: 0,
            mode: Mode::Browse,
            default_title: default_title.to_string(),
            seed_attempts,
            status_message: None,
            last_synced: None,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn selected(&self) -> Option<&Note> {
        self.notes.get(self.selected)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        match &self.mode {
            Mode::Browse => ModeKind::Browse,
            Mode::Edit(session) => match session.target {
                EditTarget::Title(_) => ModeKind::EditTitle,
                EditTarget::Content(_) => ModeKind::EditBody,
            },
        }
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        match &self.mode {
            Mode::Edit(session) => Some(session),
            Mode::Browse => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Edit(_))
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message<S: Into<String>>(&mut self, message: Option<S>) {
        self.status_message = message.map(Into::into);
    }

    pub fn last_synced(&self) -> Option<OffsetDateTime> {
        self.last_synced
    }

    /// Title as it should appear in the list, with the insertion bar while
    /// that title is being edited.
    pub fn list_title(&self, index: usize) -> Option<String> {
        let note = self.notes.get(index)?;
        match self.edit_session() {
            Some(session)
                if index == self.selected
                    && matches!(&session.target, EditTarget::Title(id) if *id == note.id) =>
            {
                Some(session.display().to_string())
            }
            _ => Some(note.title.clone()),
        }
    }

    pub fn handle_input(&mut self, input: Input, store: &dyn NoteStore) -> Result<Flow> {
        match &self.mode {
            Mode::Browse => self.handle_browse_input(input, store),
            Mode::Edit(session) => {
                let editing_title = matches!(session.target, EditTarget::Title(_));
                self.handle_edit_input(input, editing_title, store)
            }
        }
    }

    fn handle_browse_input(&mut self, input: Input, store: &dyn NoteStore) -> Result<Flow> {
        match input {
            Input::Quit | Input::Char('q') => return Ok(Flow::Quit),
            Input::Up | Input::Char('k') => self.move_selection(-1),
            Input::Down | Input::Char('j') => self.move_selection(1),
            Input::Enter => self.begin_content_edit(),
            Input::Char('e') => self.begin_title_edit(),
            Input::Char('n') => self.create_note(store)?,
            Input::Char('d') => self.delete_selected(store)?,
            Input::Refresh | Input::Char('r') => self.refresh(store)?,
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn handle_edit_input(
        &mut self,
        input: Input,
        editing_title: bool,
        store: &dyn NoteStore,
    ) -> Result<Flow> {
        let key = match input {
            Input::Quit => {
                self.commit_edit(store, false)?;
                return Ok(Flow::Quit);
            }
            Input::Escape => {
                self.commit_edit(store, false)?;
                return Ok(Flow::Continue);
            }
            Input::Enter if editing_title => {
                self.commit_edit(store, true)?;
                return Ok(Flow::Continue);
            }
            Input::Enter => Keystroke::Insert('\n'),
            Input::Char(ch) => Keystroke::Insert(ch),
            Input::Left => Keystroke::MoveLeft,
            Input::Right => Keystroke::MoveRight,
            Input::Backspace => Keystroke::DeleteBefore,
            Input::Delete => Keystroke::DeleteAfter,
            Input::Up | Input::Down | Input::Refresh => Keystroke::Refresh,
        };
        self.apply_keystroke(key);
        Ok(Flow::Continue)
    }

    pub fn apply_keystroke(&mut self, key: Keystroke) {
        if let Mode::Edit(session) = &mut self.mode {
            session.buffer.apply(key);
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.notes.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.notes.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    pub fn begin_content_edit(&mut self) {
        let Some(note) = self.selected() else {
            return;
        };
        self.mode = Mode::Edit(EditSession::for_content(note));
        self.set_status_message(Some("Editing note • Esc to save"));
    }

    pub fn begin_title_edit(&mut self) {
        let Some(note) = self.selected() else {
            return;
        };
        self.mode = Mode::Edit(EditSession::for_title(note));
        self.set_status_message(Some("Renaming • Enter or Esc to save"));
    }

    /// Creates a placeholder note, selects it and starts renaming it.
    pub fn create_note(&mut self, store: &dyn NoteStore) -> Result<()> {
        let known: HashSet<NoteId> = self.notes.iter().map(|note| note.id.clone()).collect();
        let dispatcher = ActionDispatcher::new(store);
        dispatcher.create_placeholder(&self.default_title)?;
        self.replace_notes(dispatcher.reload(&self.default_title, self.seed_attempts)?);
        self.selected = self
            .notes
            .iter()
            .position(|note| !known.contains(&note.id))
            .unwrap_or_else(|| self.notes.len().saturating_sub(1));
        self.begin_title_edit();
        Ok(())
    }

    pub fn delete_selected(&mut self, store: &dyn NoteStore) -> Result<()> {
        let Some(note) = self.selected().cloned() else {
            return Ok(());
        };
        let dispatcher = ActionDispatcher::new(store);
        dispatcher.delete(&note)?;
        self.replace_notes(dispatcher.reload(&self.default_title, self.seed_attempts)?);
        self.normalize_selection();
        self.set_status_message(Some(format!("Deleted '{}'", note.title.trim_end())));
        Ok(())
    }

    /// Re-lists the store, keeping the current note selected when it still exists.
    pub fn refresh(&mut self, store: &dyn NoteStore) -> Result<()> {
        let current = self.selected().map(|note| note.id.clone());
        let notes = ActionDispatcher::new(store).reload(&self.default_title, self.seed_attempts)?;
        self.replace_notes(notes);
        if let Some(idx) = current.and_then(|id| self.notes.iter().position(|note| note.id == id)) {
            self.selected = idx;
        }
        self.normalize_selection();
        self.set_status_message(Some("Notes refreshed"));
        Ok(())
    }

    /// Writes the session buffer into its target field and pushes the note to
    /// the store. `confirmed` titles that are blank fall back to the default.
    pub fn commit_edit(&mut self, store: &dyn NoteStore, confirmed: bool) -> Result<()> {
        let Mode::Edit(session) = std::mem::replace(&mut self.mode, Mode::Browse) else {
            return Ok(());
        };
        let text = session.buffer.text();
        let Some(note) = self
            .notes
            .iter_mut()
            .find(|note| note.id == session.target.note_id())
        else {
            tracing::warn!(id = session.target.note_id(), "edited note vanished before commit");
            self.set_status_message(Some("Edited note no longer exists"));
            return Ok(());
        };
        match session.target {
            EditTarget::Title(_) => {
                note.title = if confirmed && text.trim().is_empty() {
                    self.default_title.clone()
                } else {
                    text
                };
            }
            EditTarget::Content(_) => note.content = text,
        }
        let note = note.clone();
        ActionDispatcher::new(store).persist(&note)?;
        self.last_synced = Some(OffsetDateTime::now_utc());
        self.set_status_message(Some(format!("Saved '{}'", note.title.trim_end())));
        Ok(())
    }

    fn replace_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.last_synced = Some(OffsetDateTime::now_utc());
    }

    fn normalize_selection(&mut self) {
        if self.notes.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.notes.len() {
            self.selected = self.notes.len() - 1;
        }
    }
}
