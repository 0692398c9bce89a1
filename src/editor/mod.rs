use std::fmt;

/// Trailing cell kept at the end of every normalized buffer so the caret
/// always has something to sit on.
pub const SENTINEL: char = ' ';
const SPACE_PLACEHOLDER: char = '_';
const INSERTION_BAR: char = '|';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    MoveLeft,
    MoveRight,
    Insert(char),
    DeleteBefore,
    DeleteAfter,
    /// Normalize only; used on edit entry and for keys with no edit meaning.
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretStyle {
    /// The character under the caret is drawn with the caret style.
    Highlight,
    /// A bar is inserted before the caret position.
    InsertionBar,
}

/// Space, newline, ASCII letters, digits and ASCII punctuation.
pub fn is_printable(ch: char) -> bool {
    ch == ' ' || ch == '\n' || ch.is_ascii_graphic()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    chars: Vec<char>,
    caret: usize,
}

impl TextBuffer {
    /// Builds a buffer without normalizing it; `caret` may point past the end.
    pub fn new(text: &str, caret: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            caret,
        }
    }

    pub fn seeded(text: &str, caret: usize) -> Self {
        let mut buffer = Self::new(text, caret);
        buffer.normalize();
        buffer
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn insert_at(&mut self, index: usize, ch: char) -> bool {
        if index > self.chars.len() {
            return false;
        }
        self.chars.insert(index, ch);
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Option<char> {
        if index >= self.chars.len() {
            return None;
        }
        Some(self.chars.remove(index))
    }

    /// Applies one keystroke and re-normalizes. Returns whether the text changed.
    pub fn apply(&mut self, key: Keystroke) -> bool {
        let changed = match key {
            Keystroke::MoveLeft => {
                self.caret = self.caret.saturating_sub(1);
                false
            }
            Keystroke::MoveRight => {
                self.caret = (self.caret + 1).min(self.chars.len());
                false
            }
            Keystroke::Insert(ch) if is_printable(ch) => {
                let at = self.caret.min(self.chars.len());
                let inserted = self.insert_at(at, ch);
                if inserted {
                    self.caret = at + 1;
                }
                inserted
            }
            Keystroke::Insert(_) | Keystroke::Refresh => false,
            Keystroke::DeleteBefore => {
                if self.caret == 0 {
                    false
                } else {
                    let at = self.caret.min(self.chars.len());
                    let removed = at > 0 && self.remove_at(at - 1).is_some();
                    self.caret = at.saturating_sub(1);
                    removed
                }
            }
            Keystroke::DeleteAfter => self.remove_at(self.caret).is_some(),
        };
        self.normalize();
        changed
    }

    /// Appends the sentinel when missing, then clamps the caret onto a cell.
    /// Running it twice is the same as running it once.
    pub fn normalize(&mut self) {
        if self.chars.last() != Some(&SENTINEL) {
            self.chars.push(SENTINEL);
        }
        self.caret = self.caret.min(self.chars.len() - 1);
    }

    pub fn highlighted(&self) -> Option<char> {
        self.chars.get(self.caret).copied()
    }

    pub fn display(&self, style: CaretStyle) -> CaretDisplay {
        let split = self.caret.min(self.chars.len());
        let before: String = self.chars[..split].iter().collect();
        match style {
            CaretStyle::Highlight => {
                let marked = match self.highlighted() {
                    Some(SENTINEL) | None => SPACE_PLACEHOLDER,
                    Some(ch) => ch,
                };
                let after = self
                    .chars
                    .get(split + 1..)
                    .map(|rest| rest.iter().collect())
                    .unwrap_or_default();
                CaretDisplay {
                    before,
                    marked,
                    after,
                    style,
                }
            }
            CaretStyle::InsertionBar => CaretDisplay {
                before,
                marked: INSERTION_BAR,
                after: self.chars[split..].iter().collect(),
                style,
            },
        }
    }
}

/// Text split around the caret cell, ready to be styled by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretDisplay {
    pub before: String,
    pub marked: char,
    pub after: String,
    pub style: CaretStyle,
}

impl fmt::Display for CaretDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.before, self.marked, self.after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_appends_sentinel_and_keeps_caret_on_it() {
        let buffer = TextBuffer::seeded("cat", 3);
        assert_eq!(buffer.text(), "cat ");
        assert_eq!(buffer.caret(), 3);
        assert_eq!(buffer.highlighted(), Some(' '));
        let display = buffer.display(CaretStyle::Highlight);
        assert_eq!(display.marked, '_');
        assert_eq!(display.before, "cat");
        assert_eq!(display.after, "");
    }

    #[test]
    fn normalize_empty_buffer_yields_single_cell() {
        let buffer = TextBuffer::seeded("", 7);
        assert_eq!(buffer.text(), " ");
        assert_eq!(buffer.caret(), 0);
    }

    #[test]
    fn normalize_is_idempotent() {
        for (text, caret) in [("", 0), ("cat", 3), ("hi ", 9), ("a\nb", 1)] {
            let once = TextBuffer::seeded(text, caret);
            let mut twice = once.clone();
            twice.normalize();
            assert_eq!(once, twice, "normalizing {text:?} twice changed it");
        }
    }

    #[test]
    fn insert_places_char_at_caret_and_advances() {
        let base = TextBuffer::seeded("abc", 0);
        for p in 0..base.len() {
            let mut buffer = TextBuffer::seeded("abc", p);
            assert!(buffer.apply(Keystroke::Insert('Z')));
            let mut expected: Vec<char> = "abc ".chars().collect();
            expected.insert(p, 'Z');
            assert_eq!(buffer.text(), expected.iter().collect::<String>());
            assert_eq!(buffer.caret(), p + 1);
        }
    }

    #[test]
    fn insert_at_front_of_short_buffer() {
        let mut buffer = TextBuffer::seeded("hi ", 0);
        buffer.apply(Keystroke::Insert('X'));
        assert_eq!(buffer.text(), "Xhi ");
        assert_eq!(buffer.caret(), 1);
    }

    #[test]
    fn insert_reports_change_and_rejects_out_of_range_index() {
        let mut buffer = TextBuffer::seeded("ab", 2);
        assert!(buffer.apply(Keystroke::Insert('c')));
        assert_eq!(buffer.text(), "abc ");
        assert_eq!(buffer.caret(), 3);

        assert!(!buffer.insert_at(10, 'z'));
        assert_eq!(buffer.text(), "abc ");
        assert!(buffer.insert_at(4, 'z'));
        assert_eq!(buffer.text(), "abc z");
    }

    #[test]
    fn insert_rejects_characters_outside_printable_set() {
        let mut buffer = TextBuffer::seeded("hi", 1);
        assert!(!buffer.apply(Keystroke::Insert('é')));
        assert!(!buffer.apply(Keystroke::Insert('\t')));
        assert_eq!(buffer.text(), "hi ");
        assert_eq!(buffer.caret(), 1);
    }

    #[test]
    fn newline_is_insertable() {
        let mut buffer = TextBuffer::seeded("ab", 1);
        buffer.apply(Keystroke::Insert('\n'));
        assert_eq!(buffer.text(), "a\nb ");
        assert_eq!(buffer.caret(), 2);
    }

    #[test]
    fn delete_before_at_start_is_noop() {
        let mut buffer = TextBuffer::seeded("hi ", 0);
        for _ in 0..3 {
            assert!(!buffer.apply(Keystroke::DeleteBefore));
        }
        assert_eq!(buffer.text(), "hi ");
        assert_eq!(buffer.caret(), 0);
    }

    #[test]
    fn delete_before_removes_previous_char() {
        let mut buffer = TextBuffer::seeded("abc", 2);
        assert!(buffer.apply(Keystroke::DeleteBefore));
        assert_eq!(buffer.text(), "ac ");
        assert_eq!(buffer.caret(), 1);
    }

    #[test]
    fn delete_after_at_end_leaves_text_alone() {
        let mut buffer = TextBuffer::new("cat ", 4);
        assert!(!buffer.apply(Keystroke::DeleteAfter));
        assert_eq!(buffer.text(), "cat ");
        assert_eq!(buffer.caret(), 3);
    }

    #[test]
    fn deleting_sentinel_restores_it() {
        let mut buffer = TextBuffer::seeded("ab", 2);
        assert!(buffer.apply(Keystroke::DeleteAfter));
        assert_eq!(buffer.text(), "ab ");
        assert_eq!(buffer.caret(), 2);
    }

    #[test]
    fn moves_are_clamped_to_cells() {
        let mut buffer = TextBuffer::seeded("ab", 0);
        buffer.apply(Keystroke::MoveLeft);
        assert_eq!(buffer.caret(), 0);
        for _ in 0..5 {
            buffer.apply(Keystroke::MoveRight);
        }
        assert_eq!(buffer.caret(), 2);
        assert_eq!(buffer.text(), "ab ");
    }

    #[test]
    fn every_keystroke_leaves_trailing_sentinel() {
        let script = [
            Keystroke::Insert('x'),
            Keystroke::MoveRight,
            Keystroke::DeleteAfter,
            Keystroke::Insert('!'),
            Keystroke::DeleteBefore,
            Keystroke::DeleteBefore,
            Keystroke::MoveLeft,
            Keystroke::DeleteAfter,
            Keystroke::Refresh,
        ];
        let mut buffer = TextBuffer::seeded("", 0);
        for key in script {
            buffer.apply(key);
            assert_eq!(buffer.text().chars().last(), Some(SENTINEL), "after {key:?}");
            assert!(buffer.caret() < buffer.len());
        }
    }

    #[test]
    fn highlight_display_marks_character_under_caret() {
        let buffer = TextBuffer::seeded("note", 1);
        let display = buffer.display(CaretStyle::Highlight);
        assert_eq!(display.before, "n");
        assert_eq!(display.marked, 'o');
        assert_eq!(display.after, "te ");
        assert_eq!(display.to_string(), "note ");
    }

    #[test]
    fn insertion_bar_display_keeps_every_character() {
        let buffer = TextBuffer::seeded("New Entry ", 11);
        let display = buffer.display(CaretStyle::InsertionBar);
        assert_eq!(display.to_string(), "New Entry| ");

        let buffer = TextBuffer::seeded("a b", 1);
        assert_eq!(buffer.display(CaretStyle::InsertionBar).to_string(), "a| b ");
    }
}
