//! Text field buffer edited by the typeahead's key handling.

use unicode_width::UnicodeWidthChar;

/// A single-line buffer with a cursor, stored as chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBuffer {
    value: Vec<char>,
    pos: usize,
}

impl FieldBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The text as a `String`.
    pub fn text(&self) -> String {
        self.value.iter().collect()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Cursor position as a char index.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Replaces the whole text and puts the cursor at the end.
    pub fn set_text(&mut self, s: &str) {
        self.value = s.chars().collect();
        self.pos = self.value.len();
    }

    /// Empties the field.
    pub fn clear(&mut self) {
        self.value.clear();
        self.pos = 0;
    }

    /// Trims surrounding whitespace, keeping the cursor inside the text.
    pub fn trim(&mut self) {
        let text = self.text();
        let trimmed = text.trim();
        if trimmed.len() != text.len() {
            self.set_text(trimmed);
        }
    }

    /// Inserts text at the cursor. Control characters are dropped.
    pub fn insert_str(&mut self, s: &str) {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_control()).collect();
        let n = chars.len();
        self.value.splice(self.pos..self.pos, chars);
        self.pos += n;
    }

    /// Inserts one char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        self.value.insert(self.pos, c);
        self.pos += 1;
    }

    /// Deletes the char before the cursor.
    pub fn delete_backward(&mut self) {
        if self.pos > 0 {
            self.pos -= 1;
            self.value.remove(self.pos);
        }
    }

    /// Deletes the char under the cursor.
    pub fn delete_forward(&mut self) {
        if self.pos < self.value.len() {
            self.value.remove(self.pos);
        }
    }

    /// Moves one char left.
    pub fn move_left(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Moves one char right.
    pub fn move_right(&mut self) {
        self.pos = (self.pos + 1).min(self.value.len());
    }

    /// Moves to the start.
    pub fn move_home(&mut self) {
        self.pos = 0;
    }

    /// Moves to the end.
    pub fn move_end(&mut self) {
        self.pos = self.value.len();
    }

    /// Splits the text at the cursor: before, the char under it, after.
    pub(crate) fn split_at_cursor(&self) -> (String, Option<char>, String) {
        let before = self.value[..self.pos].iter().collect();
        let under = self.value.get(self.pos).copied();
        let after = self
            .value
            .get(self.pos + 1..)
            .map(|rest| rest.iter().collect())
            .unwrap_or_default();
        (before, under, after)
    }

    /// Display width in terminal cells.
    pub fn width(&self) -> usize {
        self.value.iter().map(|c| c.width().unwrap_or(0)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut f = FieldBuffer::new();
        f.insert_str("kiw");
        f.insert_char('i');
        assert_eq!(f.text(), "kiwi");
        f.delete_backward();
        assert_eq!(f.text(), "kiw");
        f.move_home();
        f.delete_forward();
        assert_eq!(f.text(), "iw");
        assert_eq!(f.position(), 0);
    }

    #[test]
    fn test_delete_backward_at_start_is_noop() {
        let mut f = FieldBuffer::new();
        f.delete_backward();
        assert!(f.is_empty());
        f.set_text("a");
        f.move_home();
        f.delete_backward();
        assert_eq!(f.text(), "a");
    }

    #[test]
    fn test_insert_mid_text() {
        let mut f = FieldBuffer::new();
        f.set_text("ac");
        f.move_left();
        f.insert_char('b');
        assert_eq!(f.text(), "abc");
        assert_eq!(f.position(), 2);
    }

    #[test]
    fn test_control_chars_dropped() {
        let mut f = FieldBuffer::new();
        f.insert_str("a\nb\tc");
        assert_eq!(f.text(), "abc");
    }

    #[test]
    fn test_trim() {
        let mut f = FieldBuffer::new();
        f.set_text("  apple ");
        f.trim();
        assert_eq!(f.text(), "apple");
        assert_eq!(f.position(), 5);
    }

    #[test]
    fn test_split_at_cursor() {
        let mut f = FieldBuffer::new();
        f.set_text("abc");
        f.move_left();
        assert_eq!(f.split_at_cursor(), ("ab".into(), Some('c'), String::new()));
        f.move_end();
        assert_eq!(f.split_at_cursor(), ("abc".into(), None, String::new()));
    }

    #[test]
    fn test_width_counts_wide_chars() {
        let mut f = FieldBuffer::new();
        f.set_text("a日");
        assert_eq!(f.width(), 3);
    }
}
