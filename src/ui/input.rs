//! A one-line text input buffer with a character cursor.
//!
//! Shared by the date-range inputs, the table search, the stats search and
//! the typeahead query.

#[derive(Debug, Default, Clone)]
pub struct InputState {
    value: String,
    /// Cursor position in characters (not bytes).
    cursor: usize,
}

impl InputState {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index();
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        let len = self.value.chars().count();
        if self.cursor < len {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Replace the whole value, cursor at the end (picker selections).
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_track_the_cursor() {
        let mut input = InputState::default();
        for ch in "12.08".chars() {
            input.insert(ch);
        }
        assert_eq!(input.value(), "12.08");
        input.backspace();
        assert_eq!(input.value(), "12.0");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn editing_in_the_middle_is_char_based() {
        let mut input = InputState::default();
        input.set("Müller");
        input.home();
        input.right();
        input.delete(); // removes 'ü'
        assert_eq!(input.value(), "Mller");
        input.insert('a');
        assert_eq!(input.value(), "Maller");
    }

    #[test]
    fn set_places_the_cursor_at_the_end() {
        let mut input = InputState::default();
        input.set("01.06.2024");
        assert_eq!(input.cursor(), 10);
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }
}
