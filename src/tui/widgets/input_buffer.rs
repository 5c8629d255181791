//! Single-line question input buffer with cursor management.

/// A text input buffer with a byte-offset cursor kept on char boundaries.
///
/// Submission goes through [`InputBuffer::take_trimmed`], which enforces the
/// capture contract: blank input is rejected with the buffer left untouched,
/// accepted input clears the buffer before the caller dispatches anything.
#[derive(Default)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte offset of the char boundary left of the cursor.
    fn boundary_before(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    /// Byte offset of the char boundary right of the cursor.
    fn boundary_after(&self) -> usize {
        self.content[self.cursor..]
            .chars()
            .next()
            .map_or(self.content.len(), |c| self.cursor + c.len_utf8())
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let start = self.boundary_before();
            self.content.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let end = self.boundary_after();
            self.content.drain(self.cursor..end);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.boundary_before();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.boundary_after();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Capture the trimmed content, clearing the buffer.
    ///
    /// Returns `None` without touching the buffer when the content is empty
    /// or whitespace-only; a rejected submission has no side effects.
    pub fn take_trimmed(&mut self) -> Option<String> {
        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            return None;
        }
        let text = trimmed.to_string();
        self.clear();
        Some(text)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn filled(text: &str) -> InputBuffer {
        let mut buf = InputBuffer::new();
        for c in text.chars() {
            buf.insert_char(c);
        }
        buf
    }

    #[test]
    fn test_insert_advances_cursor() {
        let buf = filled("hi");
        assert_eq!(buf.text(), "hi");
        assert_eq!(buf.cursor_position(), 2);
    }

    #[test]
    fn test_backspace_removes_previous_char() {
        let mut buf = filled("ab");
        buf.backspace();
        assert_eq!(buf.text(), "a");
        assert_eq!(buf.cursor_position(), 1);
    }

    #[test]
    fn test_multibyte_editing_stays_on_boundaries() {
        let mut buf = filled("héllo");
        buf.move_home();
        buf.move_right();
        buf.move_right();
        assert_eq!(buf.cursor_position(), 1 + 'é'.len_utf8());
        buf.backspace();
        assert_eq!(buf.text(), "hllo");
        buf.delete();
        assert_eq!(buf.text(), "hlo");
    }

    #[test]
    fn test_home_end_left_right() {
        let mut buf = filled("abc");
        buf.move_home();
        assert_eq!(buf.cursor_position(), 0);
        buf.move_end();
        assert_eq!(buf.cursor_position(), 3);
        buf.move_left();
        assert_eq!(buf.cursor_position(), 2);
        buf.move_right();
        assert_eq!(buf.cursor_position(), 3);
    }

    #[test]
    fn test_take_trimmed_clears_buffer() {
        let mut buf = filled("  hello  ");
        assert_eq!(buf.take_trimmed().as_deref(), Some("hello"));
        assert!(buf.text().is_empty());
        assert_eq!(buf.cursor_position(), 0);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(" \t \n ")]
    fn test_take_trimmed_rejects_blank(#[case] input: &str) {
        let mut buf = filled(input);
        assert!(buf.take_trimmed().is_none());
        // Rejected submission leaves the buffer untouched
        assert_eq!(buf.text(), input);
    }

    #[test]
    fn test_is_empty_ignores_whitespace() {
        let mut buf = filled(" ");
        assert!(buf.is_empty());
        buf.insert_char('a');
        assert!(!buf.is_empty());
    }
}
