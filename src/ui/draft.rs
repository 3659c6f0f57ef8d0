//! Cursor-aware editing of the single-line draft.
//!
//! The text itself lives in the conversation; this only tracks where the
//! cursor is. The cursor is a byte offset that always sits on a grapheme
//! boundary.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DraftCursor {
    offset: usize,
}

impl DraftCursor {
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Pulls the cursor back inside `text` after it changed underneath us.
    pub fn clamp(&mut self, text: &str) {
        if self.offset > text.len() || !text.is_char_boundary(self.offset) {
            self.offset = text.len();
        }
    }

    pub fn insert_char(&mut self, text: &mut String, c: char) {
        self.clamp(text);
        text.insert(self.offset, c);
        self.offset += c.len_utf8();
    }

    pub fn insert_str(&mut self, text: &mut String, s: &str) {
        self.clamp(text);
        text.insert_str(self.offset, s);
        self.offset += s.len();
    }

    pub fn backspace(&mut self, text: &mut String) {
        self.clamp(text);
        if let Some(start) = previous_boundary(text, self.offset) {
            text.replace_range(start..self.offset, "");
            self.offset = start;
        }
    }

    pub fn delete(&mut self, text: &mut String) {
        self.clamp(text);
        if let Some(end) = next_boundary(text, self.offset) {
            text.replace_range(self.offset..end, "");
        }
    }

    pub fn move_left(&mut self, text: &str) {
        self.clamp(text);
        if let Some(start) = previous_boundary(text, self.offset) {
            self.offset = start;
        }
    }

    pub fn move_right(&mut self, text: &str) {
        self.clamp(text);
        if let Some(end) = next_boundary(text, self.offset) {
            self.offset = end;
        }
    }

    pub fn move_home(&mut self) {
        self.offset = 0;
    }

    pub fn move_end(&mut self, text: &str) {
        self.offset = text.len();
    }

    /// Drops everything before the cursor (Ctrl+U).
    pub fn clear_to_start(&mut self, text: &mut String) {
        self.clamp(text);
        text.replace_range(..self.offset, "");
        self.offset = 0;
    }
}

fn previous_boundary(text: &str, offset: usize) -> Option<usize> {
    text[..offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(index, _)| index)
}

fn next_boundary(text: &str, offset: usize) -> Option<usize> {
    text[offset..]
        .graphemes(true)
        .next()
        .map(|grapheme| offset + grapheme.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_by_grapheme() {
        let mut text = String::new();
        let mut cursor = DraftCursor::default();

        cursor.insert_str(&mut text, "cafe\u{301}");
        cursor.insert_char(&mut text, '!');
        assert_eq!(text, "cafe\u{301}!");

        cursor.backspace(&mut text);
        cursor.backspace(&mut text);
        assert_eq!(text, "caf");
        assert_eq!(cursor.offset(), 3);
    }

    #[test]
    fn cursor_moves_and_edits_in_the_middle() {
        let mut text = "Hllo".to_string();
        let mut cursor = DraftCursor::default();
        cursor.move_end(&text);
        cursor.move_left(&text);
        cursor.move_left(&text);
        cursor.move_left(&text);

        cursor.insert_char(&mut text, 'e');
        assert_eq!(text, "Hello");

        cursor.move_home();
        cursor.delete(&mut text);
        assert_eq!(text, "ello");
        cursor.move_left(&text);
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn clamp_recovers_after_draft_is_cleared() {
        let mut text = "question".to_string();
        let mut cursor = DraftCursor::default();
        cursor.move_end(&text);

        text.clear();
        cursor.insert_char(&mut text, 'x');
        assert_eq!(text, "x");
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn clear_to_start_keeps_tail() {
        let mut text = "hello world".to_string();
        let mut cursor = DraftCursor::default();
        cursor.move_end(&text);
        for _ in 0..5 {
            cursor.move_left(&text);
        }

        cursor.clear_to_start(&mut text);
        assert_eq!(text, "world");
        assert_eq!(cursor.offset(), 0);
    }
}
