//! Turns the conversation into pre-wrapped terminal lines.
//!
//! Wrapping happens here rather than in ratatui so that the number of lines
//! is known exactly when computing scroll offsets.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::constants::THINKING_LABEL;
use crate::core::conversation::Conversation;
use crate::core::message::{Message, Sender};

/// Bubbles never use more than this share of the width.
const BUBBLE_WIDTH_PERCENT: usize = 80;
const MIN_BUBBLE_WIDTH: usize = 12;

pub fn user_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Cyan)
}

pub fn bot_style() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}

fn label_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD)
}

fn thinking_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::ITALIC)
}

pub fn bubble_width(terminal_width: u16) -> usize {
    let width = terminal_width as usize;
    (width * BUBBLE_WIDTH_PERCENT / 100)
        .max(MIN_BUBBLE_WIDTH)
        .min(width.max(1))
}

/// Builds every line of the transcript for a message area `width` columns
/// wide.
pub fn build_transcript_lines(
    conversation: &Conversation,
    width: u16,
    show_thinking: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in conversation.messages() {
        push_message_lines(&mut lines, message, width, show_thinking);
    }
    lines
}

fn push_message_lines(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    width: u16,
    show_thinking: bool,
) {
    let max_inner = bubble_width(width).saturating_sub(2).max(1);
    let (label, style) = match message.sender {
        Sender::User => ("You", user_style()),
        Sender::Bot => ("Assistant", bot_style()),
    };

    let mut body: Vec<(String, Style)> = Vec::new();
    if message.is_thinking && show_thinking {
        body.push((THINKING_LABEL.to_string(), style.patch(thinking_style())));
    }
    if !message.text.is_empty() || body.is_empty() {
        for row in wrap_text(&message.text, max_inner) {
            body.push((row, style));
        }
    }

    // All rows of a bubble share the width of its widest row.
    let inner = body
        .iter()
        .map(|(row, _)| UnicodeWidthStr::width(row.as_str()))
        .max()
        .unwrap_or(0)
        .min(max_inner);

    lines.push(align(
        Line::from(Span::styled(label.to_string(), label_style())),
        message.sender,
    ));
    for (row, row_style) in body {
        let padding = inner.saturating_sub(UnicodeWidthStr::width(row.as_str()));
        let content = format!(" {}{} ", row, " ".repeat(padding));
        lines.push(align(
            Line::from(Span::styled(content, row_style)),
            message.sender,
        ));
    }
    lines.push(Line::from(""));
}

fn align(line: Line<'static>, sender: Sender) -> Line<'static> {
    match sender {
        Sender::User => line.right_aligned(),
        Sender::Bot => line.left_aligned(),
    }
}

/// Word-wraps `text` to `width` display columns. Explicit newlines are kept
/// and words longer than a row are broken.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0usize;

        for word in paragraph.split(' ') {
            let word_width = UnicodeWidthStr::width(word);
            let separator = usize::from(!current.is_empty());

            if current_width + separator + word_width <= width {
                if separator == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += separator + word_width;
                continue;
            }

            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }

            for c in word.chars() {
                let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
                if current_width + char_width > width && !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += char_width;
            }
        }

        rows.push(current);
    }

    rows
}

/// The slice of the draft that fits in `width` columns while keeping the
/// cursor visible, plus the cursor column inside that slice.
pub fn input_window(text: &str, cursor: usize, width: u16) -> (String, u16) {
    let width = width.max(1) as usize;
    let cursor = cursor.min(text.len());
    let before = &text[..cursor];
    let cursor_col = UnicodeWidthStr::width(before);

    // Leave one column for the cursor itself.
    let skip_cols = (cursor_col + 1).saturating_sub(width);
    let mut skipped = 0usize;
    let mut visible = String::new();
    let mut visible_width = 0usize;

    for c in text.chars() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
        if skipped < skip_cols {
            skipped += char_width;
            continue;
        }
        if visible_width + char_width > width {
            break;
        }
        visible.push(c);
        visible_width += char_width;
    }

    let cursor_x = cursor_col.saturating_sub(skipped).min(width.saturating_sub(1));
    (visible, cursor_x as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::NoopView;
    use ratatui::layout::Alignment;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn wrap_text_breaks_on_words() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn wrap_text_keeps_newlines_and_splits_long_words() {
        assert_eq!(
            wrap_text("abcdefghij\n\nxy", 4),
            vec!["abcd", "efgh", "ij", "", "xy"]
        );
    }

    #[test]
    fn wrap_text_counts_wide_characters() {
        assert_eq!(wrap_text("日本語テキスト", 6), vec!["日本語", "テキス", "ト"]);
    }

    #[test]
    fn transcript_aligns_user_right_and_bot_left() {
        let mut conversation = Conversation::new();
        let turn = conversation.begin_turn("Hi", &mut NoopView).unwrap();
        conversation.append_fragment(turn, "Hello!", &mut NoopView);

        let lines = build_transcript_lines(&conversation, 40, true);

        assert_eq!(lines.len(), 6);
        assert_eq!(line_text(&lines[0]), "You");
        assert_eq!(lines[0].alignment, Some(Alignment::Right));
        assert_eq!(line_text(&lines[1]), " Hi ");
        assert_eq!(line_text(&lines[3]), "Assistant");
        assert_eq!(lines[4].alignment, Some(Alignment::Left));
        assert_eq!(line_text(&lines[4]), " Hello! ");
    }

    #[test]
    fn thinking_placeholder_shows_indicator() {
        let mut conversation = Conversation::new();
        conversation.begin_turn("Hi", &mut NoopView).unwrap();

        let with_indicator = build_transcript_lines(&conversation, 60, true);
        let texts: Vec<String> = with_indicator.iter().map(line_text).collect();
        assert!(texts.iter().any(|text| text.contains(THINKING_LABEL)));

        let without_indicator = build_transcript_lines(&conversation, 60, false);
        let texts: Vec<String> = without_indicator.iter().map(line_text).collect();
        assert!(!texts.iter().any(|text| text.contains(THINKING_LABEL)));
    }

    #[test]
    fn input_window_scrolls_to_keep_cursor_visible() {
        assert_eq!(input_window("hello", 5, 10), ("hello".to_string(), 5));
        assert_eq!(
            input_window("hello world", 11, 6),
            ("world".to_string(), 5)
        );
        assert_eq!(input_window("hello world", 0, 6), ("hello ".to_string(), 0));
    }
}
