use ratatui::layout::{Position, Rect};

use crate::core::config::Config;
use crate::core::conversation::{Conversation, ConversationView};
use crate::ui::draft::DraftCursor;

/// Terminal-side state that is not part of the conversation itself.
pub struct UiState {
    pub title: String,
    pub show_thinking: bool,
    pub cursor: DraftCursor,
    /// First transcript line shown at the top of the message area.
    pub scroll_offset: usize,
    /// When set, the next frame scrolls to the bottom of the transcript.
    pub follow_latest: bool,
    /// Transcript lines that fit in the message area, as of the last frame.
    pub viewport_height: usize,
    /// Largest valid scroll offset, as of the last frame.
    pub max_scroll: usize,
    /// Where the send button was drawn, for mouse hit-testing.
    pub send_button: Option<Rect>,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new(config: &Config) -> Self {
        Self {
            title: config.title().to_string(),
            show_thinking: config.thinking_indicator(),
            cursor: DraftCursor::default(),
            scroll_offset: 0,
            follow_latest: true,
            viewport_height: 0,
            max_scroll: 0,
            send_button: None,
            exit_requested: false,
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.follow_latest = false;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll).saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(self.max_scroll);
        // Reaching the bottom by hand resumes following new output.
        self.follow_latest = self.scroll_offset >= self.max_scroll;
    }

    pub fn page_size(&self) -> usize {
        self.viewport_height.saturating_sub(1).max(1)
    }

    /// Resolves the offset to draw for a transcript of `total_lines` lines
    /// in a viewport of `height` lines, and remembers the geometry.
    pub fn resolve_scroll(&mut self, total_lines: usize, height: usize) -> usize {
        self.viewport_height = height;
        self.max_scroll = total_lines.saturating_sub(height);
        if self.follow_latest {
            self.scroll_offset = self.max_scroll;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll);
        }
        self.scroll_offset
    }

    pub fn hits_send_button(&self, column: u16, row: u16) -> bool {
        self.send_button
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }
}

impl ConversationView for UiState {
    fn scroll_to_latest(&mut self, conversation: &Conversation) {
        self.follow_latest = true;
        self.cursor.clamp(conversation.draft());
    }
}
