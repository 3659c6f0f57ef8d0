use crate::core::constants::{INPUT_PLACEHOLDER, SEND_BUTTON_LABEL};
use crate::core::session::ChatSession;
use crate::ui::layout::{build_transcript_lines, input_window};
use crate::ui::state::UiState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn ui(f: &mut Frame, session: &ChatSession, ui: &mut UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_title(f, chunks[0], session, ui);
    render_transcript(f, chunks[1], session, ui);
    render_input(f, chunks[2], session, ui);
}

fn render_title(f: &mut Frame, area: Rect, session: &ChatSession, ui: &UiState) {
    let status = if session.is_busy() {
        "receiving"
    } else {
        "ready"
    };
    let title = Line::from(vec![
        Span::styled(
            ui.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " • {} • {} • {}",
                session.endpoint(),
                status,
                session.logging().get_status_string()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn render_transcript(f: &mut Frame, area: Rect, session: &ChatSession, ui: &mut UiState) {
    let lines = build_transcript_lines(session.conversation(), area.width, ui.show_thinking);
    let height = usize::from(area.height);
    let scroll_offset = ui.resolve_scroll(lines.len(), height);

    // Only the visible window is handed to ratatui, whose scroll offset is u16.
    let visible: Vec<Line<'static>> = lines.into_iter().skip(scroll_offset).take(height).collect();
    f.render_widget(Paragraph::new(visible), area);
}

fn render_input(f: &mut Frame, area: Rect, session: &ChatSession, ui: &mut UiState) {
    let draft = session.conversation().draft();
    let button_width = UnicodeWidthStr::width(SEND_BUTTON_LABEL) as u16;
    let button_style = if draft.trim().is_empty() || session.is_busy() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Reset))
        .title("Enter to send, Ctrl+C to quit")
        .title_top(Line::from(Span::styled(SEND_BUTTON_LABEL, button_style)).right_aligned());
    let inner = block.inner(area);

    // Right-aligned titles end one column before the corner.
    ui.send_button = (area.width > button_width + 2).then(|| {
        Rect::new(
            area.right().saturating_sub(button_width + 1),
            area.y,
            button_width,
            1,
        )
    });

    ui.cursor.clamp(draft);
    let (visible, cursor_x) = input_window(draft, ui.cursor.offset(), inner.width);
    let paragraph = if draft.is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(visible)
    };

    f.render_widget(paragraph.block(block), area);
    if inner.width > 0 && inner.height > 0 {
        f.set_cursor_position((inner.x + cursor_x, inner.y));
    }
}
