//! Interactive event loop for the chat screen.
//!
//! One task owns the session and the UI state. Terminal events arrive from a
//! reader task and stream updates from [`ChatStreamService`]; both are
//! applied here, in arrival order, followed by a redraw.

mod lifecycle;

use std::error::Error;
use std::time::Duration;

use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::chat_stream::{ChatStreamService, StreamMessage, StreamParams};
use crate::core::conversation::TurnId;
use crate::core::session::ChatSession;
use crate::ui::renderer::ui;
use crate::ui::state::UiState;
use crate::utils::input::sanitize_text_input;
use lifecycle::{finish_session, restore_terminal, setup_terminal, ChatTerminal};

const MOUSE_SCROLL_LINES: usize = 3;

pub async fn run_chat(session: ChatSession, ui_state: UiState) -> Result<(), Box<dyn Error>> {
    let mut terminal = setup_terminal()?;

    let (stream_service, stream_rx) = ChatStreamService::new();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let event_reader_handle = tokio::spawn(async move {
        loop {
            // Use a short timeout to prevent blocking
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    });

    let result = event_loop(
        &mut terminal,
        session,
        ui_state,
        &stream_service,
        stream_rx,
        event_rx,
    )
    .await;

    stream_service.shutdown();
    event_reader_handle.abort();

    finish_session(result, || restore_terminal(&mut terminal))
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    mut session: ChatSession,
    mut ui_state: UiState,
    stream_service: &ChatStreamService,
    mut stream_rx: mpsc::UnboundedReceiver<(StreamMessage, TurnId)>,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<(), Box<dyn Error>> {
    debug!(endpoint = session.endpoint(), "chat screen started");
    loop {
        terminal.draw(|f| ui(f, &session, &mut ui_state))?;
        if ui_state.exit_requested {
            return Ok(());
        }

        tokio::select! {
            Some(ev) = event_rx.recv() => {
                if let Some(params) = handle_event(&mut session, &mut ui_state, ev) {
                    stream_service.spawn_stream(params);
                }
                // Apply queued input before the next frame.
                while let Ok(ev) = event_rx.try_recv() {
                    if let Some(params) = handle_event(&mut session, &mut ui_state, ev) {
                        stream_service.spawn_stream(params);
                    }
                }
            }
            Some((message, turn)) = stream_rx.recv() => {
                apply_stream_updates(&mut session, &mut ui_state, &mut stream_rx, message, turn);
            }
            else => return Ok(()),
        }
    }
}

/// Applies `first` and every update already waiting in the channel, so a
/// burst of fragments costs one frame.
fn apply_stream_updates(
    session: &mut ChatSession,
    ui_state: &mut UiState,
    rx: &mut mpsc::UnboundedReceiver<(StreamMessage, TurnId)>,
    first: StreamMessage,
    turn: TurnId,
) {
    session.apply_stream_message(first, turn, ui_state);
    while let Ok((message, turn)) = rx.try_recv() {
        session.apply_stream_message(message, turn, ui_state);
    }
}

/// Routes one terminal event. Returns the request to spawn when the event
/// submitted the draft.
pub fn handle_event(
    session: &mut ChatSession,
    ui_state: &mut UiState,
    event: Event,
) -> Option<StreamParams> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(session, ui_state, key),
        Event::Paste(text) => {
            let text = sanitize_text_input(&text);
            ui_state.cursor.insert_str(session.draft_mut(), &text);
            None
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => {
                ui_state.scroll_up(MOUSE_SCROLL_LINES);
                None
            }
            MouseEventKind::ScrollDown => {
                ui_state.scroll_down(MOUSE_SCROLL_LINES);
                None
            }
            MouseEventKind::Down(MouseButton::Left)
                if ui_state.hits_send_button(mouse.column, mouse.row) =>
            {
                session.submit_draft(ui_state)
            }
            _ => None,
        },
        _ => None,
    }
}

fn handle_key(session: &mut ChatSession, ui_state: &mut UiState, key: KeyEvent) -> Option<StreamParams> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => ui_state.exit_requested = true,
        KeyCode::Esc => ui_state.exit_requested = true,
        KeyCode::Enter => return session.submit_draft(ui_state),
        KeyCode::Char('u') if ctrl => ui_state.cursor.clear_to_start(session.draft_mut()),
        KeyCode::Char('a') if ctrl => ui_state.cursor.move_home(),
        KeyCode::Char('e') if ctrl => {
            let draft = session.conversation().draft();
            ui_state.cursor.move_end(draft);
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            ui_state.cursor.insert_char(session.draft_mut(), c);
        }
        KeyCode::Backspace => ui_state.cursor.backspace(session.draft_mut()),
        KeyCode::Delete => ui_state.cursor.delete(session.draft_mut()),
        KeyCode::Left => ui_state.cursor.move_left(session.conversation().draft()),
        KeyCode::Right => ui_state.cursor.move_right(session.conversation().draft()),
        KeyCode::Home => ui_state.cursor.move_home(),
        KeyCode::End => ui_state.cursor.move_end(session.conversation().draft()),
        KeyCode::Up => ui_state.scroll_up(1),
        KeyCode::Down => ui_state.scroll_down(1),
        KeyCode::PageUp => {
            let page = ui_state.page_size();
            ui_state.scroll_up(page);
        }
        KeyCode::PageDown => {
            let page = ui_state.page_size();
            ui_state.scroll_down(page);
        }
        _ => {}
    }
    None
}
