use std::error::Error;
use std::io::{self, Stdout};

use ratatui::crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

pub type ChatTerminal = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> Result<ChatTerminal, Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )
    .inspect_err(|_| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    })?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).inspect_err(|_| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableBracketedPaste,
            DisableMouseCapture
        );
    })?;

    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut ChatTerminal) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs `restore` no matter how the session ended. An error from the session
/// wins over one from restoring.
pub fn finish_session<T>(
    result: Result<T, Box<dyn Error>>,
    restore: impl FnOnce() -> Result<(), Box<dyn Error>>,
) -> Result<T, Box<dyn Error>> {
    let restored = restore();
    match (result, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(restore_err)) => {
            warn!(error = %restore_err, "failed to restore terminal after error");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(message: &str) -> Box<dyn Error> {
        message.into()
    }

    #[test]
    fn setup_and_restore_round_trip_when_a_terminal_is_available() {
        // Headless environments cannot switch to raw mode; only exercise the
        // pair when setup succeeds.
        if let Ok(mut terminal) = setup_terminal() {
            let _ = restore_terminal(&mut terminal);
        }
    }

    #[test]
    fn restore_runs_after_loop_error_and_loop_error_is_kept() {
        let mut restored = false;
        let result: Result<(), _> = finish_session(Err(boxed("draw failed")), || {
            restored = true;
            Err(boxed("restore failed"))
        });

        assert!(restored);
        assert_eq!(result.unwrap_err().to_string(), "draw failed");
    }

    #[test]
    fn restore_error_surfaces_after_clean_exit() {
        let result = finish_session(Ok(7), || Err(boxed("restore failed")));
        assert_eq!(result.unwrap_err().to_string(), "restore failed");

        let mut restored = false;
        let result = finish_session(Ok(7), || {
            restored = true;
            Ok(())
        });
        assert!(restored);
        assert_eq!(result.unwrap(), 7);
    }
}
