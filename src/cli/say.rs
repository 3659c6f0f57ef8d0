//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use crate::core::chat_stream::ChatStreamService;
use crate::core::conversation::{Conversation, ConversationView, TurnPhase};
use crate::core::session::{ChatSession, TurnProgress};
use crate::utils::logging::LoggingState;

/// Prints the reply as it grows. Each hook call writes only the part of the
/// trailing bot message that has not been printed yet.
pub struct StreamingPrinter<W: Write> {
    out: W,
    printed: usize,
    error: Option<io::Error>,
}

impl<W: Write> StreamingPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: 0,
            error: None,
        }
    }

    pub fn printed(&self) -> usize {
        self.printed
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_suffix(&mut self, text: &str) -> io::Result<()> {
        if let Some(suffix) = text.get(self.printed..) {
            if !suffix.is_empty() {
                self.out.write_all(suffix.as_bytes())?;
                self.out.flush()?;
                self.printed = text.len();
            }
        }
        Ok(())
    }
}

impl<W: Write> ConversationView for StreamingPrinter<W> {
    fn scroll_to_latest(&mut self, conversation: &Conversation) {
        // A failed reply is replaced wholesale; the caller prints it.
        if !matches!(conversation.phase(), TurnPhase::Streaming | TurnPhase::Done) {
            return;
        }
        let Some(reply) = conversation.last().filter(|message| message.is_bot()) else {
            return;
        };
        let text = reply.text.clone();
        if let Err(err) = self.write_suffix(&text) {
            self.error.get_or_insert(err);
        }
    }
}

/// Ends a failed reply. Text already on stdout is marked as cut off and the
/// fallback goes to stderr, so stdout never reads as a complete answer.
fn report_failure(
    out: &mut impl Write,
    err: &mut impl Write,
    printed: usize,
    fallback: &str,
) -> io::Result<()> {
    if printed > 0 {
        writeln!(out, " [interrupted]")?;
        out.flush()?;
    }
    writeln!(err, "{fallback}")?;
    err.flush()
}

pub async fn run_say(
    prompt: Vec<String>,
    endpoint: String,
    logging: LoggingState,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: docchat say <prompt>");
        std::process::exit(1);
    }

    let mut session = ChatSession::new(reqwest::Client::new(), endpoint, logging);
    let mut printer = StreamingPrinter::new(io::stdout());
    let Some(params) = session.submit(&prompt, &mut printer) else {
        return Ok(());
    };

    let (stream_service, mut rx) = ChatStreamService::new();
    stream_service.spawn_stream(params);

    while let Some((message, turn)) = rx.recv().await {
        let progress = session.apply_stream_message(message, turn, &mut printer);
        if let Some(err) = printer.take_error() {
            stream_service.shutdown();
            return Err(err.into());
        }

        match progress {
            TurnProgress::Finished(TurnPhase::Failed) => {
                let reply = session
                    .conversation()
                    .last()
                    .map(|message| message.text.as_str())
                    .unwrap_or_default();
                report_failure(&mut io::stdout(), &mut io::stderr(), printer.printed(), reply)?;
                std::process::exit(1);
            }
            TurnProgress::Finished(_) => {
                println!();
                break;
            }
            TurnProgress::Updated | TurnProgress::Ignored => {}
        }
    }

    Ok(())
}
