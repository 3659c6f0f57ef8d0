use crate::core::message::{Message, Sender};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Plain-text transcript of the conversation, appended one message at a time.
pub struct LoggingState {
    file_path: Option<PathBuf>,
    is_active: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<PathBuf>) -> Self {
        let is_active = log_file.is_some();
        LoggingState {
            file_path: log_file,
            is_active,
        }
    }

    /// Opens `path` for appending and writes a session header.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.into();
        Self::test_file_access(&path)?;

        let logging = Self::new(Some(path));
        logging.write_to_log(&format!(
            "## Session started {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;
        Ok(logging)
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn log_message(&self, message: &Message) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_active {
            return Ok(());
        }

        match message.sender {
            Sender::User => self.write_to_log(&format!("You: {}", message.text)),
            Sender::Bot => self.write_to_log(&message.text),
        }
    }

    fn write_to_log(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between messages, as on screen.
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    pub fn get_status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (Some(path), true) => format!(
                "logging to {}",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
            _ => "not logging".to_string(),
        }
    }

    fn test_file_access(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn transcript_records_user_and_bot_messages() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.log");
        let logging = LoggingState::open(&path).unwrap();

        logging.log_message(&Message::user("Hi")).unwrap();
        logging
            .log_message(&Message::bot("Hello!\nHow can I help?"))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("## Session started "));
        assert!(contents.ends_with("You: Hi\n\nHello!\nHow can I help?\n\n"));
        assert_eq!(logging.get_status_string(), "logging to chat.log");
    }

    #[test]
    fn inactive_logging_writes_nothing() {
        let logging = LoggingState::new(None);
        assert!(!logging.is_active());
        assert!(logging.log_message(&Message::user("Hi")).is_ok());
        assert_eq!(logging.get_status_string(), "not logging");
    }
}
