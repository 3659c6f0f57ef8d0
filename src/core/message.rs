/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn is_bot(self) -> bool {
        self == Sender::Bot
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub is_thinking: bool,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
            is_thinking: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    /// Empty bot entry awaiting its first fragment.
    pub fn bot_placeholder() -> Self {
        Self {
            text: String::new(),
            sender: Sender::Bot,
            is_thinking: true,
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender.is_bot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_sender_and_clear_thinking() {
        let user = Message::user("Hi");
        assert_eq!(user.sender, Sender::User);
        assert!(!user.is_bot());
        assert!(!user.is_thinking);

        assert_eq!(Message::bot("Hello!").sender, Sender::Bot);
    }

    #[test]
    fn placeholder_starts_empty_and_thinking() {
        let placeholder = Message::bot_placeholder();
        assert!(placeholder.is_bot());
        assert!(placeholder.text.is_empty());
        assert!(placeholder.is_thinking);
    }
}
