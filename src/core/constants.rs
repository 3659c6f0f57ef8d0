//! Shared constants used across the application

/// Endpoint the backend serves when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/chat/";

/// Environment variable that overrides the configured endpoint.
pub const ENDPOINT_ENV_VAR: &str = "DOCCHAT_ENDPOINT";

/// Text that replaces a bot reply when its turn fails for any reason.
pub const FALLBACK_REPLY: &str = "Oops! Something went wrong.";

pub const DEFAULT_TITLE: &str = "Document AI Assistant";

/// Shown inside a bot bubble until its first fragment arrives.
pub const THINKING_LABEL: &str = "🤖 AI is processing...";

pub const INPUT_PLACEHOLDER: &str = "Type your message...";

/// Label of the clickable button drawn on the input border.
pub const SEND_BUTTON_LABEL: &str = "[ Send ]";
