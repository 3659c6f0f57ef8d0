use crate::core::constants::{DEFAULT_ENDPOINT, DEFAULT_TITLE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend URL that receives `{"question": ...}` posts
    pub endpoint: Option<String>,
    /// Text shown in the title bar
    pub title: Option<String>,
    /// Show the "processing" line while a reply has not started yet
    pub thinking_indicator: Option<bool>,
}

/// Keys accepted by `docchat set` / `docchat unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Endpoint,
    Title,
    ThinkingIndicator,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [
        ConfigKey::Endpoint,
        ConfigKey::Title,
        ConfigKey::ThinkingIndicator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Endpoint => "endpoint",
            ConfigKey::Title => "title",
            ConfigKey::ThinkingIndicator => "thinking-indicator",
        }
    }
}

impl TryFrom<&str> for ConfigKey {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| format!("Unknown config key: {value}"))
    }
}

impl Config {
    /// Endpoint precedence: command line, then environment, then this
    /// config, then the built-in default.
    pub fn resolve_endpoint(&self, cli: Option<&str>, env: Option<&str>) -> String {
        [cli, env, self.endpoint.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn thinking_indicator(&self) -> bool {
        self.thinking_indicator.unwrap_or(true)
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {}", key.as_str()));
        }

        match key {
            ConfigKey::Endpoint => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(format!(
                        "Endpoint must start with http:// or https:// (got {value})"
                    ));
                }
                self.endpoint = Some(value.to_string());
            }
            ConfigKey::Title => self.title = Some(value.to_string()),
            ConfigKey::ThinkingIndicator => {
                self.thinking_indicator = Some(parse_toggle(value)?);
            }
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Endpoint => self.endpoint = None,
            ConfigKey::Title => self.title = None,
            ConfigKey::ThinkingIndicator => self.thinking_indicator = None,
        }
    }
}

fn parse_toggle(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("Expected on or off (got {value})")),
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
