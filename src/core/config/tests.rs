use super::data::{path_display, Config, ConfigKey};
use crate::core::constants::{DEFAULT_ENDPOINT, DEFAULT_TITLE};
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.title(), DEFAULT_TITLE);
    assert!(config.thinking_indicator());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .set(ConfigKey::Endpoint, "http://docs.internal:8000/chat/")
        .unwrap();
    config.set(ConfigKey::ThinkingIndicator, "off").unwrap();
    config.save_to_path(&config_path).expect("Failed to save config");

    let mut loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(
        loaded.endpoint.as_deref(),
        Some("http://docs.internal:8000/chat/")
    );
    assert!(!loaded.thinking_indicator());

    loaded.unset(ConfigKey::Endpoint);
    loaded.save_to_path(&config_path).expect("Failed to save config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.endpoint, None);
    assert_eq!(reloaded.thinking_indicator, Some(false));
}

#[test]
fn test_invalid_toml_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "endpoint = [").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse config at "));
}

#[test]
fn test_endpoint_precedence() {
    let config = Config {
        endpoint: Some("http://from-config/chat/".to_string()),
        ..Default::default()
    };

    assert_eq!(
        config.resolve_endpoint(Some("http://from-cli/"), Some("http://from-env/")),
        "http://from-cli/"
    );
    assert_eq!(
        config.resolve_endpoint(None, Some("http://from-env/")),
        "http://from-env/"
    );
    assert_eq!(
        config.resolve_endpoint(Some("  "), None),
        "http://from-config/chat/"
    );
    assert_eq!(
        Config::default().resolve_endpoint(None, None),
        DEFAULT_ENDPOINT
    );
}

#[test]
fn test_set_rejects_bad_values() {
    let mut config = Config::default();

    assert!(config.set(ConfigKey::Endpoint, "localhost:8000").is_err());
    assert!(config.set(ConfigKey::ThinkingIndicator, "maybe").is_err());
    assert!(config.set(ConfigKey::Title, "   ").is_err());
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_key_parsing() {
    assert_eq!(ConfigKey::try_from("endpoint"), Ok(ConfigKey::Endpoint));
    assert_eq!(
        ConfigKey::try_from("thinking-indicator"),
        Ok(ConfigKey::ThinkingIndicator)
    );
    assert_eq!(
        ConfigKey::try_from("theme"),
        Err("Unknown config key: theme".to_string())
    );
}

#[cfg(unix)]
#[test]
fn test_path_display_uses_tilde_under_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home).join(".config/docchat/config.toml");
        assert_eq!(path_display(&path), "~/.config/docchat/config.toml");
    }
}
