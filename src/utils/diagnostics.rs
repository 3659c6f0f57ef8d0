//! Diagnostic logging through `tracing`.
//!
//! The chat screen owns the terminal, so diagnostics always go to a file:
//! the one given on the command line or `docchat.log` in the data directory.
//! The one-shot `say` command may log to stderr instead.

use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_FILTER_ENV_VAR: &str = "DOCCHAT_LOG";

const DEFAULT_FILTER: &str = "docchat=debug";

const DEFAULT_LOG_FILE: &str = "docchat.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticsTarget<'a> {
    File(&'a Path),
    Stderr,
    Disabled,
}

/// Where the chat screen logs when no `--debug-log` is given.
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "docchat", "docchat")
        .map(|dirs| dirs.data_local_dir().join(DEFAULT_LOG_FILE))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init(target: DiagnosticsTarget<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);

    let result = match target {
        DiagnosticsTarget::Disabled => return Ok(()),
        DiagnosticsTarget::File(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        DiagnosticsTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
    };

    // A subscriber installed earlier (tests, embedding) stays in place.
    if let Err(err) = result {
        tracing::debug!(error = %err, "diagnostics subscriber already installed");
    }
    Ok(())
}
