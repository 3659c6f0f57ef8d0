//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;

use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cli::say::run_say;
use crate::core::config::{Config, ConfigKey};
use crate::core::constants::ENDPOINT_ENV_VAR;
use crate::core::session::ChatSession;
use crate::ui::chat_loop::run_chat;
use crate::ui::state::UiState;
use crate::utils::diagnostics::{self, DiagnosticsTarget, LOG_FILTER_ENV_VAR};
use crate::utils::logging::LoggingState;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "A terminal chat client for a document assistant backend")]
#[command(
    long_about = "docchat is a full-screen terminal chat interface that sends each question \
to a document assistant backend and streams the answer into the conversation as it arrives.\n\n\
Environment Variables:\n\
  DOCCHAT_ENDPOINT  Backend URL (overridden by --endpoint)\n\
  DOCCHAT_LOG       Diagnostic log filter, e.g. docchat=trace\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter / [ Send ]  Send the message\n\
  Up/Down/Mouse     Scroll through chat history\n\
  PageUp/PageDown   Scroll by a page\n\
  Ctrl+U            Clear the input before the cursor\n\
  Ctrl+C / Esc      Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend URL to post questions to
    #[arg(short = 'e', long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Enable transcript logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Write diagnostic logs to specified file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask a single question and print the streamed answer
    Say {
        /// Question to send (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (can be multiple words for title)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    init_diagnostics(args.debug_log.as_deref(), matches!(command, Commands::Say { .. }))?;

    match command {
        Commands::Chat => {
            let config = Config::load()?;
            let endpoint = resolve_endpoint(&config, args.endpoint.as_deref());
            let logging = open_transcript(args.log)?;
            debug!(%endpoint, "starting chat");

            let session = ChatSession::new(reqwest::Client::new(), endpoint, logging);
            run_chat(session, UiState::new(&config)).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let endpoint = resolve_endpoint(&config, args.endpoint.as_deref());
            let logging = open_transcript(args.log)?;
            run_say(prompt, endpoint, logging).await
        }
        Commands::Set { key, value } => {
            let key = parse_key(&key);
            let value = value.join(" ");
            let mut config = Config::load()?;
            if let Err(message) = config.set(key, &value) {
                eprintln!("❌ {message}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {} to: {}", key.as_str(), value.trim());
            Ok(())
        }
        Commands::Unset { key } => {
            let key = parse_key(&key);
            let mut config = Config::load()?;
            config.unset(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
        Commands::Config => {
            let config = Config::load()?;
            let path = Config::get_config_path().ok();
            config.print_all(path.as_deref());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> ConfigKey {
    match ConfigKey::try_from(key) {
        Ok(key) => key,
        Err(message) => {
            eprintln!("❌ {message}");
            let known: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
            eprintln!("Available keys: {}", known.join(", "));
            std::process::exit(1);
        }
    }
}

fn resolve_endpoint(config: &Config, cli: Option<&str>) -> String {
    let env_endpoint = env::var(ENDPOINT_ENV_VAR).ok();
    config.resolve_endpoint(cli, env_endpoint.as_deref())
}

fn open_transcript(log: Option<String>) -> Result<LoggingState, Box<dyn Error>> {
    match log {
        Some(path) => LoggingState::open(path),
        None => Ok(LoggingState::new(None)),
    }
}

fn init_diagnostics(debug_log: Option<&Path>, is_say: bool) -> Result<(), Box<dyn Error>> {
    let default_log = diagnostics::default_log_path();
    let target = diagnostics_target(
        debug_log,
        default_log.as_deref(),
        is_say,
        env::var_os(LOG_FILTER_ENV_VAR).is_some(),
    );
    diagnostics::init(target).or_else(|err| match debug_log {
        Some(_) => Err(err),
        // An unwritable default log file must not keep the chat from starting.
        None => Ok(()),
    })
}

/// The chat screen owns the terminal, so it logs to `--debug-log` or the
/// default log file. `say` writes to stderr only when a filter is set.
fn diagnostics_target<'a>(
    debug_log: Option<&'a Path>,
    default_log: Option<&'a Path>,
    is_say: bool,
    filter_set: bool,
) -> DiagnosticsTarget<'a> {
    match (debug_log, is_say) {
        (Some(path), _) => DiagnosticsTarget::File(path),
        (None, true) if filter_set => DiagnosticsTarget::Stderr,
        (None, true) => DiagnosticsTarget::Disabled,
        (None, false) => default_log.map_or(DiagnosticsTarget::Disabled, DiagnosticsTarget::File),
    }
}
