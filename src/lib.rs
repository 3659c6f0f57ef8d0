//! docchat is a terminal chat client for a document assistant backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the chat session that drives one turn at
//!   a time, configuration, and streaming orchestration.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the request payload sent to the backend.
//! - [`utils`] holds the UTF-8 stream decoder, transcript logging, diagnostics
//!   setup and input sanitizing.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions and [`cli::say`] for one-shot questions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
