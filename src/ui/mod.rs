//! Terminal UI layer for interactive chat sessions.
//!
//! The UI module owns rendering, layout, keyboard handling, and loop control
//! for the text user interface.
//!
//! Key submodules include:
//! - [`chat_loop`]: the main interaction loop that routes terminal events to
//!   the session and applies updates from [`crate::core::chat_stream`].
//! - [`renderer`] and [`layout`]: view composition and frame output.
//! - [`state`] and [`draft`]: scroll position, input cursor and hit areas.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns the conversation and backend coordination.

pub mod chat_loop;
pub mod draft;
pub mod layout;
pub mod renderer;
pub mod state;
