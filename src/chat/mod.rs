//! Terminal delivery channel for the dialogue engine.
//!
//! Provides a REPL where slash commands and free text go to the engine and
//! `#<n>` presses the numbered button of an earlier bot message.

/// Input parsing and slash command autocomplete.
pub mod command;
mod session;
pub mod transcript;
mod ui;

pub use session::ChatSession;
pub use transcript::{NumberedButton, Rendered, Transcript};
