//! The per-user conversational state machine.
//!
//! [`DialogueEngine`] turns an [`Inbound`] message into [`Outbound`] instructions
//! for whatever channel delivered it, consulting the translation resolver and the
//! record stores along the way.

mod engine;
mod message;
pub mod parse;
pub mod replies;

pub use engine::DialogueEngine;
pub use message::{Action, ActionButton, Command, Inbound, MessageRef, Outbound, Reply};
pub use parse::{PAIR_DELIMITER, PairParseError, WordPairInput, parse_word_pair};
