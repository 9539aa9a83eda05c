//! # vocab - Conversational vocabulary assistant
//!
//! `vocab` helps learners build a personal dictionary of foreign words through a
//! chat conversation. Words are translated through a priority-ordered chain of
//! free translation services, falling back to the next one when a service fails.
//!
//! ## Features
//!
//! - **Provider fallback**: Google and MyMemory tried in a configurable order
//! - **Guided dialogue**: a per-user state machine for adding, editing and deleting words
//! - **Pluggable storage**: in-memory, `SQLite`, or the remote user/dictionary services
//! - **Terminal chat**: talk to the assistant with `vocab chat`
//!
//! ## Quick Start
//!
//! ```bash
//! # Start a conversation
//! vocab
//!
//! # Translate one word
//! vocab translate cat
//!
//! # Prefer MyMemory, fall back to Google
//! vocab -p mymemory -p google translate cat
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/vocab/config.toml`:
//!
//! ```toml
//! [translation]
//! from = "en"
//! to = "ru"
//! providers = ["google", "mymemory"]
//!
//! [storage]
//! backend = "sqlite"
//! ```

/// Terminal delivery channel for the dialogue engine.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and resolution.
pub mod config;

/// Conversation state machine, inbound/outbound messages and reply texts.
pub mod dialogue;

/// File system utilities.
pub mod fs;

/// Tracing subscriber setup.
pub mod logging;

/// XDG-style path utilities for configuration and data.
pub mod paths;

/// User and word record stores.
pub mod records;

/// Per-user conversation sessions.
pub mod session;

/// Translation providers and the fallback resolver.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;
