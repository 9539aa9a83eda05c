//! Subcommand implementations.

/// Chat mode command handler and engine wiring.
pub mod chat;

/// Config command handler.
pub mod config;

/// Provider listing command handler.
pub mod providers;

/// One-shot translation command handler.
pub mod translate;
