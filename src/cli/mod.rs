//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

pub use args::{Args, Command};

/// Marks a failure caused by configuration rather than by the program.
#[derive(Debug, thiserror::Error)]
#[error("{0:#}")]
pub struct ConfigProblem(pub anyhow::Error);

/// Process exit code for a failed run.
pub fn exit_code(err: &anyhow::Error) -> exitcode::ExitCode {
    if err.downcast_ref::<ConfigProblem>().is_some() {
        exitcode::CONFIG
    } else {
        exitcode::SOFTWARE
    }
}
