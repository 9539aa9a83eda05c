use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod theme;

pub use spinner::{Spinner, while_spinning};
pub use theme::Style;

/// Check if the inquire error is a user cancellation/interruption.
const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Turns a cancelled prompt (Ctrl+C or Escape) into `Ok(None)`.
///
/// Any other prompt failure is propagated.
pub fn cancellable<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_prompt_cancelled(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
