use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A terminal spinner shown while the bot is working.
///
/// Drawn on stderr and hidden automatically when stderr is not a terminal.
/// Clears itself when dropped.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let progress_bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            progress_bar.set_style(style.tick_strings(TICKS));
        }
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));

        Self { progress_bar }
    }

    pub fn stop(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}

/// Awaits `future` with a spinner on screen.
pub async fn while_spinning<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = Spinner::new(message);
    let output = future.await;
    spinner.stop();
    output
}
