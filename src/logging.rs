//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never mix with chat output. `RUST_LOG` overrides
//! the configured level entirely.

use tracing_subscriber::EnvFilter;

/// HTTP plumbing that is only interesting when something is badly wrong.
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut directives = level.to_string();
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
