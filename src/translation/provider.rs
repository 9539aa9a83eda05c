use async_trait::async_trait;
use std::time::Duration;

/// Why a single provider could not produce a translation.
///
/// Never fatal: the resolver logs it and moves on to the next provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("empty translation")]
    Empty,
    #[error("no answer within {0:?}")]
    Timeout(Duration),
}

/// One external translation backend.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short identifier used in logs and the `providers` listing.
    fn name(&self) -> &str;

    /// Human-readable location of the backend.
    fn endpoint(&self) -> &str {
        ""
    }

    async fn attempt_translate(&self, word: &str) -> Result<String, ProviderError>;
}

/// Trims a provider answer and rejects blank ones.
pub(crate) fn non_empty(text: &str) -> Result<String, ProviderError> {
    let text = text.trim();
    if text.is_empty() {
        Err(ProviderError::Empty)
    } else {
        Ok(text.to_string())
    }
}
