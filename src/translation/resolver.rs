use std::time::Duration;
use tracing::{debug, info, warn};

use super::provider::{ProviderError, TranslationProvider};

/// Result of running a word through the provider chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated { text: String, provider: String },
    /// No provider could translate the word.
    Exhausted,
}

impl TranslationOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Translated { text, .. } => Some(text),
            Self::Exhausted => None,
        }
    }
}

/// Tries providers in insertion order and returns the first usable translation.
pub struct TranslationResolver {
    providers: Vec<Box<dyn TranslationProvider>>,
    attempt_timeout: Duration,
}

impl TranslationResolver {
    pub fn new(attempt_timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            attempt_timeout,
        }
    }

    /// Appends a provider with the lowest priority so far.
    #[must_use]
    pub fn with_provider(mut self, provider: impl TranslationProvider + 'static) -> Self {
        self.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: Box<dyn TranslationProvider>) {
        self.providers.push(provider);
    }

    pub fn providers(&self) -> impl Iterator<Item = &dyn TranslationProvider> {
        self.providers.iter().map(Box::as_ref)
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub async fn resolve(&self, word: &str) -> TranslationOutcome {
        for provider in &self.providers {
            debug!(provider = provider.name(), word, "attempting translation");

            match self.attempt(provider.as_ref(), word).await {
                Ok(text) => {
                    info!(provider = provider.name(), word, "translation resolved");
                    return TranslationOutcome::Translated {
                        text,
                        provider: provider.name().to_string(),
                    };
                }
                Err(err) => {
                    warn!(provider = provider.name(), word, error = %err, "provider failed, trying next");
                }
            }
        }

        warn!(word, "all translation providers exhausted");
        TranslationOutcome::Exhausted
    }

    async fn attempt(
        &self,
        provider: &dyn TranslationProvider,
        word: &str,
    ) -> Result<String, ProviderError> {
        let text = tokio::time::timeout(self.attempt_timeout, provider.attempt_translate(word))
            .await
            .map_err(|_| ProviderError::Timeout(self.attempt_timeout))??;

        // Providers should already reject blank answers; don't trust them to.
        if text.trim().is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(text)
    }
}
