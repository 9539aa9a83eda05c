//! Word translation through a priority-ordered chain of HTTP providers.

mod google;
mod language;
mod mymemory;
mod provider;
mod resolver;

use anyhow::{Result, bail};
use std::time::Duration;

pub use google::GoogleProvider;
pub use language::{
    LanguagePair, SUPPORTED_LANGUAGES, language_name, print_languages, validate_language,
};
pub use mymemory::MyMemoryProvider;
pub use provider::{ProviderError, TranslationProvider};
pub use resolver::{TranslationOutcome, TranslationResolver};

/// Names accepted in the `translation.providers` list, in default priority order.
pub const KNOWN_PROVIDERS: &[&str] = &["google", "mymemory"];

/// Builds a provider by its configuration name.
pub fn build_provider(
    name: &str,
    pair: &LanguagePair,
    timeout: Duration,
) -> Result<Box<dyn TranslationProvider>> {
    let provider: Box<dyn TranslationProvider> = match name {
        "google" => Box::new(GoogleProvider::new(pair.clone(), timeout)?),
        "mymemory" => Box::new(MyMemoryProvider::new(pair.clone(), timeout)?),
        other => bail!(
            "Unknown translation provider: '{other}'\n\n\
             Known providers: {}",
            KNOWN_PROVIDERS.join(", ")
        ),
    };
    Ok(provider)
}

/// Builds a resolver whose priority follows the order of `names`.
pub fn build_resolver(
    names: &[String],
    pair: &LanguagePair,
    timeout: Duration,
) -> Result<TranslationResolver> {
    let mut resolver = TranslationResolver::new(timeout);
    for name in names {
        resolver.push(build_provider(name, pair, timeout)?);
    }
    if resolver.is_empty() {
        bail!("No translation providers configured");
    }
    Ok(resolver)
}
