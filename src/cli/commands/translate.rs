use anyhow::{Result, bail};

use crate::config::ResolvedConfig;
use crate::translation::{TranslationOutcome, build_resolver};
use crate::ui::{Style, while_spinning};

/// Resolves `word` through the provider chain and prints the translation.
///
/// The translation goes to stdout so it can be piped; the winning provider is
/// reported on stderr.
pub async fn run_translate(config: &ResolvedConfig, word: &str) -> Result<()> {
    let word = word.trim();
    if word.is_empty() {
        bail!("Nothing to translate");
    }

    let resolver = build_resolver(&config.providers, &config.languages, config.timeout)?;

    match while_spinning("Translating...", resolver.resolve(word)).await {
        TranslationOutcome::Translated { text, provider } => {
            println!("{text}");
            eprintln!("{}", Style::secondary(format!("via {provider}")));
            Ok(())
        }
        TranslationOutcome::Exhausted => bail!(
            "translation failed: none of {} could translate '{word}'",
            config.providers.join(", ")
        ),
    }
}
