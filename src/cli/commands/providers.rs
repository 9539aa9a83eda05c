//! Provider listing command handler.

use anyhow::Result;

use crate::config::ResolvedConfig;
use crate::translation::{TranslationResolver, build_resolver};
use crate::ui::Style;

/// Prints the configured providers in the order they are tried.
pub fn print_providers(config: &ResolvedConfig) -> Result<()> {
    let resolver = build_resolver(&config.providers, &config.languages, config.timeout)?;

    println!(
        "{} {}\n",
        Style::header("Translation providers"),
        Style::secondary(format!("({}, tried in order)", config.languages))
    );
    for line in provider_lines(&resolver) {
        println!("{line}");
    }
    println!(
        "\n  {} {}s per attempt",
        Style::label("timeout"),
        config.timeout.as_secs()
    );

    Ok(())
}

fn provider_lines(resolver: &TranslationResolver) -> Vec<String> {
    resolver
        .providers()
        .enumerate()
        .map(|(i, provider)| {
            format!(
                "  {}. {:<10} {}",
                i + 1,
                Style::value(provider.name()),
                Style::secondary(provider.endpoint())
            )
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::LanguagePair;
    use std::time::Duration;

    #[test]
    fn test_provider_lines_follow_priority() {
        let names = vec!["mymemory".to_string(), "google".to_string()];
        let resolver =
            build_resolver(&names, &LanguagePair::default(), Duration::from_secs(1)).unwrap();

        let lines = provider_lines(&resolver);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1.") && lines[0].contains("mymemory"));
        assert!(lines[1].contains("2.") && lines[1].contains("google"));
    }
}
