//! Language codes and the fixed source/target pair used by providers.

use anyhow::Result;

use crate::ui::Style;

/// Supported language codes (ISO 639-1) and their names.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fil", "Filipino"),
    ("fr", "French"),
    ("ga", "Irish"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("la", "Latin"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("mt", "Maltese"),
    ("my", "Myanmar (Burmese)"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("ps", "Pashto"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
];

/// Returns the display name of a supported language code.
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Prints all supported language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported language codes (ISO 639-1)"));
    for (code, name) in SUPPORTED_LANGUAGES {
        println!("  {:5} {}", Style::code(code), Style::secondary(name));
    }
}

/// Validates that the given language code is supported.
///
/// # Errors
///
/// Returns an error if the language code is not in the supported list.
pub fn validate_language(lang: &str) -> Result<()> {
    if language_name(lang).is_some() {
        Ok(())
    } else {
        anyhow::bail!(
            "Invalid language code: '{lang}'\n\n\
             Valid language codes (ISO 639-1): en, ru, de, fr, es, ...\n\
             Run 'vocab languages' to see all supported codes."
        )
    }
}

/// Source and target language every provider call is made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    from: String,
    to: String,
}

impl LanguagePair {
    /// Builds a pair of two distinct supported codes.
    pub fn new(from: &str, to: &str) -> Result<Self> {
        validate_language(from)?;
        validate_language(to)?;
        if from == to {
            anyhow::bail!("Source and target language are both '{from}'");
        }
        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    pub fn source(&self) -> &str {
        &self.from
    }

    pub fn target(&self) -> &str {
        &self.to
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            from: "en".to_string(),
            to: "ru".to_string(),
        }
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language_valid() {
        assert!(validate_language("ru").is_ok());
        assert!(validate_language("en").is_ok());
        assert!(validate_language("zh-TW").is_ok());
    }

    #[test]
    fn test_validate_language_invalid() {
        assert!(validate_language("invalid").is_err());
        assert!(validate_language("").is_err());
        assert!(validate_language("RU").is_err()); // Case sensitive
    }

    #[test]
    fn test_language_pair_rejects_same_language() {
        assert!(LanguagePair::new("en", "en").is_err());
        assert!(LanguagePair::new("en", "xx").is_err());
    }

    #[test]
    fn test_language_pair_default_is_english_to_russian() {
        let pair = LanguagePair::default();
        assert_eq!(pair.source(), "en");
        assert_eq!(pair.target(), "ru");
        assert_eq!(language_name(pair.target()), Some("Russian"));
    }
}
