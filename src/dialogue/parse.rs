//! Parsing of `word - translation` input.

/// Separator between a word and its translation.
pub const PAIR_DELIMITER: &str = " - ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPairInput {
    Pair { word: String, translation: String },
    /// A lone word with no delimiter; its translation has to be looked up.
    WordOnly(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PairParseError {
    #[error("input is empty")]
    Empty,
    #[error("word or translation is missing around the delimiter")]
    Incomplete,
}

pub fn parse_word_pair(text: &str) -> Result<WordPairInput, PairParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PairParseError::Empty);
    }

    if let Some((word, translation)) = text.split_once(PAIR_DELIMITER) {
        let (word, translation) = (word.trim(), translation.trim());
        if word.is_empty() || translation.is_empty() {
            return Err(PairParseError::Incomplete);
        }
        return Ok(WordPairInput::Pair {
            word: word.to_string(),
            translation: translation.to_string(),
        });
    }

    // "cat -" or "- кот" once trimmed: a half-typed pair, not a lone word.
    if text.starts_with('-') || text.ends_with('-') {
        return Err(PairParseError::Incomplete);
    }

    Ok(WordPairInput::WordOnly(text.to_string()))
}
