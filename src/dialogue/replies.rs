//! User-facing reply texts.

use super::parse::PAIR_DELIMITER;

pub const COMMANDS: &str = "/add - add a word to your dictionary\n\
     /dictionary - show your words\n\
     /translate - translate a word\n\
     /cancel - abandon the current step\n\
     /help - show this list";

pub fn welcome() -> String {
    format!(
        "Hi! I help you learn foreign words.\n\
         Send me any word and I will translate it.\n\n{COMMANDS}"
    )
}

pub fn help() -> String {
    format!("Available commands:\n{COMMANDS}")
}

pub fn ask_word_pair() -> String {
    format!(
        "Send the word and its translation separated by \"{PAIR_DELIMITER}\", \
         for example: cat{PAIR_DELIMITER}кот\n\
         Or send just the word and I will suggest a translation."
    )
}

pub fn ask_edit_pair(word: &str, translation: &str) -> String {
    format!(
        "Editing \"{word}{PAIR_DELIMITER}{translation}\".\n\
         Send the new word and translation separated by \"{PAIR_DELIMITER}\"."
    )
}

pub fn pair_format_reminder() -> String {
    format!("Please use the format: word{PAIR_DELIMITER}translation")
}

pub const ASK_TRANSLATION_QUERY: &str = "Send me a word to translate.";
pub const DICTIONARY_EMPTY: &str = "Your dictionary is empty. Use /add to add a word.";
pub const TRANSLATION_FAILED: &str =
    "Sorry, I could not translate that right now. Please try again later.";
pub const RETRY_LATER: &str = "Something went wrong on our side. Please try again later.";
pub const WORD_NOT_FOUND: &str = "That word is no longer in your dictionary.";
pub const USER_NOT_FOUND: &str = "I don't know you yet. Send /start first.";
pub const CANCELLED: &str = "Cancelled.";
pub const WORD_DELETED: &str = "Word deleted.";

pub const ADD_LABEL: &str = "Add to dictionary";
pub const CONFIRM_LABEL: &str = "Yes, add it";
pub const CANCEL_LABEL: &str = "Cancel";
pub const EDIT_LABEL: &str = "Edit";
pub const DELETE_LABEL: &str = "Delete";

pub fn translation(text: &str) -> String {
    format!("Translation: {text}")
}

pub fn suggest_translation(word: &str, translation: &str) -> String {
    format!("I found a translation: {word}{PAIR_DELIMITER}{translation}\nAdd it to your dictionary?")
}

pub fn pair_translation_failed() -> String {
    format!(
        "I could not find a translation for that word. \
         Send it together with a translation: word{PAIR_DELIMITER}translation"
    )
}

pub fn word_added(word: &str, translation: &str) -> String {
    format!("Added to your dictionary: {word}{PAIR_DELIMITER}{translation}")
}

pub fn word_already_added(word: &str, translation: &str) -> String {
    format!("Already in your dictionary: {word}{PAIR_DELIMITER}{translation}")
}

pub fn word_updated(word: &str, translation: &str) -> String {
    format!("Word updated: {word}{PAIR_DELIMITER}{translation}")
}

pub fn dictionary_entry(word: &str, translation: &str) -> String {
    format!("{word}{PAIR_DELIMITER}{translation}")
}
