use std::fmt;

use crate::records::{UserId, WordId};

/// What the engine is waiting for from the user.
///
/// Data that only makes sense in one mode lives inside that variant, so an edit
/// target or a pending suggestion cannot outlive the flow that created it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    AwaitingWordPair,
    AwaitingTranslationQuery,
    AwaitingEditPair {
        word_id: WordId,
    },
    ConfirmingSuggestedTranslation {
        word: String,
        translation: String,
    },
}

impl Mode {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingWordPair => "awaiting_word_pair",
            Self::AwaitingTranslationQuery => "awaiting_translation_query",
            Self::AwaitingEditPair { .. } => "awaiting_edit_pair",
            Self::ConfirmingSuggestedTranslation { .. } => "confirming_suggested_translation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSession {
    pub user_id: UserId,
    pub mode: Mode,
}

impl ConversationSession {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            mode: Mode::Idle,
        }
    }

    /// The record a word-pair input will overwrite, if an edit is in progress.
    pub const fn pending_word_id(&self) -> Option<&WordId> {
        match &self.mode {
            Mode::AwaitingEditPair { word_id } => Some(word_id),
            _ => None,
        }
    }

    /// The suggested pair waiting for confirmation.
    pub fn pending_pair(&self) -> Option<(&str, &str)> {
        match &self.mode {
            Mode::ConfirmingSuggestedTranslation { word, translation } => {
                Some((word.as_str(), translation.as_str()))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = ConversationSession::new(UserId::new("alice"));
        assert_eq!(session.mode, Mode::Idle);
        assert!(session.pending_word_id().is_none());
        assert!(session.pending_pair().is_none());
    }

    #[test]
    fn test_pending_data_follows_mode() {
        let session = ConversationSession::new(UserId::new("alice")).with_mode(
            Mode::AwaitingEditPair {
                word_id: WordId::new("7"),
            },
        );
        assert_eq!(session.pending_word_id(), Some(&WordId::new("7")));
        assert!(session.pending_pair().is_none());

        let session = session.with_mode(Mode::ConfirmingSuggestedTranslation {
            word: "cat".to_string(),
            translation: "кот".to_string(),
        });
        assert!(session.pending_word_id().is_none());
        assert_eq!(session.pending_pair(), Some(("cat", "кот")));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(Mode::Idle.to_string(), "idle");
        assert_eq!(
            Mode::AwaitingTranslationQuery.name(),
            "awaiting_translation_query"
        );
    }
}
