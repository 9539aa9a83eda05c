use crate::records::WordId;

/// Commands understood regardless of the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    AddWord,
    Dictionary,
    Translate,
    Help,
    Cancel,
}

/// Payload attached to a reply button and echoed back verbatim when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ConfirmAdd { word: String, translation: String },
    Cancel,
    EditWord(WordId),
    DeleteWord(WordId),
}

/// Channel-assigned reference to a message it delivered earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageRef(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    Text(String),
    Action { action: Action, origin: MessageRef },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub label: String,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub actions: Vec<ActionButton>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_action(mut self, label: impl Into<String>, action: Action) -> Self {
        self.actions.push(ActionButton {
            label: label.into(),
            action,
        });
        self
    }
}

/// Instruction for the delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Send(Reply),
    /// Replace the text (and drop the buttons) of an earlier message.
    Edit { target: MessageRef, text: String },
    /// Remove an earlier message, where the channel supports it.
    Remove(MessageRef),
}

impl Outbound {
    pub fn send(text: impl Into<String>) -> Self {
        Self::Send(Reply::text(text))
    }

    /// Text of the message this instruction sends or rewrites.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Send(reply) => Some(&reply.text),
            Self::Edit { text, .. } => Some(text),
            Self::Remove(_) => None,
        }
    }
}
