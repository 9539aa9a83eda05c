use std::collections::BTreeMap;

use crate::dialogue::{Action, Inbound, MessageRef, Outbound};

/// A button as shown on screen: the number to type after `#` and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedButton {
    pub number: usize,
    pub label: String,
}

/// What the terminal should print for one outbound instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Sent {
        id: MessageRef,
        text: String,
        buttons: Vec<NumberedButton>,
    },
    Edited {
        id: MessageRef,
        before: String,
        text: String,
    },
    Removed {
        id: MessageRef,
        text: String,
    },
    /// The engine referred to a message this transcript never delivered.
    Unknown(MessageRef),
}

#[derive(Debug)]
struct Delivered {
    text: String,
    buttons: Vec<usize>,
}

/// Bot messages delivered to the terminal, with their live buttons.
///
/// Only messages that still carry buttons are remembered; an edit or removal
/// retires them. Messages are numbered from 1 in delivery order. Button numbers keep
/// increasing across messages so an old number never points at a new button.
#[derive(Debug, Default)]
pub struct Transcript {
    next_message: u64,
    next_button: usize,
    messages: BTreeMap<MessageRef, Delivered>,
    buttons: BTreeMap<usize, (MessageRef, Action)>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one outbound instruction and describes how to show it.
    pub fn apply(&mut self, outbound: Outbound) -> Rendered {
        match outbound {
            Outbound::Send(reply) => {
                self.next_message += 1;
                let id = MessageRef(self.next_message);

                let mut shown = Vec::with_capacity(reply.actions.len());
                for button in reply.actions {
                    self.next_button += 1;
                    self.buttons.insert(self.next_button, (id, button.action));
                    shown.push(NumberedButton {
                        number: self.next_button,
                        label: button.label,
                    });
                }

                // Only a pressed button makes the engine refer back to a message.
                if !shown.is_empty() {
                    self.messages.insert(
                        id,
                        Delivered {
                            text: reply.text.clone(),
                            buttons: shown.iter().map(|b| b.number).collect(),
                        },
                    );
                }
                Rendered::Sent {
                    id,
                    text: reply.text,
                    buttons: shown,
                }
            }
            Outbound::Edit { target, text } => {
                let Some(message) = self.messages.remove(&target) else {
                    return Rendered::Unknown(target);
                };
                self.forget_buttons(&message.buttons);
                Rendered::Edited {
                    id: target,
                    before: message.text,
                    text,
                }
            }
            Outbound::Remove(target) => {
                let Some(message) = self.messages.remove(&target) else {
                    return Rendered::Unknown(target);
                };
                self.forget_buttons(&message.buttons);
                Rendered::Removed {
                    id: target,
                    text: message.text,
                }
            }
        }
    }

    /// The inbound message produced by pressing button `number`, if it is still live.
    pub fn press(&self, number: usize) -> Option<Inbound> {
        self.buttons
            .get(&number)
            .map(|(origin, action)| Inbound::Action {
                action: action.clone(),
                origin: *origin,
            })
    }

    pub fn live_buttons(&self) -> usize {
        self.buttons.len()
    }

    fn forget_buttons(&mut self, numbers: &[usize]) {
        for number in numbers {
            self.buttons.remove(number);
        }
    }
}
