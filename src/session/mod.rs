//! Per-user conversation state and the store that keeps it between messages.

mod state;
mod store;

pub use state::{ConversationSession, Mode};
pub use store::{EvictionPolicy, SessionStore};
