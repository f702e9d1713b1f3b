/// Conversation store - Gateway

mod message;
mod store;

pub use message::{Message, MessageId, Role};
pub use store::{ConversationState, PendingSend};
