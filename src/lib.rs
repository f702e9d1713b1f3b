pub mod app;
pub mod cli;
pub mod constants;
pub mod conversation;
pub mod gateway;
pub mod models;
pub mod runtime;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use conversation::{ConversationState, Message, Role};
pub use gateway::{SendError, SessionGateway};
pub use models::{ChatSession, GeminiSession, SessionConfig};
pub use utils::SafeSpaceError;
