//! Chat panel state: message log plus the controller that forwards
//! questions to the backend.

pub mod session;

pub use session::{ChatController, ChatMessage, ChatSession, Role, FALLBACK_REPLY};
