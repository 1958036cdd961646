//! Conversation session manager.
//!
//! Owns the signed-in user's chat sessions, the active session and the
//! per-session message lists. Sessions start out temporary (client memory
//! only) and are promoted to durable backend sessions on their first send.
//! The rendering layer reads `ViewModel` snapshots and mutates state only
//! through `ConversationManager` operations.

mod error;
mod manager;
mod title;
mod types;

pub use error::SessionError;
pub use manager::ConversationManager;
pub use title::derive_title;
pub use types::{LoadingFlags, Message, Role, SendOutcome, Session, ViewModel};
