//! Wire types exchanged with the backend.
//!
//! The backend is lenient about field names (`session_id` vs `id`,
//! `message` vs `content`) and emits naive ISO-8601 timestamps, so the
//! deserializers here accept every spelling it produces.

mod admin;
mod auth;
mod chat;
mod session;
mod time;

pub use admin::*;
pub use auth::*;
pub use chat::*;
pub use session::*;
pub use time::parse_timestamp;

/// A JSON id that may arrive as a number or a string.
pub(crate) fn id_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
