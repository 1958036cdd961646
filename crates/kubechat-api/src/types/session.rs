use serde::{Deserialize, Serialize};

use super::id_to_string;

/// A persisted session as listed by `GET /user/sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSessionSummary")]
pub struct SessionSummary {
    pub id: String,
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub last_activity: Option<String>,
    pub message_count: u32,
}

/// The backend's sessions table carries both a numeric row `id` and the
/// string `session_id`; the latter is the one every other endpoint takes.
#[derive(Deserialize)]
struct RawSessionSummary {
    #[serde(default)]
    session_id: Option<serde_json::Value>,
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    started_at: Option<String>,
    #[serde(default)]
    last_activity: Option<String>,
    #[serde(default)]
    last_message: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    message_count: Option<u32>,
}

impl TryFrom<RawSessionSummary> for SessionSummary {
    type Error = String;

    fn try_from(raw: RawSessionSummary) -> Result<Self, Self::Error> {
        let id = raw
            .session_id
            .as_ref()
            .and_then(id_to_string)
            .or_else(|| raw.id.as_ref().and_then(id_to_string))
            .ok_or_else(|| "session has no id".to_string())?;
        Ok(Self {
            id,
            title: raw.title.filter(|t| !t.trim().is_empty()),
            created_at: raw.created_at.or(raw.started_at),
            last_activity: raw.last_activity.or(raw.last_message).or(raw.updated_at),
            message_count: raw.message_count.unwrap_or(0),
        })
    }
}

/// One stored message from `GET /user/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHistoryEntry")]
pub struct HistoryEntry {
    pub id: Option<String>,
    pub role: String,
    pub content: String,
    pub timestamp: Option<String>,
    pub commands_executed: Vec<String>,
}

#[derive(Deserialize)]
struct RawHistoryEntry {
    #[serde(default)]
    id: Option<serde_json::Value>,
    role: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    commands_executed: Option<Vec<String>>,
}

impl TryFrom<RawHistoryEntry> for HistoryEntry {
    type Error = String;

    fn try_from(raw: RawHistoryEntry) -> Result<Self, Self::Error> {
        let content = raw
            .message
            .or(raw.content)
            .ok_or_else(|| "history entry has no message".to_string())?;
        Ok(Self {
            id: raw.id.as_ref().and_then(id_to_string),
            role: raw.role,
            content,
            timestamp: raw.timestamp,
            commands_executed: raw.commands_executed.unwrap_or_default(),
        })
    }
}

/// Body of `POST /user/sessions` and `PUT /user/sessions/{id}`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionTitleBody<'a> {
    pub user_id: i64,
    pub title: &'a str,
}

/// Body of `DELETE /user/sessions/{id}`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UserIdBody {
    pub user_id: i64,
}
