use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: i64,
    pub session_id: String,
}

/// A command the backend refused to run, with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCommand {
    pub command: String,
    pub reason: String,
}

/// How the backend classified the question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub question_type: String,
    #[serde(default)]
    pub complexity_score: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Reply to one chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub commands_executed: Vec<String>,
    #[serde(default)]
    pub rejected_commands: Vec<RejectedCommand>,
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub analysis_type: Option<String>,
}

impl ChatReply {
    /// A reply carrying only text.
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            commands_executed: Vec::new(),
            rejected_commands: Vec::new(),
            classification: None,
            analysis_type: None,
        }
    }
}
