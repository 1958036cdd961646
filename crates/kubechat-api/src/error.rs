//! Backend error taxonomy.

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    #[error("request rejected ({status}): {message}")]
    Validation { status: u16, message: String },

    #[error("not authorized ({0})")]
    Unauthorized(u16),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    /// The client itself is misconfigured (e.g. an unusable base URL).
    #[error("client configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Build the error for a non-success response.
    ///
    /// The backend reports failures as `{"error": ..., "message": ...}`;
    /// `message` is the human-readable part when both are present.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            401 | 403 => ApiError::Unauthorized(status),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            400..=499 => ApiError::Validation { status, message },
            _ => ApiError::Server { status, message },
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Short text suitable for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the server. Check your connection.".into(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Unauthorized(_) => "Your session has expired. Please log in again.".into(),
            ApiError::NotFound(message) | ApiError::Conflict(message) => message.clone(),
            ApiError::Server { .. } => "The server failed to process the request.".into(),
            ApiError::Parse(_) => "The server sent an unexpected response.".into(),
            ApiError::Config(message) => format!("The client is misconfigured: {message}"),
        }
    }
}

fn extract_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(text) = json.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let text: String = body.trim().chars().take(200).collect();
    if text.is_empty() {
        "no details".into()
    } else {
        text
    }
}
