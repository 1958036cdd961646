use kubechat_api::ApiError;

/// Why a manager operation was rejected or failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a message is still being sent in this session")]
    Busy,

    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("unsaved sessions cannot be renamed; send a message first")]
    TemporarySession,

    #[error("the last saved session cannot be deleted")]
    LastSession,

    #[error("no session with id {0}")]
    UnknownSession(String),

    #[error("no user is signed in")]
    NotInitialized,

    #[error(transparent)]
    Backend(#[from] ApiError),
}

impl SessionError {
    /// Text for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Backend(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
