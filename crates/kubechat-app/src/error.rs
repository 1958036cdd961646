use kubechat_api::{ApiError, AuthError};
use kubechat_chat::SessionError;
use kubechat_common::{ConfigError, KubechatError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Local(#[from] KubechatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("admin role required")]
    NotAdmin,

    #[error("backend reports status {0:?}")]
    Unhealthy(String),

    #[error("input closed")]
    InputClosed,
}

impl CliError {
    /// Text shown to the user on exit.
    pub fn user_message(&self) -> String {
        match self {
            CliError::Api(e) | CliError::Auth(AuthError::Api(e)) => e.user_message(),
            CliError::Session(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
