use kubechat_common::KubechatError;
use tracing::warn;

use super::BackendClient;
use crate::error::ApiError;
use crate::forms::{self, FieldError};
use crate::types::{AuthResponse, LoginBody, SignupBody, UserProfile};

/// Why a login or signup attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid form: {}", join_fields(.0))]
    Form(Vec<FieldError>),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// Signed in, but the profile cache could not be written.
    #[error("failed to cache profile: {0}")]
    Profile(#[from] KubechatError),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl BackendClient {
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        forms::validate_login(username, password).map_err(AuthError::Form)?;

        let url = self.endpoint(&["auth", "login"])?;
        let request = self.http.post(url).json(&LoginBody {
            username: username.trim(),
            password,
        });
        self.finish_auth(request).await
    }

    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        forms::validate_signup(username, email, password).map_err(AuthError::Form)?;

        let url = self.endpoint(&["auth", "signup"])?;
        let request = self.http.post(url).json(&SignupBody {
            username,
            email,
            password,
        });
        self.finish_auth(request).await
    }

    /// End the backend session. The local profile is cleared even when the
    /// backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["auth", "logout"])?;
        let result = self
            .dispatch(self.http.post(url), false)
            .await
            .map(|_| ());

        if let Some(auth) = &self.auth {
            if let Err(e) = auth.record_logout() {
                warn!("failed to clear profile on logout: {e}");
            }
        }
        result
    }

    /// Profile cached by the last successful login, if any.
    pub fn current_user(&self) -> Option<UserProfile> {
        let auth = self.auth.as_ref()?;
        match auth.profile_store().load() {
            Ok(profile) => profile,
            Err(e) => {
                warn!("failed to read profile cache: {e}");
                None
            }
        }
    }

    async fn finish_auth(&self, request: reqwest::RequestBuilder) -> Result<UserProfile, AuthError> {
        let response = self.dispatch(request, false).await?;
        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if let Some(auth) = &self.auth {
            auth.record_login(&body.user)?;
        }
        Ok(body.user)
    }
}
