//! Shared wiring: backend client (with its auth boundary) and event bus.

use std::sync::Arc;

use kubechat_api::{AuthBoundary, BackendClient, ProfileStore, UserProfile};
use kubechat_common::EventBus;
use kubechat_config::KubechatConfig;
use tracing::info;

use crate::error::CliError;
use crate::input::Input;

/// Read the password from here instead of prompting.
pub const PASSWORD_ENV: &str = "KUBECHAT_PASSWORD";

pub struct AppContext {
    pub config: KubechatConfig,
    pub client: Arc<BackendClient>,
    pub events: Arc<EventBus>,
    username: Option<String>,
}

impl AppContext {
    pub fn new(config: KubechatConfig, username: Option<String>) -> Result<Self, CliError> {
        let events = Arc::new(EventBus::default());
        let profile = ProfileStore::default_location()?;
        let auth = Arc::new(AuthBoundary::new(profile, Arc::clone(&events)));
        let client = BackendClient::new(&config.backend)?.with_auth_boundary(auth);
        info!(backend = %client.base_url(), "backend client ready");

        Ok(Self {
            config,
            client: Arc::new(client),
            events,
            username,
        })
    }

    /// Account name given on the command line.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Sign in, prompting for whatever was not supplied up front.
    ///
    /// The session cookie lives in this process only, so every command that
    /// talks to protected endpoints signs in first.
    pub async fn sign_in(&self, input: &mut Input) -> Result<UserProfile, CliError> {
        loop {
            let username = match &self.username {
                Some(name) => name.clone(),
                None => input.required("Username: ").await?,
            };
            let password = match std::env::var(PASSWORD_ENV) {
                Ok(password) if !password.is_empty() => password,
                _ => input.required("Password: ").await?,
            };

            match self.client.login(&username, &password).await {
                Ok(profile) => {
                    println!("Signed in as {} ({})", profile.username, profile.role);
                    return Ok(profile);
                }
                // Only retry when the user can type something different.
                Err(e) if self.username.is_none() && std::env::var(PASSWORD_ENV).is_err() => {
                    println!("{}", sign_in_failure(&e));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Sign in and require the admin role.
    pub async fn sign_in_admin(&self, input: &mut Input) -> Result<UserProfile, CliError> {
        let profile = self.sign_in(input).await?;
        if !profile.is_admin() {
            return Err(CliError::NotAdmin);
        }
        Ok(profile)
    }
}

fn sign_in_failure(err: &kubechat_api::AuthError) -> String {
    match err {
        kubechat_api::AuthError::Api(e) if e.is_auth_failure() => {
            "Invalid username or password.".to_string()
        }
        kubechat_api::AuthError::Api(e) => e.user_message(),
        other => other.to_string(),
    }
}
