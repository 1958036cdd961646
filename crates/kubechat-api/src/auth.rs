//! Authentication boundary.
//!
//! Authorization failures from any backend call end up here exactly once:
//! the cached profile is dropped and `Event::SessionExpired` is published
//! for the navigation layer to act on.

use std::sync::Arc;

use kubechat_common::{Event, EventBus, KubechatError};
use tracing::{info, warn};

use crate::profile::ProfileStore;
use crate::types::UserProfile;

pub struct AuthBoundary {
    profile: ProfileStore,
    events: Arc<EventBus>,
}

impl AuthBoundary {
    pub fn new(profile: ProfileStore, events: Arc<EventBus>) -> Self {
        Self { profile, events }
    }

    pub fn profile_store(&self) -> &ProfileStore {
        &self.profile
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// The backend answered 401/403.
    pub fn handle_auth_failure(&self, status: u16) {
        warn!(status, "backend rejected credentials, clearing local session");
        if let Err(e) = self.profile.clear() {
            warn!("failed to clear profile cache: {e}");
        }
        self.events.publish(Event::SessionExpired { status });
    }

    pub fn record_login(&self, profile: &UserProfile) -> Result<(), KubechatError> {
        self.profile.save(profile)?;
        info!(user_id = profile.id, username = %profile.username, "logged in");
        self.events.publish(Event::LoggedIn {
            user_id: profile.id,
            username: profile.username.clone(),
        });
        Ok(())
    }

    pub fn record_logout(&self) -> Result<(), KubechatError> {
        self.profile.clear()?;
        info!("logged out");
        self.events.publish(Event::LoggedOut);
        Ok(())
    }
}
