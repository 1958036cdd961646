//! `ConversationManager`: the state container behind the chat console.
//!
//! State lives behind an `RwLock` that is never held across a backend call,
//! so `snapshot()` stays responsive while an operation is suspended. Every
//! failure leaves the session list consistent and is reported twice: as the
//! returned `SessionError` and as the `error` banner of the next snapshot.

mod send;
mod state;


use std::sync::Arc;

use kubechat_api::{ChatInference, SessionStore};
use kubechat_common::EventBus;
use kubechat_config::schema::ChatConfig;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::types::{LoadingFlags, SendSlot, Session, ViewModel};
use state::State;

#[derive(Clone)]
pub struct ConversationManager {
    store: Arc<dyn SessionStore>,
    inference: Arc<dyn ChatInference>,
    settings: ChatConfig,
    events: Option<Arc<EventBus>>,
    state: Arc<RwLock<State>>,
    send_slot: Arc<SendSlot>,
}

impl ConversationManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        inference: Arc<dyn ChatInference>,
        settings: ChatConfig,
    ) -> Self {
        Self {
            store,
            inference,
            settings,
            events: None,
            state: Arc::new(RwLock::new(State::default())),
            send_slot: Arc::default(),
        }
    }

    /// Publish `Event::SessionPromoted` on `events`.
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Copy of the current state for rendering.
    pub async fn snapshot(&self) -> ViewModel {
        let state = self.state.read().await;
        let active = state.active.clone();
        let messages = active
            .as_deref()
            .and_then(|id| state.messages.get(id))
            .cloned()
            .unwrap_or_default();
        let history_loading = active
            .as_deref()
            .is_some_and(|id| state.history_loading(id));

        ViewModel {
            sessions: state.sessions.clone(),
            active_session_id: active,
            messages,
            draft: state.draft.clone(),
            loading: LoadingFlags {
                sessions: state.loading_sessions,
                history: history_loading,
                sending: self.send_slot.target().is_some(),
            },
            error: state.error.clone(),
        }
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.state.write().await.draft = text.into();
    }

    pub async fn dismiss_error(&self) {
        self.state.write().await.error = None;
    }

    /// Load `user_id`'s sessions and activate the most recently active one.
    ///
    /// Always leaves at least one active session behind: with no sessions,
    /// or when the list cannot be fetched, a temporary session is created.
    /// Holds the send slot throughout, so no send runs against the state
    /// being replaced.
    pub async fn initialize(&self, user_id: i64) -> Result<(), SessionError> {
        let Some(_slot) = self.send_slot.acquire() else {
            return Err(self.state.write().await.fail(SessionError::Busy));
        };

        {
            let mut state = self.state.write().await;
            *state = State {
                user_id: Some(user_id),
                loading_sessions: true,
                ..State::default()
            };
        }

        let listed = self.store.list_sessions(user_id).await;

        let to_load = {
            let mut state = self.state.write().await;
            state.loading_sessions = false;
            match listed {
                Err(e) => {
                    state.push_temporary(&self.settings.default_title);
                    return Err(state.fail(e.into()));
                }
                Ok(summaries) if summaries.is_empty() => {
                    state.push_temporary(&self.settings.default_title);
                    info!(user_id, "no saved sessions, started a new one");
                    None
                }
                Ok(summaries) => {
                    state.sessions = summaries
                        .iter()
                        .map(|s| Session::from_summary(s, &self.settings.default_title))
                        .collect();
                    let latest = state.most_recent().map(|s| s.id.clone());
                    state.active = latest.clone();
                    info!(user_id, sessions = state.sessions.len(), "sessions loaded");
                    latest
                }
            }
        };

        match to_load {
            Some(session_id) => self.load_history(user_id, &session_id).await,
            None => Ok(()),
        }
    }

    /// Start a new unsaved session and make it active. Nothing is sent to
    /// the backend until its first message.
    pub async fn create_session(&self) -> Result<String, SessionError> {
        let mut state = self.state.write().await;
        if let Err(e) = state.require_user() {
            return Err(state.fail(e));
        }
        Ok(state.push_temporary(&self.settings.default_title))
    }

    /// Activate `session_id` and, for durable sessions, reload its history.
    pub async fn switch_session(&self, session_id: &str) -> Result<(), SessionError> {
        let (user_id, is_temporary) = {
            let mut state = self.state.write().await;
            let user_id = match state.require_user() {
                Ok(id) => id,
                Err(e) => return Err(state.fail(e)),
            };
            let Some(is_temporary) = state.session(session_id).map(|s| s.is_temporary) else {
                return Err(state.fail(SessionError::UnknownSession(session_id.to_string())));
            };
            state.active = Some(session_id.to_string());
            (user_id, is_temporary)
        };

        debug!(session_id, "switched session");
        if is_temporary {
            return Ok(());
        }
        self.load_history(user_id, session_id).await
    }

    /// Give a durable session a new title.
    pub async fn rename_session(&self, session_id: &str, title: &str) -> Result<(), SessionError> {
        let title = title.trim();
        let user_id = {
            let mut state = self.state.write().await;
            let user_id = match state.require_user() {
                Ok(id) => id,
                Err(e) => return Err(state.fail(e)),
            };
            let rejection = match state.session(session_id) {
                None => Some(SessionError::UnknownSession(session_id.to_string())),
                Some(s) if s.is_temporary => Some(SessionError::TemporarySession),
                Some(_) if title.is_empty() => Some(SessionError::EmptyTitle),
                Some(_) => None,
            };
            if let Some(err) = rejection {
                return Err(state.fail(err));
            }
            user_id
        };

        let result = self.store.rename_session(user_id, session_id, title).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                if let Some(session) = state.session_mut(session_id) {
                    session.title = title.to_string();
                }
                info!(session_id, "session renamed");
                Ok(())
            }
            Err(e) => Err(state.fail(e.into())),
        }
    }

    /// Remove a session. Temporary sessions are dropped locally; the last
    /// durable session cannot be deleted.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), SessionError> {
        let user_id = {
            let mut state = self.state.write().await;
            let user_id = match state.require_user() {
                Ok(id) => id,
                Err(e) => return Err(state.fail(e)),
            };
            let Some(is_temporary) = state.session(session_id).map(|s| s.is_temporary) else {
                return Err(state.fail(SessionError::UnknownSession(session_id.to_string())));
            };
            if self.send_slot.is_sending_into(session_id) {
                return Err(state.fail(SessionError::Busy));
            }
            if is_temporary {
                let next = state.remove(session_id, &self.settings.default_title);
                debug!(session_id, "discarded unsaved session");
                drop(state);
                return self.load_after_removal(user_id, next).await;
            }
            if !state.has_other_durable(session_id) {
                return Err(state.fail(SessionError::LastSession));
            }
            user_id
        };

        let result = self.store.delete_session(user_id, session_id).await;

        let next = {
            let mut state = self.state.write().await;
            if let Err(e) = result {
                return Err(state.fail(e.into()));
            }
            info!(session_id, "session deleted");
            state.remove(session_id, &self.settings.default_title)
        };
        self.load_after_removal(user_id, next).await
    }

    /// History failures after a delete are surfaced on the banner only; the
    /// delete itself succeeded.
    async fn load_after_removal(
        &self,
        user_id: i64,
        next: Option<String>,
    ) -> Result<(), SessionError> {
        if let Some(session_id) = next {
            let _ = self.load_history(user_id, &session_id).await;
        }
        Ok(())
    }

    async fn load_history(&self, user_id: i64, session_id: &str) -> Result<(), SessionError> {
        let started_at = self.state.write().await.begin_history(session_id);

        let fetched = self
            .store
            .fetch_history(user_id, session_id, self.settings.history_limit)
            .await;

        let mut state = self.state.write().await;
        state.finish_history(session_id);
        match fetched {
            Ok(entries) => {
                debug!(session_id, count = entries.len(), "history loaded");
                let sending = self.send_slot.is_sending_into(session_id);
                state.apply_history(session_id, entries, started_at, sending);
                Ok(())
            }
            Err(e) => Err(state.fail(e.into())),
        }
    }
}
