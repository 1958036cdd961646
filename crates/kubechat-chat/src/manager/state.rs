//! Synchronous state transitions. Callers hold the write lock; nothing here
//! awaits.

use std::collections::HashMap;

use kubechat_api::HistoryEntry;
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::types::{Message, Role, Session};

#[derive(Debug, Default)]
pub(super) struct State {
    pub user_id: Option<i64>,
    pub sessions: Vec<Session>,
    /// Messages per session id. Only the active session's list is rendered.
    pub messages: HashMap<String, Vec<Message>>,
    pub active: Option<String>,
    pub draft: String,
    pub error: Option<String>,
    pub loading_sessions: bool,
    /// Bumped whenever a send writes into a session's message list.
    pub(super) generations: HashMap<String, u64>,
    /// History fetches still outstanding, per session.
    pub(super) history_pending: HashMap<String, usize>,
}

impl State {
    /// Record `err` for the error banner and hand it back.
    pub fn fail(&mut self, err: SessionError) -> SessionError {
        warn!("{err}");
        self.error = Some(err.user_message());
        err
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn session_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.session(self.active.as_deref()?)
    }

    pub fn require_user(&self) -> Result<i64, SessionError> {
        self.user_id.ok_or(SessionError::NotInitialized)
    }

    /// Prepend a fresh temporary session and make it active.
    pub fn push_temporary(&mut self, title: &str) -> String {
        let session = Session::temporary(title);
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.messages.insert(id.clone(), Vec::new());
        self.active = Some(id.clone());
        debug!(session_id = %id, "temporary session created");
        id
    }

    /// Most recently active session; earlier list entries win ties.
    pub fn most_recent(&self) -> Option<&Session> {
        self.sessions
            .iter()
            .reduce(|best, s| if s.last_activity > best.last_activity { s } else { best })
    }

    /// Swap a temporary session for its durable counterpart, carrying over
    /// its messages and the active marker.
    pub fn promote(&mut self, temporary_id: &str, durable: Session) {
        let durable_id = durable.id.clone();
        match self.sessions.iter().position(|s| s.id == temporary_id) {
            Some(index) => self.sessions[index] = durable,
            None => self.sessions.insert(0, durable),
        }
        let messages = self.messages.remove(temporary_id).unwrap_or_default();
        self.messages.insert(durable_id.clone(), messages);
        if let Some(generation) = self.generations.remove(temporary_id) {
            self.generations.insert(durable_id.clone(), generation);
        }
        if self.active.as_deref() == Some(temporary_id) {
            self.active = Some(durable_id);
        }
    }

    /// Append the user half of a turn. Returns whether it is the session's
    /// first user message.
    pub fn append_user_message(&mut self, session_id: &str, text: &str) -> bool {
        let known_count = self.session(session_id).map_or(0, |s| s.message_count);
        let list = self.messages.entry(session_id.to_string()).or_default();
        let first = known_count == 0 && !list.iter().any(|m| m.role == Role::User);
        list.push(Message::user(text));
        self.bump(session_id);
        first
    }

    /// Append the assistant half of a turn and bump the session bookkeeping.
    pub fn complete_turn(&mut self, session_id: &str, reply: Message) {
        let timestamp = reply.timestamp;
        match self.messages.get_mut(session_id) {
            Some(list) => list.push(reply),
            None => debug!(session_id, "session gone before reply arrived"),
        }
        self.bump(session_id);
        if let Some(session) = self.session_mut(session_id) {
            session.message_count += 2;
            session.last_activity = timestamp;
        }
    }

    fn bump(&mut self, session_id: &str) {
        *self.generations.entry(session_id.to_string()).or_default() += 1;
    }

    /// Register a history fetch for `session_id`. Returns the generation
    /// its result must still match to be installed.
    pub fn begin_history(&mut self, session_id: &str) -> u64 {
        *self
            .history_pending
            .entry(session_id.to_string())
            .or_default() += 1;
        self.generations.get(session_id).copied().unwrap_or_default()
    }

    pub fn finish_history(&mut self, session_id: &str) {
        if let Some(pending) = self.history_pending.get_mut(session_id) {
            *pending -= 1;
            if *pending == 0 {
                self.history_pending.remove(session_id);
            }
        }
    }

    pub fn history_loading(&self, session_id: &str) -> bool {
        self.history_pending.contains_key(session_id)
    }

    /// Install fetched history. Skipped when the session is gone, when a
    /// send is writing into it, or when a send wrote into it after the
    /// fetch started.
    pub fn apply_history(
        &mut self,
        session_id: &str,
        entries: Vec<HistoryEntry>,
        started_at: u64,
        sending: bool,
    ) {
        if self.session(session_id).is_none() {
            debug!(session_id, "discarding history of removed session");
            return;
        }
        if sending {
            debug!(session_id, "keeping local messages while a send is in flight");
            return;
        }
        let current = self.generations.get(session_id).copied().unwrap_or_default();
        if current != started_at {
            debug!(session_id, started_at, current, "discarding stale history");
            return;
        }
        let messages = entries.into_iter().map(Message::from_history).collect();
        self.messages.insert(session_id.to_string(), messages);
    }

    /// Drop a session. If it was active, activate the most recent remaining
    /// one (or a fresh temporary session). Returns the newly active id when
    /// it is durable and its history still needs loading.
    pub fn remove(&mut self, session_id: &str, default_title: &str) -> Option<String> {
        self.sessions.retain(|s| s.id != session_id);
        self.messages.remove(session_id);
        self.generations.remove(session_id);

        if self.active.as_deref() != Some(session_id) {
            if self.sessions.is_empty() {
                self.push_temporary(default_title);
            }
            return None;
        }

        match self.most_recent().map(|s| (s.id.clone(), s.is_temporary)) {
            Some((next, is_temporary)) => {
                self.active = Some(next.clone());
                let loaded = self.messages.contains_key(&next);
                (!is_temporary && !loaded).then_some(next)
            }
            None => {
                self.push_temporary(default_title);
                None
            }
        }
    }

    pub fn has_other_durable(&self, session_id: &str) -> bool {
        self.sessions
            .iter()
            .any(|s| s.id != session_id && !s.is_temporary)
    }
}
