//! Session and message records, view-model snapshots, and the send guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use kubechat_api::types::parse_timestamp;
use kubechat_api::{ChatReply, HistoryEntry, SessionSummary};
use kubechat_common::{is_temporary_id, new_id, new_temporary_id};

const UNSAVED_SUFFIX: &str = " (unsaved)";
const ERROR_REPLY_PREFIX: &str = "Sorry, I couldn't process that request: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One message of a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Assistant bubble standing in for a failed chat turn.
    pub is_error: bool,
    /// kubectl commands the backend ran to answer this turn.
    pub commands_executed: Vec<String>,
}

impl Message {
    pub(crate) fn user(text: &str) -> Self {
        Self {
            id: new_id(),
            role: Role::User,
            content: text.to_string(),
            timestamp: Utc::now(),
            is_error: false,
            commands_executed: Vec::new(),
        }
    }

    pub(crate) fn assistant(reply: ChatReply) -> Self {
        Self {
            id: new_id(),
            role: Role::Assistant,
            content: reply.response,
            timestamp: Utc::now(),
            is_error: false,
            commands_executed: reply.commands_executed,
        }
    }

    pub(crate) fn error_reply(reason: &str) -> Self {
        Self {
            id: new_id(),
            role: Role::Assistant,
            content: format!("{ERROR_REPLY_PREFIX}{reason}"),
            timestamp: Utc::now(),
            is_error: true,
            commands_executed: Vec::new(),
        }
    }

    pub(crate) fn from_history(entry: HistoryEntry) -> Self {
        let role = if entry.role.eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Assistant
        };
        Self {
            id: entry.id.unwrap_or_else(new_id),
            role,
            content: entry.content,
            timestamp: entry
                .timestamp
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now),
            is_error: false,
            commands_executed: entry.commands_executed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: u32,
    /// Exists only in client memory until its first send.
    pub is_temporary: bool,
}

impl Session {
    pub(crate) fn temporary(title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: new_temporary_id(),
            title: title.to_string(),
            created_at: now,
            last_activity: now,
            message_count: 0,
            is_temporary: true,
        }
    }

    pub(crate) fn from_summary(summary: &SessionSummary, default_title: &str) -> Self {
        let created_at = summary
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);
        let last_activity = summary
            .last_activity
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(created_at);
        Self {
            id: summary.id.clone(),
            title: summary
                .title
                .clone()
                .unwrap_or_else(|| default_title.to_string()),
            created_at,
            last_activity,
            message_count: summary.message_count,
            is_temporary: is_temporary_id(&summary.id),
        }
    }

    /// Title as shown in the session list.
    pub fn display_title(&self) -> String {
        if self.is_temporary {
            format!("{}{UNSAVED_SUFFIX}", self.title)
        } else {
            self.title.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub sessions: bool,
    /// History of the active session is being fetched.
    pub history: bool,
    pub sending: bool,
}

/// Read-only snapshot for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub sessions: Vec<Session>,
    pub active_session_id: Option<String>,
    /// Messages of the active session, in send order.
    pub messages: Vec<Message>,
    pub draft: String,
    pub loading: LoadingFlags,
    pub error: Option<String>,
}

impl ViewModel {
    pub fn active_session(&self) -> Option<&Session> {
        let id = self.active_session_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }
}

/// Result of `ConversationManager::send_message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The user message and its reply were appended. `reply_failed` marks
    /// an error bubble in place of a real answer.
    Delivered { session_id: String, reply_failed: bool },
    /// Blank input, or another send was still in flight.
    Ignored,
}

/// Tracks the one send allowed at a time and the session it writes into.
#[derive(Debug, Default)]
pub(crate) struct SendSlot {
    busy: AtomicBool,
    target: Mutex<Option<String>>,
}

impl SendSlot {
    /// `None` if the slot is already taken.
    pub(crate) fn acquire(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| BusyGuard { slot: self })
    }

    /// Session a send is currently writing into.
    pub(crate) fn target(&self) -> Option<String> {
        self.lock_target().clone()
    }

    pub(crate) fn is_sending_into(&self, session_id: &str) -> bool {
        self.lock_target().as_deref() == Some(session_id)
    }

    fn lock_target(&self) -> MutexGuard<'_, Option<String>> {
        self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the send slot. Dropping it, including when the send future is
/// cancelled, clears both the target session and the busy flag.
pub(crate) struct BusyGuard<'a> {
    slot: &'a SendSlot,
}

impl BusyGuard<'_> {
    pub(crate) fn set_target(&self, session_id: &str) {
        *self.slot.lock_target() = Some(session_id.to_string());
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.slot.lock_target().take();
        self.slot.busy.store(false, Ordering::Release);
    }
}
