use kubechat_api::ChatRequest;
use kubechat_common::Event;
use tracing::{info, warn};

use super::ConversationManager;
use crate::error::SessionError;
use crate::title::derive_title;
use crate::types::{BusyGuard, Message, SendOutcome, Session};

impl ConversationManager {
    /// Send one chat turn in the active session.
    ///
    /// A temporary session is promoted first; if that fails nothing is
    /// appended. Otherwise the user message is shown immediately and the
    /// reply (or an error bubble) follows it. The first turn of a session
    /// also renames it after the message.
    ///
    /// Dropping the future part way releases the session for other
    /// operations; a turn cut short that way keeps its user message but
    /// gets no reply until the history is reloaded.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        let Some(guard) = self.send_slot.acquire() else {
            info!("send already in flight, ignoring");
            return Ok(SendOutcome::Ignored);
        };

        let (user_id, active_id, is_temporary) = {
            let mut state = self.state.write().await;
            let user_id = match state.require_user() {
                Ok(id) => id,
                Err(e) => return Err(state.fail(e)),
            };
            let Some((id, is_temporary)) = state
                .active_session()
                .map(|s| (s.id.clone(), s.is_temporary))
            else {
                return Err(state.fail(SessionError::NotInitialized));
            };
            guard.set_target(&id);
            (user_id, id, is_temporary)
        };

        let session_id = if is_temporary {
            match self.promote(user_id, &active_id, &guard).await {
                Ok(id) => id,
                Err(e) => return Err(self.state.write().await.fail(e)),
            }
        } else {
            active_id
        };

        let first_turn = {
            let mut state = self.state.write().await;
            let first = state.append_user_message(&session_id, text);
            state.draft.clear();
            first
        };

        info!(%session_id, user_id, "sending chat turn");
        let request = ChatRequest {
            message: text.to_string(),
            user_id,
            session_id: session_id.clone(),
        };
        let (reply, reply_failed) = match self.inference.send_chat(&request).await {
            Ok(reply) => (Message::assistant(reply), false),
            Err(e) => {
                warn!(%session_id, "chat turn failed: {e}");
                (Message::error_reply(&e.user_message()), true)
            }
        };
        self.state.write().await.complete_turn(&session_id, reply);

        if first_turn {
            self.apply_derived_title(user_id, &session_id, text).await;
        }

        Ok(SendOutcome::Delivered {
            session_id,
            reply_failed,
        })
    }

    /// Persist a temporary session and swap it for the durable one.
    async fn promote(
        &self,
        user_id: i64,
        temporary_id: &str,
        guard: &BusyGuard<'_>,
    ) -> Result<String, SessionError> {
        let summary = self
            .store
            .create_session(user_id, &self.settings.default_title)
            .await?;
        let durable = Session::from_summary(&summary, &self.settings.default_title);
        let session_id = durable.id.clone();

        {
            let mut state = self.state.write().await;
            state.promote(temporary_id, durable);
            guard.set_target(&session_id);
        }
        info!(temporary_id, %session_id, "session promoted");

        if let Some(events) = &self.events {
            events.publish(Event::SessionPromoted {
                temporary_id: temporary_id.to_string(),
                session_id: session_id.clone(),
            });
        }
        Ok(session_id)
    }

    /// Title a session after its first message. Failures keep the old title.
    async fn apply_derived_title(&self, user_id: i64, session_id: &str, text: &str) {
        let title = derive_title(
            text,
            self.settings.title_max_chars as usize,
            self.settings.title_word_slack as usize,
        );
        match self.store.rename_session(user_id, session_id, &title).await {
            Ok(()) => {
                if let Some(session) = self.state.write().await.session_mut(session_id) {
                    session.title = title;
                }
            }
            Err(e) => warn!(session_id, "failed to set derived title: {e}"),
        }
    }
}
