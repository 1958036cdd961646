use async_trait::async_trait;

use super::{unwrap_list, unwrap_object, BackendClient};
use crate::error::ApiError;
use crate::types::{
    ChatReply, ChatRequest, HistoryEntry, SessionSummary, SessionTitleBody, UserIdBody,
};
use crate::{ChatInference, SessionStore};

#[async_trait]
impl SessionStore for BackendClient {
    async fn list_sessions(&self, user_id: i64) -> Result<Vec<SessionSummary>, ApiError> {
        let url = self.endpoint(&["user", "sessions"])?;
        let request = self.http.get(url).query(&[("user_id", user_id)]);
        let body: serde_json::Value = self.send_json(request).await?;
        unwrap_list(body, "sessions")
    }

    async fn create_session(&self, user_id: i64, title: &str) -> Result<SessionSummary, ApiError> {
        let url = self.endpoint(&["user", "sessions"])?;
        let request = self.http.post(url).json(&SessionTitleBody { user_id, title });
        let body: serde_json::Value = self.send_json(request).await?;
        unwrap_object(body, "session")
    }

    async fn rename_session(
        &self,
        user_id: i64,
        session_id: &str,
        title: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["user", "sessions", session_id])?;
        let request = self.http.put(url).json(&SessionTitleBody { user_id, title });
        self.send_unit(request).await
    }

    async fn delete_session(&self, user_id: i64, session_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["user", "sessions", session_id])?;
        let request = self.http.delete(url).json(&UserIdBody { user_id });
        self.send_unit(request).await
    }

    async fn fetch_history(
        &self,
        user_id: i64,
        session_id: &str,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, ApiError> {
        let url = self.endpoint(&["user", "history"])?;
        let request = self.http.get(url).query(&[
            ("user_id", user_id.to_string()),
            ("session_id", session_id.to_string()),
            ("limit", limit.to_string()),
        ]);
        let body: serde_json::Value = self.send_json(request).await?;
        unwrap_list(body, "history")
    }
}

#[async_trait]
impl ChatInference for BackendClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        let url = self.endpoint(&["chat"])?;
        self.send_json(self.http.post(url).json(request)).await
    }
}
