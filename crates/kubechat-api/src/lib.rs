//! REST client for the Kubernetes-assistant backend.
//!
//! Provides:
//! - The `SessionStore` and `ChatInference` seams the conversation manager
//!   talks to, plus `BackendClient`, which implements both over HTTP
//! - Auth endpoints (login / signup / logout) and admin endpoints
//! - `AuthBoundary`: the one place authorization failures are handled
//! - `ProfileStore`: the on-disk cache of non-sensitive profile fields

pub mod auth;
pub mod client;
pub mod error;
pub mod forms;
pub mod profile;
pub mod types;

use async_trait::async_trait;

pub use auth::AuthBoundary;
pub use client::{AuthError, BackendClient, ManagedResource};
pub use error::ApiError;
pub use profile::ProfileStore;
pub use types::{
    ActivityLog, ApiKey, ChatReply, ChatRequest, Classification, ConnectionTest, HealthStatus,
    HistoryEntry, Kubeconfig, NewApiKey, NewKubeconfig, NewUser, RejectedCommand, SessionSummary,
    User, UserProfile, UserRole,
};

/// Durable session persistence owned by the backend.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Sessions for a user, most recently active first.
    async fn list_sessions(&self, user_id: i64) -> Result<Vec<SessionSummary>, ApiError>;

    /// Persist a new session; the backend assigns its id.
    async fn create_session(&self, user_id: i64, title: &str) -> Result<SessionSummary, ApiError>;

    async fn rename_session(
        &self,
        user_id: i64,
        session_id: &str,
        title: &str,
    ) -> Result<(), ApiError>;

    async fn delete_session(&self, user_id: i64, session_id: &str) -> Result<(), ApiError>;

    /// Messages of one session in send order.
    async fn fetch_history(
        &self,
        user_id: i64,
        session_id: &str,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, ApiError>;
}

/// One conversational turn against the assistant.
#[async_trait]
pub trait ChatInference: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;
}
