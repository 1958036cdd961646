//! Admin console records: users, activity logs, kubeconfigs, API keys.

use serde::{Deserialize, Serialize};

use super::auth::UserRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

/// Body of `POST /admin/users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Admin-visible activity record. Never contains message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub timestamp: String,
    pub action_type: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub classification_type: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kubeconfig {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /admin/kubeconfigs` and `PUT /admin/kubeconfigs/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct NewKubeconfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw kubeconfig YAML.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Server-masked key, e.g. `sk-or-...a1b2`.
    #[serde(default)]
    pub masked_key: Option<String>,
}

/// Body of `POST /admin/api-keys` and `PUT /admin/api-keys/{id}`.
#[derive(Clone, Serialize)]
pub struct NewApiKey {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub key: String,
}

impl std::fmt::Debug for NewApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewApiKey")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of `POST /admin/<kind>/{id}/test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTest {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_record_parses() {
        let json = r#"{
            "id": 2, "username": "carol", "email": "carol@example.com",
            "role": "user", "is_banned": true,
            "created_at": "2024-05-01T12:30:00", "last_login": null
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_banned);
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.last_login, None);
    }

    #[test]
    fn activity_log_parses() {
        let json = r#"{
            "id": 9, "user_id": 2, "username": "carol",
            "timestamp": "2024-05-01T12:30:00", "action_type": "chat",
            "command": "kubectl get pods", "classification_type": "simple_lookup",
            "success": true, "error_message": null
        }"#;
        let log: ActivityLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.action_type, "chat");
        assert_eq!(log.success, Some(true));
    }

    #[test]
    fn new_api_key_debug_redacts_secret() {
        let key = NewApiKey {
            name: "openrouter".into(),
            provider: Some("openrouter".into()),
            key: "sk-or-secret".into(),
        };
        let debug = format!("{key:?}");
        assert!(!debug.contains("sk-or-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn new_kubeconfig_omits_missing_description() {
        let body = NewKubeconfig {
            name: "prod".into(),
            description: None,
            content: "apiVersion: v1".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["content"], "apiVersion: v1");
    }

    #[test]
    fn health_status() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "timestamp": "2024-05-01T12:30:00", "service": "k8s-audit-bot"}"#,
        )
        .unwrap();
        assert!(health.is_healthy());
    }
}
