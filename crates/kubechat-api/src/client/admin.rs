//! Admin endpoints. The backend rejects these with 403 for non-admin users.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{unwrap_list, unwrap_object, BackendClient};
use crate::error::ApiError;
use crate::types::{
    ActivityLog, ApiKey, ConnectionTest, HealthStatus, Kubeconfig, NewApiKey, NewKubeconfig,
    NewUser, User,
};

/// Admin-managed resources that share the list/create/update/delete/
/// activate/test endpoint shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedResource {
    Kubeconfigs,
    ApiKeys,
}

impl ManagedResource {
    /// Path segment under `/admin`.
    pub fn path(self) -> &'static str {
        match self {
            ManagedResource::Kubeconfigs => "kubeconfigs",
            ManagedResource::ApiKeys => "api-keys",
        }
    }

    /// Key wrapping list responses.
    fn list_key(self) -> &'static str {
        match self {
            ManagedResource::Kubeconfigs => "kubeconfigs",
            ManagedResource::ApiKeys => "api_keys",
        }
    }

    fn record_key(self) -> &'static str {
        match self {
            ManagedResource::Kubeconfigs => "kubeconfig",
            ManagedResource::ApiKeys => "api_key",
        }
    }
}

#[derive(Serialize)]
struct LogsQuery {
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<i64>,
}

impl BackendClient {
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint(&["admin", "users"])?;
        let body: serde_json::Value = self.send_json(self.http.get(url)).await?;
        unwrap_list(body, "users")
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let url = self.endpoint(&["admin", "users"])?;
        let body: serde_json::Value = self.send_json(self.http.post(url).json(user)).await?;
        unwrap_object(body, "user")
    }

    pub async fn ban_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.user_action(user_id, "ban").await
    }

    pub async fn unban_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.user_action(user_id, "unban").await
    }

    async fn user_action(&self, user_id: i64, action: &str) -> Result<(), ApiError> {
        let id = user_id.to_string();
        let url = self.endpoint(&["admin", "users", &id, action])?;
        self.send_unit(self.http.post(url)).await
    }

    /// Most recent activity, optionally for a single user.
    pub async fn activity_logs(
        &self,
        limit: u32,
        user_id: Option<i64>,
    ) -> Result<Vec<ActivityLog>, ApiError> {
        let url = self.endpoint(&["admin", "logs"])?;
        let request = self.http.get(url).query(&LogsQuery { limit, user_id });
        let body: serde_json::Value = self.send_json(request).await?;
        unwrap_list(body, "logs")
    }

    pub async fn list_kubeconfigs(&self) -> Result<Vec<Kubeconfig>, ApiError> {
        self.list_resources(ManagedResource::Kubeconfigs).await
    }

    pub async fn create_kubeconfig(&self, config: &NewKubeconfig) -> Result<Kubeconfig, ApiError> {
        self.create_resource(ManagedResource::Kubeconfigs, config).await
    }

    pub async fn update_kubeconfig(
        &self,
        id: i64,
        config: &NewKubeconfig,
    ) -> Result<Kubeconfig, ApiError> {
        self.update_resource(ManagedResource::Kubeconfigs, id, config).await
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, ApiError> {
        self.list_resources(ManagedResource::ApiKeys).await
    }

    pub async fn create_api_key(&self, key: &NewApiKey) -> Result<ApiKey, ApiError> {
        self.create_resource(ManagedResource::ApiKeys, key).await
    }

    pub async fn update_api_key(&self, id: i64, key: &NewApiKey) -> Result<ApiKey, ApiError> {
        self.update_resource(ManagedResource::ApiKeys, id, key).await
    }

    pub async fn delete_resource(&self, kind: ManagedResource, id: i64) -> Result<(), ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["admin", kind.path(), &id])?;
        self.send_unit(self.http.delete(url)).await
    }

    /// Make `id` the active resource of its kind.
    pub async fn activate_resource(&self, kind: ManagedResource, id: i64) -> Result<(), ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["admin", kind.path(), &id, "activate"])?;
        self.send_unit(self.http.post(url)).await
    }

    /// Ask the backend to try the resource (cluster reachability for a
    /// kubeconfig, a probe call for an API key).
    pub async fn test_resource(
        &self,
        kind: ManagedResource,
        id: i64,
    ) -> Result<ConnectionTest, ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["admin", kind.path(), &id, "test"])?;
        self.send_json(self.http.post(url)).await
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint(&["health"])?;
        self.send_json(self.http.get(url)).await
    }

    async fn list_resources<T: DeserializeOwned>(
        &self,
        kind: ManagedResource,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(&["admin", kind.path()])?;
        let body: serde_json::Value = self.send_json(self.http.get(url)).await?;
        unwrap_list(body, kind.list_key())
    }

    async fn create_resource<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        kind: ManagedResource,
        record: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(&["admin", kind.path()])?;
        let body: serde_json::Value = self.send_json(self.http.post(url).json(record)).await?;
        unwrap_object(body, kind.record_key())
    }

    async fn update_resource<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        kind: ManagedResource,
        id: i64,
        record: &B,
    ) -> Result<T, ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["admin", kind.path(), &id])?;
        let body: serde_json::Value = self.send_json(self.http.put(url).json(record)).await?;
        unwrap_object(body, kind.record_key())
    }
}
