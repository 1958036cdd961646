//! HTTP client for the backend REST surface.
//!
//! Authentication rides on the backend's HttpOnly session cookie, kept in
//! the client's cookie store for the lifetime of the process.

mod admin;
mod auth;
mod sessions;

#[cfg(test)]
mod tests;

pub use admin::ManagedResource;
pub use auth::AuthError;

use std::sync::Arc;
use std::time::Duration;

use kubechat_config::schema::BackendConfig;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::AuthBoundary;
use crate::error::ApiError;

/// Backend REST client.
pub struct BackendClient {
    pub(crate) base_url: Url,
    pub(crate) http: reqwest::Client,
    pub(crate) auth: Option<Arc<AuthBoundary>>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base url {:?}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base url {:?} cannot carry a path",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs.into()))
            .timeout(Duration::from_secs(config.request_timeout_secs.into()))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            http,
            auth: None,
        })
    }

    /// Route authorization failures through `boundary`.
    pub fn with_auth_boundary(mut self, boundary: Arc<AuthBoundary>) -> Self {
        self.auth = Some(boundary);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::Config(format!("base url {} cannot carry a path", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(request, true).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Send a request whose response body we don't need.
    pub(crate) async fn send_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.dispatch(request, true).await.map(|_| ())
    }

    /// Send a request and map non-success statuses to `ApiError`.
    ///
    /// With `report_auth`, 401/403 answers are forwarded to the auth
    /// boundary. Login and signup pass `false`: a rejected password is not
    /// an expired session.
    pub(crate) async fn dispatch(
        &self,
        request: RequestBuilder,
        report_auth: bool,
    ) -> Result<Response, ApiError> {
        let request = request
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build request: {e}")))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "backend request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!(%method, %path, status = status.as_u16(), "backend call failed: {err}");

        if report_auth && err.is_auth_failure() {
            if let Some(auth) = &self.auth {
                auth.handle_auth_failure(status.as_u16());
            }
        }
        Err(err)
    }
}

/// Pull a list out of a response that is either a bare array or an object
/// wrapping the array under `key`.
pub(crate) fn unwrap_list<T: DeserializeOwned>(
    value: serde_json::Value,
    key: &str,
) -> Result<Vec<T>, ApiError> {
    let list = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| ApiError::Parse(format!("response has no `{key}` list")))?,
        other => {
            return Err(ApiError::Parse(format!(
                "expected a list of {key}, got {other}"
            )))
        }
    };
    serde_json::from_value(list).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Pull a record out of a response that either is the record or wraps it
/// under `key`.
pub(crate) fn unwrap_object<T: DeserializeOwned>(
    value: serde_json::Value,
    key: &str,
) -> Result<T, ApiError> {
    let record = match value {
        serde_json::Value::Object(mut map) => match map.remove(key) {
            Some(inner @ serde_json::Value::Object(_)) => inner,
            Some(other) => {
                map.insert(key.to_string(), other);
                serde_json::Value::Object(map)
            }
            None => serde_json::Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(record).map_err(|e| ApiError::Parse(e.to_string()))
}
