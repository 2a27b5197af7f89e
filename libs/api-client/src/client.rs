use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ApiClientConfig;
use crate::dto::{
    CreateTaskBody, CreateUserBody, ErrorBody, TaskRecord, UpdateTaskBody, UserRecord,
};
use crate::error::ApiError;
use crate::signal::{AuthSignal, AuthSignalBroadcaster};

/// Typed client for the TaskDeck remote API.
///
/// Every request carries `Content-Type: application/json` and the configured
/// whole-request timeout. Any 401 response, regardless of endpoint,
/// broadcasts [`AuthSignal::SessionExpired`] before the error is returned to
/// the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    auth_signals: AuthSignalBroadcaster,
}

impl ApiClient {
    pub fn new(config: &ApiClientConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("invalid API base URL '{}'", config.base_url))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base,
            auth_signals: AuthSignalBroadcaster::default(),
        })
    }

    /// Receiver for the navigation-to-login side channel.
    pub fn subscribe_auth_signals(&self) -> broadcast::Receiver<AuthSignal> {
        self.auth_signals.subscribe()
    }

    // --- users ---

    /// `GET /users?email=…`. A missing user surfaces as [`ApiError::NotFound`];
    /// translating that into a "does not exist" outcome is the caller's call.
    #[instrument(name = "api.lookup_user", skip(self))]
    pub async fn lookup_user(&self, email: &str) -> Result<UserRecord, ApiError> {
        let mut url = self.endpoint(&["users"])?;
        url.query_pairs_mut().append_pair("email", email);

        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }

    /// `POST /users`.
    #[instrument(name = "api.create_user", skip(self))]
    pub async fn create_user(&self, email: &str) -> Result<UserRecord, ApiError> {
        let url = self.endpoint(&["users"])?;
        let body = CreateUserBody {
            email: email.to_string(),
        };

        let response = self.send(self.http.post(url).json(&body)).await?;
        Self::decode(response).await
    }

    // --- tasks ---

    /// `GET /tasks?userId=…[&completed=…]`.
    #[instrument(name = "api.list_tasks", skip(self))]
    pub async fn list_tasks(
        &self,
        user_id: &str,
        completed: Option<bool>,
    ) -> Result<Vec<TaskRecord>, ApiError> {
        let mut url = self.endpoint(&["tasks"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("userId", user_id);
            if let Some(completed) = completed {
                query.append_pair("completed", if completed { "true" } else { "false" });
            }
        }

        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }

    /// `GET /tasks/{id}`.
    #[instrument(name = "api.get_task", skip(self))]
    pub async fn get_task(&self, id: &str) -> Result<TaskRecord, ApiError> {
        let url = self.endpoint(&["tasks", id])?;
        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }

    /// `POST /tasks`.
    #[instrument(name = "api.create_task", skip(self, body), fields(user_id = %body.user_id))]
    pub async fn create_task(&self, body: &CreateTaskBody) -> Result<TaskRecord, ApiError> {
        let url = self.endpoint(&["tasks"])?;
        let response = self.send(self.http.post(url).json(body)).await?;
        Self::decode(response).await
    }

    /// `PUT /tasks/{id}` with a partial body.
    #[instrument(name = "api.update_task", skip(self, body))]
    pub async fn update_task(&self, id: &str, body: &UpdateTaskBody) -> Result<TaskRecord, ApiError> {
        let url = self.endpoint(&["tasks", id])?;
        let response = self.send(self.http.put(url).json(body)).await?;
        Self::decode(response).await
    }

    /// `DELETE /tasks/{id}`.
    #[instrument(name = "api.delete_task", skip(self))]
    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["tasks", id])?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    // --- plumbing ---

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::unknown("API base URL cannot be a base"))?
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.auth_signals.send(AuthSignal::SessionExpired);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        debug!(status = status.as_u16(), "request failed");
        Err(ApiError::from_status(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::unknown(format!("invalid response body: {e}")))
    }
}
