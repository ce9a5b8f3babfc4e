//! HTTP side of the data access layer.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use crate::api::{ClientError, Todo, TodoUpdate};
use crate::config::{ClientConfig, IdentityMode};
use crate::identity;

pub struct RemoteApi {
    client: reqwest::Client,
    base_url: String,
    header_token: Option<String>,
}

impl RemoteApi {
    /// Probes the server's health check and resolves the session identity
    /// before the first real request. Both modes persist the token under the
    /// state directory so a new process presents the same identity: header
    /// mode replays it in `x-user-id`, cookie mode re-seeds the jar with it.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let url: reqwest::Url = base_url
            .parse()
            .map_err(|_| ClientError::BadUrl(base_url.clone()))?;

        let jar = Arc::new(reqwest::cookie::Jar::default());
        let saved = identity::saved_token(&config.state_dir)?;
        if config.identity_mode == IdentityMode::Cookie {
            if let Some(token) = &saved {
                identity::seed_cookie(&jar, &url, token);
            }
        }

        let client = reqwest::Client::builder()
            .cookie_provider(jar)
            .build()?;

        client
            .get(format!("{base_url}/health"))
            .send()
            .await?
            .error_for_status()?;

        let header_token = match config.identity_mode {
            IdentityMode::Cookie => {
                if saved.is_none() {
                    // First contact: `/user-id` sets the identity cookie in
                    // the jar; the body carries the token we persist for the
                    // next run.
                    match identity::fetch_issued_token(&client, &base_url).await {
                        Ok(token) => identity::persist_token(&config.state_dir, &token)?,
                        Err(err) => {
                            tracing::warn!("Identity issuance failed, cookie stays session-only: {err}");
                        }
                    }
                }
                None
            }
            IdentityMode::Header => Some(
                identity::resolve_header_token(&client, &base_url, &config.state_dir).await?,
            ),
        };

        Ok(Self {
            client,
            base_url,
            header_token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.header_token {
            builder = builder.header("x-user-id", token);
        }
        builder
    }

    pub async fn get_all(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.request(reqwest::Method::GET, "/todos").send().await?;
        Ok(expect_success(response, None).await?.json().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Todo, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/todos/{id}"))
            .send()
            .await?;
        Ok(expect_success(response, Some(id)).await?.json().await?)
    }

    pub async fn create(&self, title: String) -> Result<Todo, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/todos")
            .json(&json!({ "title": title }))
            .send()
            .await?;
        Ok(expect_success(response, None).await?.json().await?)
    }

    pub async fn update(&self, id: i64, changes: TodoUpdate) -> Result<Todo, ClientError> {
        let response = self
            .request(reqwest::Method::PATCH, &format!("/todos/{id}"))
            .json(&changes)
            .send()
            .await?;
        Ok(expect_success(response, Some(id)).await?.json().await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/todos/{id}"))
            .send()
            .await?;
        expect_success(response, Some(id)).await?;
        Ok(())
    }
}

/// Maps a 404 onto `NotFound` when the operation was about a specific todo,
/// and every other non-2xx status onto `Status` with the response body as
/// the message.
async fn expect_success(
    response: reqwest::Response,
    id: Option<i64>,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(ClientError::NotFound(id));
        }
    }

    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
