//! The session-level data access layer.
//!
//! `TodoApi::connect` decides once whether this session is remote or local:
//! when the server is wanted and its health check answers, everything goes
//! over HTTP; otherwise the JSON file store takes over. There is no
//! per-operation failover, so a session never sees half its writes on each
//! side.

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::local::LocalApi;
use crate::remote::RemoteApi;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub user_id: String,
}

/// Partial update; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TodoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("todo {0} not found")]
    NotFound(i64),
    #[error("invalid base url: {0}")]
    BadUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("stored todo data is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub enum TodoApi {
    Remote(RemoteApi),
    Local(LocalApi),
}

impl TodoApi {
    /// Picks the side for this session. A wanted-but-unreachable server logs
    /// a warning and degrades to the local store rather than failing.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        if config.use_server {
            match RemoteApi::connect(config).await {
                Ok(remote) => return Ok(Self::Remote(remote)),
                Err(err) => {
                    tracing::warn!("Server unreachable, using the local store: {err}");
                }
            }
        }

        Ok(Self::Local(LocalApi::open(&config.state_dir)?))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub async fn get_all(&self) -> Result<Vec<Todo>, ClientError> {
        match self {
            Self::Remote(api) => api.get_all().await,
            Self::Local(api) => api.get_all(),
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Todo, ClientError> {
        match self {
            Self::Remote(api) => api.get_by_id(id).await,
            Self::Local(api) => api.get_by_id(id),
        }
    }

    pub async fn create(&self, title: String) -> Result<Todo, ClientError> {
        match self {
            Self::Remote(api) => api.create(title).await,
            Self::Local(api) => api.create(title),
        }
    }

    pub async fn update(&self, id: i64, changes: TodoUpdate) -> Result<Todo, ClientError> {
        match self {
            Self::Remote(api) => api.update(id, changes).await,
            Self::Local(api) => api.update(id, changes),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        match self {
            Self::Remote(api) => api.delete(id).await,
            Self::Local(api) => api.delete(id),
        }
    }
}
