use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single todo record.
///
/// `id` is unique within one backend's full record set (not per owner) and
/// assigned monotonically from 1. `user_id` is stamped at creation and never
/// altered afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub user_id: String,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt todo document: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}
