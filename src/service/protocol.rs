//! Wire types for the todo HTTP surface.
//!
//! Request bodies distinguish "field absent" from "field present" with
//! `Option`, which is what lets PATCH update `completed` without touching
//! `title` and vice versa.

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    /// Accepted on the wire but ignored: the server stamps the owner from
    /// the resolved identity.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    /// Accepted on the wire but ignored: ownership is immutable.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdResponse {
    pub user_id: String,
}

/// The deliberately empty `{}` body of a successful delete.
#[derive(Debug, Serialize)]
pub struct EmptyResponse {}
