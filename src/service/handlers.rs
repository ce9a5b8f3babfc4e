use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::protocol::{
    CreateTodoRequest, EmptyResponse, HealthResponse, UpdateTodoRequest, UserIdResponse,
};
use crate::error::ApiError;
use crate::identity::{token, UserId};
use crate::state::AppState;
use crate::storage::backend::TodoChanges;
use crate::storage::types::Todo;

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Reports the caller's identity.
///
/// In cookie deployments the middleware has already resolved (or issued) it.
/// In header deployments this is the issuance endpoint: a caller without a
/// token gets a fresh one minted here and persists it itself.
pub async fn handle_user_id(user_id: Option<Extension<UserId>>) -> Json<UserIdResponse> {
    let user_id = match user_id {
        Some(Extension(UserId(id))) => id,
        None => {
            let token = token::new_token();
            tracing::info!("Issued user id {token} via issuance endpoint");
            token
        }
    };

    Json(UserIdResponse { user_id })
}

pub async fn handle_list_todos(
    State(state): State<Arc<AppState>>,
    Extension(UserId(owner)): Extension<UserId>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.store.list_owned(&owner).await?))
}

pub async fn handle_get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Extension(UserId(owner)): Extension<UserId>,
) -> Result<Json<Todo>, ApiError> {
    state
        .store
        .find_owned(id, &owner)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn handle_create_todo(
    State(state): State<Arc<AppState>>,
    Extension(UserId(owner)): Extension<UserId>,
    Json(request): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let title = request.title.unwrap_or_default();
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required"));
    }

    // The owner comes from the resolved identity; any client-supplied owner
    // field in the body is ignored.
    let todo = state
        .store
        .insert(title, request.completed.unwrap_or(false), owner)
        .await?;

    tracing::info!("Created todo {} for {}", todo.id, todo.user_id);
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT: full replace, where fields missing from the body keep their stored
/// values. Behaviorally this merges exactly like PATCH; the verb exists so
/// clients can express intent.
pub async fn handle_replace_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Extension(UserId(owner)): Extension<UserId>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    update_todo(&state, id, &owner, request).await
}

/// PATCH: each field applied only when present, independent of the other.
pub async fn handle_patch_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Extension(UserId(owner)): Extension<UserId>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    update_todo(&state, id, &owner, request).await
}

pub async fn handle_delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Extension(UserId(owner)): Extension<UserId>,
) -> Result<Json<EmptyResponse>, ApiError> {
    if state.store.delete(id, &owner).await? {
        Ok(Json(EmptyResponse {}))
    } else {
        Err(ApiError::NotFound)
    }
}

async fn update_todo(
    state: &AppState,
    id: i64,
    owner: &str,
    request: UpdateTodoRequest,
) -> Result<Json<Todo>, ApiError> {
    let changes = validated_changes(state, request)?;

    state
        .store
        .update(id, owner, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

fn validated_changes(
    state: &AppState,
    request: UpdateTodoRequest,
) -> Result<TodoChanges, ApiError> {
    if let Some(title) = &request.title {
        if title.is_empty() && !state.config.allow_empty_title_update {
            return Err(ApiError::Validation("Title must not be empty"));
        }
    }

    Ok(TodoChanges {
        title: request.title,
        completed: request.completed,
    })
}
