//! Multi-tenant Todo Service Library
//!
//! A thin HTTP CRUD API over a flat todo record store, where every operation
//! is scoped to an opaque per-client identity. Clients never register or
//! authenticate: the first contact assigns them a durable pseudo-identity,
//! and from then on they only ever see their own records.
//!
//! ## Architecture Modules
//! The service is composed of three loosely coupled subsystems:
//!
//! - **`identity`**: Issues and recognizes per-client identity tokens.
//!   Two server-side strategies (cookie-issued, header-supplied), selected by
//!   configuration and never combined within one deployment.
//! - **`storage`**: The record store contract (`TodoStore`) and its three
//!   interchangeable backends: in-memory, JSON file, and SQLite. Owner
//!   scoping is expressed once in the contract; relational backends push it
//!   into SQL.
//! - **`service`**: The HTTP surface mapping verbs on `/todos` to storage
//!   operations, plus the per-IP request quota.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod config;
pub mod error;
pub mod identity;
pub mod service;
pub mod state;
pub mod storage;

use config::Config;
use identity::middleware::resolve_identity;
use identity::USER_ID_HEADER;
use service::handlers::{
    handle_create_todo, handle_delete_todo, handle_get_todo, handle_health, handle_list_todos,
    handle_patch_todo, handle_replace_todo, handle_user_id,
};
use service::rate_limit::enforce_quota;
use state::AppState;

/// Assembles the full middleware-wrapped router for the given state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handle_health))
        .route("/user-id", get(handle_user_id))
        .route("/todos", get(handle_list_todos).post(handle_create_todo))
        .route(
            "/todos/:id",
            get(handle_get_todo)
                .put(handle_replace_todo)
                .patch(handle_patch_todo)
                .delete(handle_delete_todo),
        )
        .layer(middleware::from_fn_with_state(state.clone(), enforce_quota))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_identity,
        ))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
        .allow_credentials(true)
}

pub async fn start_server() -> anyhow::Result<()> {
    let config = Config::load();

    info!("Initializing state...");
    let state = AppState::new(config)?;

    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    let listener = TcpListener::bind(&address).await?;

    info!(
        "Todo API listening on {address} ({} backend, {} identity)",
        state.config.backend, state.config.identity
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
