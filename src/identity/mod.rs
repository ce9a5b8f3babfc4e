//! Per-Client Identity
//!
//! Assigns a durable pseudo-identity to otherwise anonymous clients and
//! makes it available to every handler. No credentials are involved: any
//! syntactically opaque token a client presents is accepted as a scoping
//! key, and tokens are never rotated or destroyed.
//!
//! Two server-side strategies exist, selected by configuration:
//!
//! - **Cookie**: the middleware reads a named cookie and issues a UUID-v4
//!   in a long-lived cookie when absent.
//! - **Header**: clients must present the identity header on every request;
//!   tokens are minted only by the `/user-id` issuance endpoint.

pub mod middleware;
pub mod token;


/// Cookie carrying the identity token in cookie-strategy deployments.
pub const USER_ID_COOKIE: &str = "todo-user-id";

/// Header carrying the identity token in header-strategy deployments.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The resolved caller identity, attached to the request as an extension by
/// the middleware and consumed by the CRUD handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);
