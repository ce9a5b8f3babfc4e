use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::{token, UserId, USER_ID_COOKIE, USER_ID_HEADER};
use crate::config::IdentityStrategy;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the caller identity per the configured strategy and attaches it
/// to the request extensions.
///
/// `/health` never participates. In header deployments `/user-id` is the
/// issuance endpoint and passes through unresolved; everything else without
/// the identity header is rejected with 401.
pub async fn resolve_identity(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if path == "/health" {
        return next.run(request).await;
    }

    match state.config.identity {
        IdentityStrategy::Cookie => {
            if let Some(cookie) = jar.get(USER_ID_COOKIE) {
                request
                    .extensions_mut()
                    .insert(UserId(cookie.value().to_string()));
                return next.run(request).await;
            }

            let token = token::new_token();
            tracing::info!("Issued new user id {token}");
            request.extensions_mut().insert(UserId(token.clone()));

            let jar = jar.add(identity_cookie(token, state.config.production));
            (jar, next.run(request).await).into_response()
        }
        IdentityStrategy::Header => {
            let supplied = request
                .headers()
                .get(USER_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            match supplied {
                Some(user_id) => {
                    request.extensions_mut().insert(UserId(user_id));
                    next.run(request).await
                }
                None if path == "/user-id" => next.run(request).await,
                None => ApiError::Unauthenticated.into_response(),
            }
        }
    }
}

/// The long-lived identity cookie: 30 days, HttpOnly. Production deployments
/// serve cross-site, so they need `Secure` plus `SameSite=None`; elsewhere
/// `Lax` keeps cross-site requests out.
pub fn identity_cookie(token: String, production: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(USER_ID_COOKIE, token);
    cookie.set_max_age(time::Duration::days(30));
    cookie.set_http_only(true);
    cookie.set_path("/");

    if production {
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::None);
    } else {
        cookie.set_same_site(SameSite::Lax);
    }

    cookie
}
