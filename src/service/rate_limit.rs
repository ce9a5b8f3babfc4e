//! Fixed-window request quota per client address.
//!
//! Each IP gets a fixed number of requests per 15-minute window. The window
//! starts on the first request and resets once it has fully elapsed. The
//! health check path is exempt so uptime probes never starve real clients.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::sync::Mutex;

use crate::state::AppState;

pub const WINDOW: Duration = Duration::from_secs(15 * 60);

struct Window {
    started: Instant,
    count: u32,
}

/// The quota decision for one request. Both arms carry the time left in the
/// caller's window so responses can report when it rolls over.
#[derive(Debug)]
pub enum Outcome {
    Admitted { remaining: u32, reset: Duration },
    Exceeded { reset: Duration },
}

/// Counts requests per client IP over a fixed window. Exceeding the quota
/// yields 429 until the window rolls over.
pub struct RateLimiter {
    max: u32,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(max: u32) -> Self {
        Self {
            max,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> u32 {
        self.max
    }

    /// Admits or rejects one request. Expired windows are dropped on every
    /// call, so the map holds only addresses seen within the current window.
    pub async fn check(&self, ip: IpAddr) -> Outcome {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        windows.retain(|_, window| now.duration_since(window.started) < WINDOW);

        let window = windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        let reset = WINDOW.saturating_sub(now.duration_since(window.started));

        if window.count >= self.max {
            return Outcome::Exceeded { reset };
        }

        window.count += 1;
        Outcome::Admitted {
            remaining: self.max - window.count,
            reset,
        }
    }

    #[cfg(test)]
    pub(crate) async fn backdate(&self, ip: IpAddr, by: Duration) {
        if let Some(window) = self.windows.lock().await.get_mut(&ip) {
            window.started -= by;
        }
    }

    #[cfg(test)]
    pub(crate) async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}

pub async fn enforce_quota(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    match state.limiter.check(addr.ip()).await {
        Outcome::Admitted { remaining, reset } => {
            let mut response = next.run(request).await;
            quota_headers(&mut response, state.limiter.limit(), remaining, reset);
            response
        }
        Outcome::Exceeded { reset } => {
            tracing::warn!("Rate limit exceeded for {}", addr.ip());
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Too many requests from this IP, please try again later."
                })),
            )
                .into_response();
            quota_headers(&mut response, state.limiter.limit(), 0, reset);
            response
        }
    }
}

fn quota_headers(response: &mut Response, limit: u32, remaining: u32, reset: Duration) {
    let headers = response.headers_mut();
    headers.insert("RateLimit-Limit", HeaderValue::from(limit));
    headers.insert("RateLimit-Remaining", HeaderValue::from(remaining));
    headers.insert("RateLimit-Reset", HeaderValue::from(reset.as_secs()));
}
