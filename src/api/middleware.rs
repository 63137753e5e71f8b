//! Request middleware: fixed-window rate limiting and security headers.

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use super::server::AppState;

/// Requests allowed per client IP per window.
const MAX_REQUESTS_PER_WINDOW: u32 = 100;

/// Fixed-window length.
const WINDOW: Duration = Duration::from_secs(15 * 60);

struct Window {
    started: Instant,
    count: u32,
}

/// Per-IP fixed-window request counter.
///
/// Windows reset lazily on the next request after expiry; an idle IP's stale
/// window is replaced rather than swept.
#[derive(Default)]
pub struct RateLimiter {
    windows: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request from `ip`; `false` means over budget.
    pub fn allow(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut window = self.windows.entry(ip).or_insert_with(|| Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= WINDOW {
            window.started = now;
            window.count = 0;
        }
        window.count += 1;
        window.count <= MAX_REQUESTS_PER_WINDOW
    }
}

/// Reject clients that exceed the per-IP request budget with 429.
///
/// Requests without a peer address (in-process test calls) bypass the
/// limiter; the server always runs with connect info attached.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let peer_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    if let Some(ip) = peer_ip {
        if !state.rate_limiter.allow(ip) {
            warn!(%ip, "rate limit exceeded");
            return Err(StatusCode::TOO_MANY_REQUESTS);
        }
    }
    Ok(next.run(request).await)
}

/// Attach baseline security headers to every response.
pub async fn security_headers_middleware(
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_up_to_budget() {
        let limiter = RateLimiter::new();
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        for _ in 0..MAX_REQUESTS_PER_WINDOW {
            assert!(limiter.allow(ip));
        }
        assert!(!limiter.allow(ip));
    }

    #[test]
    fn test_rate_limiter_tracks_ips_independently() {
        let limiter = RateLimiter::new();
        let first: IpAddr = "10.0.0.1".parse().unwrap();
        let second: IpAddr = "10.0.0.2".parse().unwrap();
        for _ in 0..=MAX_REQUESTS_PER_WINDOW {
            limiter.allow(first);
        }
        assert!(!limiter.allow(first));
        assert!(limiter.allow(second));
    }
}
