//! Rate limiting and request logging middleware.
//!
//! Requests are limited per client IP with a keyed governor limiter. The
//! client IP comes from the connection's peer address, so the server must
//! be served with `into_make_service_with_connect_info::<SocketAddr>()`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    DefaultKeyedRateLimiter, Quota, RateLimiter,
    clock::{Clock, DefaultClock},
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ErrorResponse;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Per-IP rate limiter.
pub type SharedRateLimiter = Arc<DefaultKeyedRateLimiter<IpAddr>>;

/// How often stale limiter entries are pruned.
pub const LIMITER_HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(60);

// ─────────────────────────────────────────────────────────────────────────────
// Rate Limiter Factory
// ─────────────────────────────────────────────────────────────────────────────

/// Create a per-IP rate limiter.
///
/// Zero values fall back to one request per minute and a burst of one.
pub fn create_rate_limiter(requests_per_minute: u32, burst: u32) -> SharedRateLimiter {
    let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
    let quota = Quota::per_minute(rpm).allow_burst(burst);
    Arc::new(RateLimiter::keyed(quota))
}

/// Periodically drop limiter state for clients that have gone quiet.
pub fn spawn_limiter_housekeeping(
    limiter: SharedRateLimiter,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LIMITER_HOUSEKEEPING_INTERVAL);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    limiter.retain_recent();
                    limiter.shrink_to_fit();
                    tracing::trace!(tracked = limiter.len(), "Pruned rate limiter state");
                }
            }
        }
    })
}

/// Peer IP of the request, or the unspecified address when unknown.
pub fn client_ip(request: &Request<Body>) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

// ─────────────────────────────────────────────────────────────────────────────
// Middleware
// ─────────────────────────────────────────────────────────────────────────────

/// Per-IP rate limiting middleware.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.rate_limiting {
        return next.run(request).await;
    }

    let ip = client_ip(&request);

    match state.limiter.check_key(&ip) {
        Ok(_) => next.run(request).await,
        Err(not_until) => {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            let retry_after = wait.as_secs().max(1);

            tracing::warn!(
                client = %ip,
                path = %request.uri().path(),
                retry_after_seconds = retry_after,
                "Rate limit exceeded"
            );

            (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", retry_after.to_string())],
                Json(ErrorResponse {
                    error: "rate limit exceeded".to_string(),
                }),
            )
                .into_response()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request Logging
// ─────────────────────────────────────────────────────────────────────────────

/// Structured request logging middleware.
///
/// Logs method, path, client, status and duration for every request.
pub async fn request_logging_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.request_logging {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_ip(&request);

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            client = %client,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            client = %client,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            client = %client,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use axum::{Router, middleware, routing::get};
    use gambit_session::{SessionStore, StoreConfig};
    use tower::ServiceExt;

    fn create_test_state(rate_limiting: bool, burst: u32) -> AppState {
        let config = ServerConfig::new()
            .with_rate_limiting(rate_limiting)
            .with_api_rpm(1)
            .with_rate_limit_burst(burst);
        AppState::new(SessionStore::new(StoreConfig::default()), config)
    }

    async fn test_handler() -> &'static str {
        "ok"
    }

    fn create_test_router(state: AppState) -> Router {
        Router::new()
            .route("/test", get(test_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_middleware,
            ))
            .with_state(state)
    }

    fn request_from(ip: [u8; 4]) -> Request<Body> {
        let mut request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
        request
    }

    #[tokio::test]
    async fn test_rate_limit_disabled() {
        let app = create_test_router(create_test_state(false, 1));

        for _ in 0..10 {
            let response = app.clone().oneshot(request_from([10, 0, 0, 1])).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_after_burst() {
        let app = create_test_router(create_test_state(true, 2));

        for _ in 0..2 {
            let response = app.clone().oneshot(request_from([10, 0, 0, 1])).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(request_from([10, 0, 0, 1])).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("Retry-After"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "rate limit exceeded");
    }

    #[tokio::test]
    async fn test_rate_limit_is_per_ip() {
        let app = create_test_router(create_test_state(true, 1));

        let first = app.clone().oneshot(request_from([10, 0, 0, 1])).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let limited = app.clone().oneshot(request_from([10, 0, 0, 1])).await.unwrap();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);

        let other = app.oneshot(request_from([10, 0, 0, 2])).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[test]
    fn test_create_rate_limiter_zero_values() {
        let limiter = create_rate_limiter(0, 0);
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(limiter.check_key(&ip).is_ok());
        assert!(limiter.check_key(&ip).is_err());
    }

    #[test]
    fn test_client_ip_fallback() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(client_ip(&request), IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        assert_eq!(
            client_ip(&request_from([192, 168, 1, 7])),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 7))
        );
    }
}
