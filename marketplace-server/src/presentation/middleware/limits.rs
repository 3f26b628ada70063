use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Body-size, timeout and in-flight request limits for the whole router.
pub(crate) fn apply_limits(
    router: Router,
    body_limit_bytes: usize,
    concurrency_limit: usize,
    timeout: Duration,
) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(ConcurrencyLimitLayer::new(concurrency_limit))
}
