//! Request timing middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::{Duration, Instant};

/// Requests taking at least this long are logged as warnings.
///
/// Deep searches legitimately take seconds, so the bar is high.
pub const SLOW_REQUEST: Duration = Duration::from_secs(10);

/// Logs method, path, status and duration of every request.
///
/// Server errors and slow requests are warnings, everything else debug.
pub async fn timing_layer(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed = started.elapsed();
    let elapsed_ms = elapsed.as_millis();
    let status = response.status();

    if status.is_server_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), elapsed_ms, "request failed");
    } else if elapsed >= SLOW_REQUEST {
        tracing::warn!(%method, %path, status = status.as_u16(), elapsed_ms, "slow request");
    } else {
        tracing::debug!(%method, %path, status = status.as_u16(), elapsed_ms, "request completed");
    }

    response
}
