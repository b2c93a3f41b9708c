//! HTTP request metrics middleware

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

/// Route label for requests that matched no route. Raw paths are never used
/// as labels so `/?page=N` style probing cannot blow up cardinality.
const UNMATCHED: &str = "unmatched";

/// Per-request metrics:
///
/// - `http_requests_total{method, path, status}`
/// - `http_request_duration_seconds{method, path}`
/// - `http_server_errors_total{path}` for 5xx responses
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED, MatchedPath::as_str)
        .to_owned();

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed().as_secs_f64();

    let status = response.status();
    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "path" => route.clone()
    )
    .record(elapsed);
    if status.is_server_error() {
        metrics::counter!("http_server_errors_total", "path" => route.clone()).increment(1);
    }
    metrics::counter!(
        "http_requests_total",
        "method" => method,
        "path" => route,
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    response
}
