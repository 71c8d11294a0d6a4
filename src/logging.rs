//! Middleware for logging requests and responses.

use std::time::Instant;

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
};

/// Log the method, URI, status and latency of each request.
///
/// Successful responses are logged at the `info` level, client errors at
/// `warn` and server errors at `error`. The body of error responses is
/// included in the log, truncated to [LOG_BODY_LENGTH_LIMIT] bytes.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    tracing::debug!("Received request: {method} {uri}");

    let start = Instant::now();
    let response = next.run(request).await;
    let latency = start.elapsed();
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        tracing::info!("{method} {uri} -> {status} in {latency:?}");
        return response;
    }

    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body for {method} {uri}: {error}");
            return Response::from_parts(parts, Body::empty());
        }
    };
    let body_text = String::from_utf8_lossy(&body_bytes);

    log_error_response(&method, &uri, status, &truncate(&body_text), latency);

    Response::from_parts(parts, Body::from(body_bytes))
}

const LOG_BODY_LENGTH_LIMIT: usize = 256;

fn log_error_response(
    method: &Method,
    uri: &Uri,
    status: StatusCode,
    body: &str,
    latency: std::time::Duration,
) {
    if status.is_server_error() {
        tracing::error!("{method} {uri} -> {status} in {latency:?}\nbody: {body}");
    } else {
        tracing::warn!("{method} {uri} -> {status} in {latency:?}\nbody: {body}");
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return body.to_owned();
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}
