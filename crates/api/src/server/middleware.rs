//! Pipeline stages applied between the listener and controller dispatch.
//!
//! The order is installed in [`super::router::build`] and is semantically
//! significant: HTTPS redirection runs first, then CORS, then the
//! authorization gate, then dispatch. Documentation routes are mounted
//! outside this chain and answer before the redirect stage.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use common::{protocol::ErrorResponse, ServiceError};
use tower_http::cors::{Any, CorsLayer};

use super::state::AppState;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport scheme a request arrived over.
///
/// The HTTPS accept loop injects `Https` as a request extension; requests
/// without the extension fall back to their forwarding headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionScheme {
    Http,
    Https,
}

/// Maximally permissive cross-origin policy: any origin, any method, any
/// header, on every route. There is no per-route override; tighten this
/// before exposing anything that is not an intentionally public API.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Redirect any request that did not arrive over TLS to its `https://`
/// equivalent with `307 Temporary Redirect`, before any later stage runs.
///
/// A request counts as secure when the accept loop marked it
/// [`ConnectionScheme::Https`] or a terminating proxy set
/// `x-forwarded-proto: https`. A plain request without a `Host` header cannot
/// be redirected and receives `400`.
pub async fn https_redirect(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_secure(&request) {
        return next.run(request).await;
    }

    let Some(host) = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
    else {
        let err =
            ServiceError::BadRequest("cannot redirect to HTTPS without a Host header".into());
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&err))).into_response();
    };

    let host = strip_port(host);
    let path_and_query = request
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str());
    let location = if state.https_port == 443 {
        format!("https://{host}{path_and_query}")
    } else {
        format!("https://{host}:{}{path_and_query}", state.https_port)
    };

    (
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location)],
    )
        .into_response()
}

/// Drop the port from a `Host` header value. Bracketed IPv6 literals keep
/// their brackets; everything after the closing bracket is the port.
fn strip_port(host: &str) -> &str {
    match host.rfind(']') {
        Some(end) => &host[..=end],
        None => host.split(':').next().unwrap_or(host),
    }
}

fn is_secure(request: &Request) -> bool {
    if let Some(scheme) = request.extensions().get::<ConnectionScheme>() {
        return *scheme == ConnectionScheme::Https;
    }
    request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

/// Authorization gate.
///
/// No authentication scheme is registered, so every request passes. The stage
/// stays in the chain so a scheme can start denying requests here without
/// reordering the pipeline.
pub async fn authorize(request: Request, next: Next) -> Response {
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn plain_request() -> Request {
        Request::builder()
            .uri("/api/funcionarios")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn strip_port_handles_named_hosts() {
        assert_eq!(strip_port("api.example.com"), "api.example.com");
        assert_eq!(strip_port("api.example.com:8080"), "api.example.com");
    }

    #[test]
    fn strip_port_keeps_ipv6_brackets() {
        assert_eq!(strip_port("[::1]"), "[::1]");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("[2001:db8::1]:443"), "[2001:db8::1]");
    }

    #[test]
    fn plain_request_is_not_secure() {
        assert!(!is_secure(&plain_request()));
    }

    #[test]
    fn forwarded_proto_marks_request_secure() {
        let req = Request::builder()
            .uri("/api/funcionarios")
            .header("x-forwarded-proto", "HTTPS")
            .body(Body::empty())
            .unwrap();
        assert!(is_secure(&req));
    }

    #[test]
    fn tls_extension_marks_request_secure() {
        let mut req = plain_request();
        req.extensions_mut().insert(ConnectionScheme::Https);
        assert!(is_secure(&req));
    }

    #[test]
    fn explicit_http_extension_wins_over_headers() {
        let mut req = Request::builder()
            .uri("/")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(ConnectionScheme::Http);
        assert!(!is_secure(&req));
    }
}
