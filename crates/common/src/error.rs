//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Unavailable`] → 503
/// - [`ServiceError::Internal`] → 500
///
/// Startup faults (missing connection string, unresolvable service) are not
/// represented here; they abort the process before the server accepts
/// requests and are reported through `anyhow` with context.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed — e.g. a plain-HTTP request that cannot be
    /// redirected because it carries no `Host` header.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No registered controller route matches the request path.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required collaborator (e.g. the relational backend) is temporarily
    /// unreachable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Unavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Unavailable(_) => "service_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::NotFound("x".into()).http_status(), 404);
        assert_eq!(ServiceError::Unavailable("x".into()).http_status(), 503);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ServiceError::BadRequest("x".into()).code(), "bad_request");
        assert_eq!(ServiceError::NotFound("x".into()).code(), "not_found");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("missing Host header".into());
        assert!(e.to_string().contains("missing Host header"));
    }
}
