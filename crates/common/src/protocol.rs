//! Request and response types exchanged over the public HTTP API.
//!
//! Resource payloads belong to the external controllers; only the bodies the
//! bootstrapper itself produces live here.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(e: &ServiceError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status; always `"ok"` once the server is accepting
    /// requests. Readiness of the relational backend is the data layer's
    /// concern, not the bootstrapper's.
    pub status: String,
    /// Environment the service was started in (`"development"` / `"production"`).
    pub environment: String,
    /// Service version from the crate manifest.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("bad_request", "missing Host header");
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("missing Host header"));
    }

    #[test]
    fn error_response_from_service_error() {
        let e = ServiceError::NotFound("no controller route".into());
        let body = ErrorResponse::from(&e);
        assert_eq!(body.code, "not_found");
        assert!(body.message.contains("no controller route"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            environment: "development".into(),
            version: "0.1.0".into(),
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.status, "ok");
        assert_eq!(decoded.environment, "development");
    }
}
