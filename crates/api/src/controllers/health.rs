//! Liveness controller.

use axum::{extract::State, routing::get, Json, Router};
use common::protocol::HealthResponse;

use crate::server::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// `GET /health` — liveness check.
///
/// Answers `200 OK` as soon as the server accepts requests; the database
/// context is registered lazily and is not probed here.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        environment: state.environment.to_string(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_ok_and_environment() {
        let app = routes().with_state(AppState::default());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.environment, "development");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }
}
