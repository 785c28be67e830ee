//! Controller registration and dispatch.
//!
//! Each controller contributes a sub-router that is merged into the terminal
//! dispatch stage of the pipeline. Resource controllers (the CRUD surface of
//! the API) live outside this repository and merge here as they are added;
//! they receive the registered [`crate::db::DbContext`] through the shared
//! application state.

pub mod health;

use axum::{http::StatusCode, response::IntoResponse, Json, Router};
use common::{protocol::ErrorResponse, ServiceError};

use crate::server::state::AppState;

/// Collect every registered controller into the dispatch router.
pub fn routes() -> Router<AppState> {
    Router::new().merge(health::routes())
}

/// Terminal handler for requests no controller route matches.
pub async fn not_found() -> impl IntoResponse {
    let err = ServiceError::NotFound("the requested resource does not exist".into());
    (StatusCode::NOT_FOUND, Json(ErrorResponse::from(&err)))
}
