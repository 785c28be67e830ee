//! Request pipeline construction.
//!
//! The pipeline is an ordered chain; each stage may short-circuit before the
//! next one runs:
//! 1. Documentation endpoints (answer even over plain HTTP).
//! 2. HTTPS redirect.
//! 3. CORS.
//! 4. Authorization gate (pass-through; no scheme registered).
//! 5. Controller dispatch, terminal.

use axum::Router;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::controllers;
use super::{docs, middleware, state::AppState};

/// Build the application [`Router`] with all stages attached in order.
pub fn build(state: AppState) -> Router {
    // Stages 2-5 wrap controller dispatch. Layers run outermost-last, so the
    // request passes redirect, then CORS, then the gate, then dispatch.
    let dispatch = controllers::routes()
        .fallback(controllers::not_found)
        .layer(axum::middleware::from_fn(middleware::authorize))
        .layer(middleware::cors())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::https_redirect,
        ));

    // Stage 1 is mounted beside the chain so it answers before the redirect.
    let documentation = if state.serve_docs {
        docs::routes(state.environment)
    } else {
        Router::new()
    };

    documentation
        .merge(dispatch)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .with_state(state)
}
