//! HTTP server: routing, pipeline stages, documentation endpoints, TLS.
//!
//! # Responsibilities
//! - Build the request pipeline as an explicit ordered chain of stages
//!   (documentation, HTTPS redirect, CORS, authorization gate, dispatch).
//! - Inject shared application state (`AppState`) into handlers.
//! - Bind the optional HTTPS listener (rustls).

pub mod docs;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tls;
