//! Shared application state injected into every handler.

use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, Environment};
use crate::db::DbContext;
use super::docs;

/// Application state shared across all request handlers.
///
/// Built once from the immutable startup [`Config`] and threaded explicitly
/// into the pipeline; there are no ambient singletons. All fields are cheaply
/// cloneable so the router can clone the state per request.
#[derive(Clone)]
pub struct AppState {
    /// The single registered database context, consumed by resource controllers.
    pub db: DbContext,
    /// Environment the service runs in; decides the documentation UI mount.
    pub environment: Environment,
    /// Whether documentation endpoints are mounted.
    pub serve_docs: bool,
    /// Port plain-HTTP requests are redirected to.
    pub https_port: u16,
    /// OpenAPI schema document, rendered once at startup.
    pub schema_json: Arc<String>,
}

impl AppState {
    /// Build the state from the registered database context and the startup
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the OpenAPI document cannot be rendered.
    pub fn new(db: DbContext, cfg: &Config) -> Result<Self> {
        let schema_json = docs::render_schema()?;
        Ok(Self {
            db,
            environment: cfg.environment,
            serve_docs: cfg.serve_docs,
            https_port: cfg.https_port,
            schema_json: Arc::new(schema_json),
        })
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] with a lazily-registered local context,
    /// suitable for tests. No connection is ever opened.
    fn default() -> Self {
        let db = DbContext::register("postgres://localhost:5432/rh")
            .expect("well-formed test connection string");
        Self {
            db,
            environment: Environment::Development,
            serve_docs: true,
            https_port: 443,
            schema_json: Arc::new(docs::render_schema().expect("static schema renders")),
        }
    }
}
