//! API documentation endpoints: machine-readable schema plus interactive UI.
//!
//! The schema is served at `/swagger/v1/swagger.json` in every environment.
//! The interactive UI mounts at `/swagger` in development and at the
//! application root in production; both render the same document.
//!
//! Documentation routes are registered ahead of the HTTPS redirect stage, so
//! they answer over plain HTTP as well.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use openapiv3::OpenAPI;
use serde_json::json;

use crate::config::Environment;
use super::state::AppState;

/// Title reported in the schema document and the UI page.
pub const API_TITLE: &str = "RH API";

/// Path of the machine-readable schema document.
pub const SCHEMA_PATH: &str = "/swagger/v1/swagger.json";

/// Documentation routes for the given environment.
pub fn routes(environment: Environment) -> Router<AppState> {
    let router = Router::new().route(SCHEMA_PATH, get(schema));
    match environment {
        Environment::Development => router.route("/swagger", get(ui)),
        Environment::Production => router.route("/", get(ui)),
    }
}

/// Describe the API as an OpenAPI 3 document.
///
/// Resource controllers live outside this repository; the document carries
/// the endpoints the bootstrapper itself owns and grows as controllers are
/// registered.
pub fn api_document() -> Result<OpenAPI> {
    serde_json::from_value(json!({
        "openapi": "3.0.3",
        "info": {
            "title": API_TITLE,
            "version": "v1",
            "description": "HR records REST API",
        },
        "paths": {
            "/health": {
                "get": {
                    "summary": "Liveness check",
                    "responses": {
                        "200": { "description": "Service is accepting requests" }
                    }
                }
            }
        }
    }))
    .context("failed to build OpenAPI document")
}

/// Render the schema document to the JSON string served per request.
pub fn render_schema() -> Result<String> {
    let document = api_document()?;
    serde_json::to_string(&document).context("failed to serialise OpenAPI document")
}

/// `GET /swagger/v1/swagger.json` — the machine-readable schema.
async fn schema(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.schema_json.to_string(),
    )
}

/// Interactive documentation UI. A static page that loads Swagger UI and
/// points it at the schema endpoint.
async fn ui() -> Html<&'static str> {
    Html(UI_PAGE)
}

// The page embeds a `"#` sequence (the dom_id selector), so double-hash raw
// string delimiters are required.
const UI_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>RH API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({
      url: "/swagger/v1/swagger.json",
      dom_id: "#swagger-ui",
    });
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_carries_title_and_version() {
        let doc = api_document().unwrap();
        assert_eq!(doc.info.title, API_TITLE);
        assert_eq!(doc.info.version, "v1");
    }

    #[test]
    fn document_lists_the_health_path() {
        let doc = api_document().unwrap();
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn rendered_schema_is_well_formed() {
        let rendered = render_schema().unwrap();
        let reparsed: OpenAPI = serde_json::from_str(&rendered).unwrap();
        assert_eq!(reparsed.openapi, "3.0.3");
    }

    #[test]
    fn ui_page_points_at_the_schema_endpoint() {
        assert!(UI_PAGE.contains(SCHEMA_PATH));
    }
}
