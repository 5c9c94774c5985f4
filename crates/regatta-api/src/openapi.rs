//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Regatta Documents API",
        version = "0.1.0",
        description = "Notice of Race and Sailing Instructions generator for race committees: rule catalog, owner-scoped documents, preview and Markdown export.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Documents
        crate::routes::documents::list_documents,
        crate::routes::documents::create_document,
        crate::routes::documents::get_document,
        crate::routes::documents::update_document,
        crate::routes::documents::delete_document,
        crate::routes::documents::preview_document,
        crate::routes::documents::export_document,
        crate::routes::documents::preview_payload,
        // Rules
        crate::routes::rules::list,
        crate::routes::rules::get_one,
        crate::routes::rules::suggestions,
        // Session
        crate::routes::session::config,
        crate::routes::session::status,
        crate::routes::session::login,
        crate::routes::session::callback,
        crate::routes::session::logout,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::documents::DocumentPayloadSchema,
        crate::routes::documents::DocumentResponse,
        crate::routes::documents::DocumentListResponse,
        crate::routes::documents::DeleteResponse,
        crate::routes::documents::PreviewResponse,
        crate::routes::rules::CategorySummary,
        crate::routes::rules::RulesResponse,
        crate::routes::rules::RuleResponse,
        crate::routes::rules::SuggestionsResponse,
        crate::routes::session::ConfigResponse,
        crate::routes::session::AuthStatus,
    )),
    tags(
        (name = "documents", description = "Regatta documents, preview and export"),
        (name = "rules", description = "Racing rules catalog"),
        (name = "session", description = "Login, logout and public settings"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
