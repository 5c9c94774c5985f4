//! # Document API
//!
//! Owner-scoped CRUD over regatta documents plus NOR/SI preview and
//! Markdown export. Every payload is validated in full before the gateway is
//! called, and every lookup is filtered by the caller's race committee: a
//! document owned by someone else is a 404, exactly like a missing one.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use regatta_core::{
    assemble, assemble_kind, AssembledDocument, Assembly, CategoryCoverage, DocumentKind,
    DocumentPayload, RegattaDocument,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{document_id, extract_document};
use crate::state::AppState;

/// Transport shape of a document as sent by the editor.
///
/// Only used to describe request bodies in the OpenAPI document; handlers
/// deserialize [`DocumentPayload`].
#[derive(ToSchema)]
#[schema(as = DocumentPayload)]
#[allow(dead_code)]
pub struct DocumentPayloadSchema {
    /// Required, at most 200 characters after trimming.
    title: String,
    /// Flat map of header fields (`venue`, `dates`, `vhfChannel`, ...).
    event_data: HashMap<String, String>,
    /// Catalog rule ids.
    selected_rules: Vec<String>,
    /// Replacement text by rule id. Only selected, modifiable rules.
    modified_rules: HashMap<String, String>,
    /// Free-form `name → text` pairs, rendered in insertion order.
    custom_fields: HashMap<String, String>,
    /// `{id, name, description?, color}` objects.
    #[schema(value_type = Vec<Object>)]
    fleets: Vec<serde_json::Value>,
    /// `{id, fleetId, content, section}` objects.
    #[schema(value_type = Vec<Object>)]
    fleet_provisions: Vec<serde_json::Value>,
}

/// A single document.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    #[schema(value_type = Object)]
    pub document: RegattaDocument,
}

/// The caller's documents, most recently updated first.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    #[schema(value_type = Vec<Object>)]
    pub documents: Vec<RegattaDocument>,
}

/// Outcome of a delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Both assembled outputs and the per-category rule counts.
#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
    #[schema(value_type = Object)]
    pub nor: AssembledDocument,
    #[schema(value_type = Object)]
    pub si: AssembledDocument,
    #[schema(value_type = Vec<Object>)]
    pub coverage: Vec<CategoryCoverage>,
}

impl From<Assembly> for PreviewResponse {
    fn from(a: Assembly) -> Self {
        Self {
            nor: a.nor,
            si: a.si,
            coverage: a.coverage,
        }
    }
}

/// Build the documents router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/documents", get(list_documents).post(create_document))
        .route(
            "/v1/documents/:id",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/v1/documents/:id/preview", get(preview_document))
        .route("/v1/documents/:id/export/:kind", get(export_document))
        .route("/v1/preview", post(preview_payload))
}

/// GET /v1/documents: List the caller's documents.
#[utoipa::path(
    get,
    path = "/v1/documents",
    responses(
        (status = 200, description = "Documents, most recently updated first", body = DocumentListResponse),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
pub(crate) async fn list_documents(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<DocumentListResponse>, AppError> {
    let documents = state.documents.list(caller.owner.id).await?;
    Ok(Json(DocumentListResponse { documents }))
}

/// POST /v1/documents: Create a document.
#[utoipa::path(
    post,
    path = "/v1/documents",
    request_body = DocumentPayloadSchema,
    responses(
        (status = 201, description = "Document created", body = DocumentResponse),
        (status = 400, description = "Malformed JSON", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid document content", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
pub(crate) async fn create_document(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<DocumentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let content = extract_document(body)?;
    let document = state.documents.create(caller.owner.id, content).await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse { document })))
}

/// GET /v1/documents/:id: Fetch a document.
#[utoipa::path(
    get,
    path = "/v1/documents/{id}",
    params(("id" = String, Path, description = "Document ID (UUID)")),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
pub(crate) async fn get_document(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = state
        .documents
        .get(document_id(&id)?, caller.owner.id)
        .await?;
    Ok(Json(DocumentResponse { document }))
}

/// PUT /v1/documents/:id: Replace a document's content.
#[utoipa::path(
    put,
    path = "/v1/documents/{id}",
    params(("id" = String, Path, description = "Document ID (UUID)")),
    request_body = DocumentPayloadSchema,
    responses(
        (status = 200, description = "Document updated", body = DocumentResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid document content", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
pub(crate) async fn update_document(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<DocumentPayload>, JsonRejection>,
) -> Result<Json<DocumentResponse>, AppError> {
    let content = extract_document(body)?;
    let document = state
        .documents
        .update(document_id(&id)?, caller.owner.id, content)
        .await?;
    Ok(Json(DocumentResponse { document }))
}

/// DELETE /v1/documents/:id: Delete a document.
#[utoipa::path(
    delete,
    path = "/v1/documents/{id}",
    params(("id" = String, Path, description = "Document ID (UUID)")),
    responses(
        (status = 200, description = "Document deleted", body = DeleteResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
pub(crate) async fn delete_document(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = document_id(&id)?;
    if state.documents.delete(id, caller.owner.id).await? {
        Ok(Json(DeleteResponse { success: true }))
    } else {
        Err(AppError::NotFound(format!("document {id} not found")))
    }
}

/// GET /v1/documents/:id/preview: Assemble a saved document.
#[utoipa::path(
    get,
    path = "/v1/documents/{id}/preview",
    params(("id" = String, Path, description = "Document ID (UUID)")),
    responses(
        (status = 200, description = "Assembled NOR and SI", body = PreviewResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
pub(crate) async fn preview_document(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<PreviewResponse>, AppError> {
    let document = state
        .documents
        .get(document_id(&id)?, caller.owner.id)
        .await?;
    Ok(Json(assemble(&document.content).into()))
}

/// GET /v1/documents/:id/export/:kind: Download the NOR or SI as Markdown.
#[utoipa::path(
    get,
    path = "/v1/documents/{id}/export/{kind}",
    params(
        ("id" = String, Path, description = "Document ID (UUID)"),
        ("kind" = String, Path, description = "`nor` or `si`"),
    ),
    responses(
        (status = 200, description = "Markdown text", content_type = "text/markdown", body = String),
        (status = 400, description = "Unknown document kind", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
pub(crate) async fn export_document(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let kind: DocumentKind = kind
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unknown document kind '{kind}', expected nor or si")))?;
    let document = state
        .documents
        .get(document_id(&id)?, caller.owner.id)
        .await?;

    let markdown = assemble_kind(&document.content, kind).to_markdown();
    let filename = format!("{}-{}.md", document.content.slug(), kind.as_str());
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        markdown,
    )
        .into_response())
}

/// POST /v1/preview: Assemble an unsaved payload. Nothing is stored.
#[utoipa::path(
    post,
    path = "/v1/preview",
    request_body = DocumentPayloadSchema,
    responses(
        (status = 200, description = "Assembled NOR and SI", body = PreviewResponse),
        (status = 422, description = "Invalid document content", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
pub(crate) async fn preview_payload(
    _caller: CallerIdentity,
    body: Result<Json<DocumentPayload>, JsonRejection>,
) -> Result<Json<PreviewResponse>, AppError> {
    let content = extract_document(body)?;
    Ok(Json(assemble(&content).into()))
}
