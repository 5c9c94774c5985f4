//! # Request Body Extraction
//!
//! Helpers that turn axum's JSON rejections into [`AppError`] so every
//! malformed body gets the standard error envelope.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use regatta_core::{DocumentContent, DocumentId, DocumentPayload};
use uuid::Uuid;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a document payload and validate it completely.
///
/// Malformed JSON is a 400; well-formed content that breaks a document rule
/// (blank title, unknown rule, dangling provision) is a 422. Either way
/// nothing has been written yet.
pub fn extract_document(
    result: Result<Json<DocumentPayload>, JsonRejection>,
) -> Result<DocumentContent, AppError> {
    Ok(extract_json(result)?.into_content()?)
}

/// Parse a document id taken from the URL path.
///
/// An id that is not a UUID cannot name any document, so it is reported as
/// [`AppError::NotFound`] like any other unknown id.
pub fn document_id(raw: &str) -> Result<DocumentId, AppError> {
    Uuid::parse_str(raw)
        .map(DocumentId::from_uuid)
        .map_err(|_| AppError::NotFound(format!("document {raw} not found")))
}
