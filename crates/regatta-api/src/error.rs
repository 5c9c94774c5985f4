//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps document, persistence and identity provider errors to HTTP status
//! codes with a JSON body carrying an error code and message.
//! Internal error details never reach the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regatta_core::{CatalogError, DocumentError};
use regatta_oidc::OidcError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::gateway::GatewayError;

/// Structured JSON error response body.
///
/// All error responses use this format. `details` is only set for document
/// validation failures that name an offending rule, fleet or provision.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// The offending id, e.g. `{"rule": "rule-99"}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found, or owned by someone else (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request content failed validation (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Document content broke a document rule (422).
    #[error("validation error: {0}")]
    InvalidDocument(DocumentError),

    /// Request body or query could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing, expired or rejected session credential (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A dependency the request needs is not configured or not answering (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) | Self::InvalidDocument(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        let Self::InvalidDocument(err) = self else {
            return None;
        };
        let details = match err {
            DocumentError::InvalidRule(rule) => serde_json::json!({ "rule": rule }),
            DocumentError::NotModifiable { rule, reason } => {
                serde_json::json!({ "rule": rule, "reason": reason })
            }
            DocumentError::UnknownFleet(fleet) => serde_json::json!({ "fleet": fleet }),
            DocumentError::UnknownProvision(provision) => {
                serde_json::json!({ "provision": provision })
            }
            DocumentError::DuplicateId { kind, id } => serde_json::json!({ "kind": kind, "id": id }),
            DocumentError::Invalid(_) => return None,
        };
        Some(details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Document validation failures are client errors, detected before any write.
impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        Self::InvalidDocument(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::NotFound(format!("rule {id} not found")),
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(id) => Self::NotFound(format!("document {id} not found")),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Only a rejected credential is the caller's fault; provider outages are ours.
impl From<OidcError> for AppError {
    fn from(err: OidcError) -> Self {
        match err {
            OidcError::Unauthenticated(reason) => Self::Unauthorized(reason),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regatta_core::DocumentId;

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                AppError::Validation("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (
                AppError::InvalidDocument(DocumentError::Invalid("x".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (
                AppError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code), "{err}");
        }
    }

    #[test]
    fn document_error_is_validation() {
        let err = AppError::from(DocumentError::InvalidRule("rule-99".into()));
        match err {
            AppError::InvalidDocument(inner) => assert!(inner.to_string().contains("rule-99")),
            other => panic!("expected InvalidDocument, got {other:?}"),
        }
    }

    #[test]
    fn gateway_not_found_is_not_found() {
        let id = DocumentId::new();
        let err = AppError::from(GatewayError::NotFound(id));
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains(&id.to_string())));
    }

    #[test]
    fn gateway_encoding_failure_is_internal() {
        let err = AppError::from(GatewayError::Encoding("bad column".into()));
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn oidc_rejection_is_unauthorized() {
        let err = AppError::from(OidcError::Unauthenticated("expired".into()));
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn unknown_rule_lookup_is_not_found() {
        let err = AppError::from(CatalogError::NotFound("rule-0".into()));
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn error_body_omits_empty_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("test message"));
        assert!(!json.contains("details"));
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_validation() {
        let (status, body) = response_parts(AppError::Validation("title is required".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        assert!(body.error.message.contains("title is required"));
    }

    #[tokio::test]
    async fn into_response_names_offending_rule() {
        let err = AppError::from(DocumentError::NotModifiable {
            rule: "rule-2".into(),
            reason: "rule text is fixed by the rulebook".into(),
        });
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let details = body.error.details.unwrap();
        assert_eq!(details["rule"], "rule-2");
        assert_eq!(details["reason"], "rule text is fixed by the rulebook");
    }

    #[tokio::test]
    async fn into_response_free_form_validation_has_no_details() {
        let err = AppError::from(DocumentError::Invalid("title must not be empty".into()));
        let (_, body) = response_parts(err).await;
        assert!(body.error.message.contains("title must not be empty"));
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("db connection failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }
}
