//! # Session Middleware
//!
//! Authenticates every request to a protected route before any handler or
//! gateway runs.
//!
//! ## Credential
//!
//! ```text
//! Authorization: Bearer <token>     (API clients)
//! Cookie: session_token=<token>     (the browser editor)
//! ```
//!
//! The header wins when both are present. The credential is resolved by the
//! [`IdentityGateway`](crate::identity::IdentityGateway), then the race
//! committee is upserted so its display name and logo stay current.
//!
//! ## CallerIdentity
//!
//! On success a [`CallerIdentity`] is inserted into the request extensions.
//! Handlers extract it via the `FromRequestParts` impl.

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use regatta_core::Owner;
use regatta_oidc::{OidcError, SessionIdentity};
use zeroize::Zeroizing;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "session_token";

/// The authenticated race committee and the session that proved it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub owner: Owner,
    pub session: SessionIdentity,
}

/// Extracts the identity the session middleware injected into extensions.
/// Returns 401 if it is absent.
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Pull the session credential out of the request headers.
///
/// # Errors
///
/// A human-readable reason when no usable credential is present.
pub fn session_credential(headers: &HeaderMap) -> Result<Zeroizing<String>, &'static str> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| "authorization header is not valid UTF-8")?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or("authorization header must use Bearer scheme")?
            .trim();
        if token.is_empty() {
            return Err("empty bearer token");
        }
        return Ok(Zeroizing::new(token.to_string()));
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .and_then(|c| {
            let value = c.value().trim();
            (!value.is_empty()).then(|| Zeroizing::new(value.to_string()))
        })
        .ok_or("missing session credential")
}

/// Resolve the caller's session and owner, or reject the request.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let credential = match session_credential(request.headers()) {
        Ok(c) => c,
        Err(reason) => {
            tracing::warn!(reason, "authentication failed");
            return AppError::Unauthorized(reason.to_string()).into_response();
        }
    };

    let session = match state.identity.resolve(&credential).await {
        Ok(session) => session,
        Err(OidcError::Unauthenticated(reason)) => {
            tracing::warn!(reason = %reason, "authentication failed: credential rejected");
            return AppError::Unauthorized("invalid or expired session".into()).into_response();
        }
        Err(e) => {
            return AppError::Internal(format!("session resolution failed: {e}")).into_response();
        }
    };

    let owner = match state.documents.upsert_owner(&session.profile()).await {
        Ok(owner) => owner,
        Err(e) => {
            return AppError::Internal(format!(
                "race committee upsert failed for {}: {e}",
                session.external_identity
            ))
            .into_response();
        }
    };

    tracing::debug!(owner_id = %owner.id, user_id = %session.user_id, "session resolved");
    request
        .extensions_mut()
        .insert(CallerIdentity { owner, session });
    next.run(request).await
}
