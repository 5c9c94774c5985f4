//! # Session API
//!
//! Browser login through the OpenID Connect provider, plus the two
//! unauthenticated endpoints the editor calls on startup.
//!
//! ```text
//! GET /v1/auth/login     → 302 {issuer}/authorize?...&state=<nonce>
//! GET /v1/auth/callback  → exchange code, upsert owner, set session cookie, 302 /
//! GET /v1/auth/logout    → clear cookie, 302 {issuer}/logout
//! GET /v1/auth/status    → {authenticated, user?}
//! GET /v1/config         → {appName, logoUrl}
//! ```
//!
//! Failures during the callback redirect to `/?error=<reason>` instead of
//! returning JSON, because the browser is mid-navigation.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use regatta_core::custom::SUGGESTED_FIELDS;
use regatta_oidc::{OidcError, SessionIdentity};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{session_credential, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Cookie holding the login nonce between `/login` and `/callback`.
pub const LOGIN_STATE_COOKIE: &str = "login_state";

/// Session cookie lifetime.
const SESSION_DAYS: i64 = 7;
/// Login nonce lifetime.
const LOGIN_STATE_MINUTES: i64 = 10;

/// Public application settings.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub app_name: String,
    pub logo_url: Option<String>,
    /// Field names the editor offers when adding a custom field.
    #[schema(value_type = Vec<String>)]
    pub suggested_custom_fields: Vec<&'static str>,
}

/// Whether the request carries a live session.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub user: Option<SessionIdentity>,
}

/// Query string the provider appends to the callback URL.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user cancelled or login failed.
    pub error: Option<String>,
}

/// Build the session router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/config", get(config))
        .route("/v1/auth/status", get(status))
        .route("/v1/auth/login", get(login))
        .route("/v1/auth/callback", get(callback))
        .route("/v1/auth/logout", get(logout))
}

/// 302 to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// 302 back to the editor with `?error=<reason>`, dropping the login nonce.
fn error_redirect(jar: CookieJar, reason: &str) -> Response {
    let encoded: String = url::form_urlencoded::byte_serialize(reason.as_bytes()).collect();
    (
        jar.remove(Cookie::build(LOGIN_STATE_COOKIE).path("/")),
        found(&format!("/?error={encoded}")),
    )
        .into_response()
}

/// Redirect reason for a failed post-login session lookup. Only a rejected
/// session means the user has no race committee.
fn callback_session_failure(err: &OidcError) -> &'static str {
    match err {
        OidcError::Unauthenticated(_) => "no_race_committee",
        _ => "provider_unavailable",
    }
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_DAYS))
        .build()
}

/// GET /v1/config: Application name and logo.
#[utoipa::path(
    get,
    path = "/v1/config",
    responses((status = 200, description = "Public settings", body = ConfigResponse)),
    tag = "session"
)]
pub(crate) async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        app_name: state.config.app_name.clone(),
        logo_url: state.config.logo_url.clone(),
        suggested_custom_fields: SUGGESTED_FIELDS.to_vec(),
    })
}

/// GET /v1/auth/status: Session check. Never fails.
#[utoipa::path(
    get,
    path = "/v1/auth/status",
    responses((status = 200, description = "Session state", body = AuthStatus)),
    tag = "session"
)]
pub(crate) async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<AuthStatus> {
    let user = match session_credential(&headers) {
        Ok(credential) => match state.identity.resolve(&credential).await {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!(error = %e, "session status: credential not accepted");
                None
            }
        },
        Err(_) => None,
    };
    Json(AuthStatus {
        authenticated: user.is_some(),
        user,
    })
}

/// GET /v1/auth/login: Redirect to the provider's login page.
#[utoipa::path(
    get,
    path = "/v1/auth/login",
    responses(
        (status = 302, description = "Redirect to the identity provider"),
        (status = 503, description = "No identity provider configured", body = crate::error::ErrorBody),
    ),
    tag = "session"
)]
pub(crate) async fn login(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let client = state
        .identity
        .oidc()
        .ok_or_else(|| AppError::ServiceUnavailable("no identity provider configured".into()))?;

    let nonce = Uuid::new_v4().simple().to_string();
    let url = client.authorization_url(&nonce)?;
    let cookie = Cookie::build((LOGIN_STATE_COOKIE, nonce))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session_cookie_secure)
        .max_age(time::Duration::minutes(LOGIN_STATE_MINUTES));

    Ok((jar.add(cookie), found(url.as_str())).into_response())
}

/// GET /v1/auth/callback: Complete the login.
#[utoipa::path(
    get,
    path = "/v1/auth/callback",
    params(CallbackQuery),
    responses((status = 302, description = "Redirect to the editor, with `?error=` on failure")),
    tag = "session"
)]
pub(crate) async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(client) = state.identity.oidc() else {
        return error_redirect(jar, "oidc_not_configured");
    };
    if let Some(reason) = query.error.as_deref() {
        tracing::warn!(reason, "identity provider reported a login failure");
        return error_redirect(jar, reason);
    }
    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return error_redirect(jar, "missing_code");
    };
    let expected = jar.get(LOGIN_STATE_COOKIE).map(|c| c.value().to_string());
    if expected.is_none() || expected != query.state {
        tracing::warn!("login callback state does not match the login nonce");
        return error_redirect(jar, "invalid_state");
    }

    let tokens = match client.exchange_code(code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(error = %e, "authorization code exchange failed");
            return error_redirect(jar, "token_exchange_failed");
        }
    };
    let session = match client.resolve_session(&tokens.access_token).await {
        Ok(session) => session,
        Err(e) => {
            let reason = callback_session_failure(&e);
            tracing::warn!(error = %e, reason, "session could not be resolved after login");
            return error_redirect(jar, reason);
        }
    };
    let owner = match state.documents.upsert_owner(&session.profile()).await {
        Ok(owner) => owner,
        Err(e) => {
            tracing::error!(error = %e, "race committee upsert failed during login");
            return error_redirect(jar, "login_failed");
        }
    };

    tracing::info!(owner_id = %owner.id, user_id = %session.user_id, "login completed");
    let jar = jar
        .remove(Cookie::build(LOGIN_STATE_COOKIE).path("/"))
        .add(session_cookie(
            tokens.access_token.clone(),
            state.config.session_cookie_secure,
        ));
    (jar, found("/")).into_response()
}

/// GET /v1/auth/logout: End the session.
#[utoipa::path(
    get,
    path = "/v1/auth/logout",
    responses((status = 302, description = "Redirect to the provider's logout page, or `/`")),
    tag = "session"
)]
pub(crate) async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let location = match state.identity.oidc().map(|c| c.logout_url()) {
        Some(Ok(url)) => url.to_string(),
        Some(Err(e)) => {
            tracing::error!(error = %e, "logout URL could not be built");
            "/".to_string()
        }
        None => "/".to_string(),
    };
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        found(&location),
    )
        .into_response()
}
