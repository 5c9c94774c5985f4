//! # regatta-api: Axum API Service for Regatta Documents
//!
//! Race committees sign in through an OpenID Connect provider and edit
//! their Notice of Race / Sailing Instructions documents. Every document is
//! owned by one race committee and invisible to all others.
//!
//! ## API Surface
//!
//! | Prefix            | Module                     | Auth    |
//! |-------------------|----------------------------|---------|
//! | `/v1/documents/*` | [`routes::documents`]      | session |
//! | `/v1/preview`     | [`routes::documents`]      | session |
//! | `/v1/rules/*`     | [`routes::rules`]          | session |
//! | `/v1/auth/*`      | [`routes::session`]        | none    |
//! | `/v1/config`      | [`routes::session`]        | none    |
//! | `/health/*`       | this module                | none    |
//! | `/openapi.json`   | [`openapi`]                | none    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → SessionMiddleware (protected routes only) → Handler
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod gateway;
pub mod identity;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Session, config and health endpoints are mounted outside the session
/// middleware so they remain reachable without credentials.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(routes::documents::router())
        .merge(routes::rules::router())
        .layer(from_fn_with_state(state.clone(), auth::session_middleware));

    let public = Router::new()
        .merge(routes::session::router())
        .merge(openapi::router())
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 when the document store answers, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.documents.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "readiness check failed");
        AppError::ServiceUnavailable("document store is not reachable".into())
    })?;
    Ok("ready")
}
