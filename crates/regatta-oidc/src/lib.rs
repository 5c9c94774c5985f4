//! # regatta-oidc -- Typed client for the race committee identity provider
//!
//! The API delegates authentication entirely to an OpenID Connect provider.
//! This crate covers the four interactions it needs:
//!
//! - **Login**: build the `{issuer}/authorize` URL the browser is sent to.
//! - **Callback**: exchange the authorization code at `{issuer}/token`.
//! - **Session resolution**: present a bearer credential to
//!   `{issuer}/userinfo` and map the returned claims to a
//!   [`SessionIdentity`].
//! - **Logout**: build the `{issuer}/logout` URL.
//!
//! Token signatures are never inspected locally; the provider is the only
//! authority on whether a credential is valid. Every call is a single round
//! trip and failures surface immediately without retry.

pub mod config;
pub mod error;
pub mod session;

pub use config::{ConfigError, OidcConfig};
pub use error::OidcError;
pub use session::SessionIdentity;

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// Tokens returned by the provider's token endpoint.
///
/// Custom `Debug` implementation redacts the tokens.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("id_token", &self.id_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Client for the identity provider.
#[derive(Debug, Clone)]
pub struct OidcClient {
    http: reqwest::Client,
    config: OidcConfig,
}

impl OidcClient {
    /// Create a new client from configuration.
    pub fn new(config: OidcConfig) -> Result<Self, OidcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OidcError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http, config })
    }

    /// URL of the provider's login page.
    ///
    /// `state` is echoed back on the callback.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the issuer cannot be joined.
    pub fn authorization_url(&self, state: &str) -> Result<Url, OidcError> {
        let base = format!("{}/authorize", self.config.issuer_base());
        Url::parse_with_params(
            &base,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid profile email"),
                ("state", state),
            ],
        )
        .map_err(|e| ConfigError::InvalidUrl("authorize".to_string(), e.to_string()).into())
    }

    /// URL that ends the session at the provider.
    pub fn logout_url(&self) -> Result<Url, OidcError> {
        let raw = format!("{}/logout", self.config.issuer_base());
        Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl("logout".to_string(), e.to_string()).into())
    }

    /// Exchange an authorization code for tokens.
    ///
    /// Calls `POST {issuer}/token` with a form-encoded body.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OidcError> {
        let endpoint = "POST /token";
        let url = format!("{}/token", self.config.issuer_base());

        let resp = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OidcError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "authorization code exchange rejected");
            return Err(OidcError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        resp.json().await.map_err(|e| OidcError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// Resolve a session credential to the identity behind it.
    ///
    /// Calls `GET {issuer}/userinfo` with the credential as bearer token.
    ///
    /// # Errors
    ///
    /// [`OidcError::Unauthenticated`] when the provider rejects the credential
    /// (401/403) or the claims lack a race committee. Transport and other
    /// provider failures are reported as-is.
    pub async fn resolve_session(&self, credential: &str) -> Result<SessionIdentity, OidcError> {
        let endpoint = "GET /userinfo";
        let url = format!("{}/userinfo", self.config.issuer_base());

        let resp = self
            .http
            .get(&url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| OidcError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(OidcError::Unauthenticated(format!(
                "credential rejected by identity provider ({})",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OidcError::ApiError {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                body,
            });
        }

        let claims: Map<String, Value> =
            resp.json().await.map_err(|e| OidcError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })?;
        SessionIdentity::from_claims(&claims, &self.config)
    }
}
