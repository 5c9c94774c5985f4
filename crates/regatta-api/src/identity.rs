//! # Identity Gateway
//!
//! Turns a session credential into the race committee behind it.
//!
//! In production the credential is resolved by the OpenID Connect provider
//! ([`OidcClient`]). Without `OIDC_ISSUER` the API falls back to a static
//! credential table, which is empty unless a test or local setup fills it;
//! an empty table rejects every request.

use std::collections::HashMap;
use std::sync::Arc;

use regatta_oidc::{ConfigError, OidcClient, OidcConfig, OidcError, SessionIdentity};

/// Resolves session credentials.
#[derive(Debug, Clone)]
pub enum IdentityGateway {
    Oidc(OidcClient),
    /// Fixed credential → identity table.
    Static(Arc<HashMap<String, SessionIdentity>>),
}

impl IdentityGateway {
    /// Build from `OIDC_*` environment variables.
    ///
    /// A missing `OIDC_ISSUER` yields an empty static table.
    ///
    /// # Errors
    ///
    /// Returns an error when OIDC is partially or wrongly configured, or the
    /// HTTP client cannot be built.
    pub fn from_env() -> Result<Self, OidcError> {
        match OidcConfig::from_env() {
            Ok(config) => {
                tracing::info!(issuer = %config.issuer, "OIDC identity provider configured");
                Ok(Self::Oidc(OidcClient::new(config)?))
            }
            Err(ConfigError::MissingIssuer) => {
                tracing::warn!(
                    "OIDC_ISSUER not set, no identity provider configured. \
                     All authenticated endpoints will return 401."
                );
                Ok(Self::fixed(std::iter::empty()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// A static table of credentials.
    pub fn fixed(entries: impl IntoIterator<Item = (String, SessionIdentity)>) -> Self {
        Self::Static(Arc::new(entries.into_iter().collect()))
    }

    /// The OIDC client, if one is configured.
    pub fn oidc(&self) -> Option<&OidcClient> {
        match self {
            Self::Oidc(client) => Some(client),
            Self::Static(_) => None,
        }
    }

    /// Resolve a credential.
    ///
    /// # Errors
    ///
    /// [`OidcError::Unauthenticated`] for unknown or rejected credentials.
    /// Provider transport failures are passed through unchanged.
    pub async fn resolve(&self, credential: &str) -> Result<SessionIdentity, OidcError> {
        match self {
            Self::Oidc(client) => client.resolve_session(credential).await,
            Self::Static(table) => table
                .get(credential)
                .cloned()
                .ok_or_else(|| OidcError::Unauthenticated("unknown session credential".into())),
        }
    }
}
