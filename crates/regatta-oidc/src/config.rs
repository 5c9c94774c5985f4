//! OIDC client configuration.
//!
//! Points the client at an identity provider and names the claims that carry
//! the race committee's identity. Read from environment variables or built
//! explicitly for tests.

use url::Url;
use zeroize::Zeroizing;

/// Configuration for the identity provider.
///
/// Custom `Debug` implementation redacts the `client_secret` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct OidcConfig {
    /// Issuer base URL. `/authorize`, `/token`, `/userinfo` and `/logout` are
    /// resolved relative to it.
    pub issuer: Url,
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
    /// Where the provider sends the browser back after login.
    pub callback_url: Url,
    /// Claim holding the individual user's id. Default: `sub`.
    pub user_id_claim: String,
    /// Claim holding the race committee's stable identity. Default: `org`.
    pub race_committee_claim: String,
    /// Claim holding the race committee's display name. Default: `org_name`,
    /// falling back to `name` when absent.
    pub race_committee_name_claim: String,
    /// Claim holding the race committee's logo URL. Default: `org_logo`.
    pub logo_claim: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OidcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcConfig")
            .field("issuer", &self.issuer)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .field("user_id_claim", &self.user_id_claim)
            .field("race_committee_claim", &self.race_committee_claim)
            .field("race_committee_name_claim", &self.race_committee_name_claim)
            .field("logo_claim", &self.logo_claim)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OidcConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `OIDC_ISSUER` (required)
    /// - `OIDC_CLIENT_ID` (required)
    /// - `OIDC_CLIENT_SECRET` (required)
    /// - `OIDC_CALLBACK_URL` (default: `http://localhost:8080/v1/auth/callback`)
    /// - `OIDC_USER_ID_CLAIM` (default: `sub`)
    /// - `OIDC_RACE_COMMITTEE_CLAIM` (default: `org`)
    /// - `OIDC_RACE_COMMITTEE_NAME_CLAIM` (default: `org_name`)
    /// - `OIDC_LOGO_CLAIM` (default: `org_logo`)
    /// - `OIDC_TIMEOUT_SECS` (default: 10)
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingIssuer`] when `OIDC_ISSUER` is unset, which
    /// callers treat as "OIDC disabled". Other variants indicate a broken
    /// configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let issuer = get("OIDC_ISSUER").ok_or(ConfigError::MissingIssuer)?;
        let client_id = get("OIDC_CLIENT_ID").ok_or(ConfigError::Missing("OIDC_CLIENT_ID"))?;
        let client_secret =
            get("OIDC_CLIENT_SECRET").ok_or(ConfigError::Missing("OIDC_CLIENT_SECRET"))?;

        Ok(Self {
            issuer: parse_url("OIDC_ISSUER", &issuer)?,
            client_id,
            client_secret: Zeroizing::new(client_secret),
            callback_url: parse_url(
                "OIDC_CALLBACK_URL",
                &get("OIDC_CALLBACK_URL")
                    .unwrap_or_else(|| "http://localhost:8080/v1/auth/callback".to_string()),
            )?,
            user_id_claim: get("OIDC_USER_ID_CLAIM").unwrap_or_else(|| "sub".to_string()),
            race_committee_claim: get("OIDC_RACE_COMMITTEE_CLAIM")
                .unwrap_or_else(|| "org".to_string()),
            race_committee_name_claim: get("OIDC_RACE_COMMITTEE_NAME_CLAIM")
                .unwrap_or_else(|| "org_name".to_string()),
            logo_claim: get("OIDC_LOGO_CLAIM").unwrap_or_else(|| "org_logo".to_string()),
            timeout_secs: get("OIDC_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        })
    }

    /// Create a configuration pointing at a local mock provider (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `issuer` cannot be parsed.
    pub fn local_mock(issuer: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            issuer: parse_url("issuer", issuer)?,
            client_id: "regatta-test".to_string(),
            client_secret: Zeroizing::new("test-secret".to_string()),
            callback_url: parse_url("callback", "http://localhost:8080/v1/auth/callback")?,
            user_id_claim: "sub".to_string(),
            race_committee_claim: "org".to_string(),
            race_committee_name_claim: "org_name".to_string(),
            logo_claim: "org_logo".to_string(),
            timeout_secs: 5,
        })
    }

    /// Issuer URL without a trailing slash, for joining endpoint paths.
    pub fn issuer_base(&self) -> &str {
        self.issuer.as_str().trim_end_matches('/')
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OIDC_ISSUER environment variable is not set")]
    MissingIssuer,
    #[error("{0} environment variable is required when OIDC_ISSUER is set")]
    Missing(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
