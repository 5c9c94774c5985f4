//! Session identity derived from provider claims.
//!
//! The provider's userinfo claims are mapped to a [`SessionIdentity`] using
//! the claim names from [`OidcConfig`]. A session without a race committee
//! claim is not a session: there is no fallback to the user's display name,
//! because names are mutable and not unique.

use regatta_core::{ExternalIdentity, OwnerProfile};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::OidcConfig;
use crate::error::OidcError;

/// Display name used when the provider sends neither the configured name
/// claim nor `name`.
pub const DEFAULT_COMMITTEE_NAME: &str = "Race Committee";

/// Who is behind a session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    /// The individual user, from the configured user id claim.
    pub user_id: String,
    /// The race committee the user acts for. This is the owner key.
    pub external_identity: ExternalIdentity,
    /// Race committee display name.
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl SessionIdentity {
    /// Map raw claims to a session identity.
    ///
    /// # Errors
    ///
    /// [`OidcError::Unauthenticated`] when the race committee claim is
    /// missing or blank.
    pub fn from_claims(claims: &Map<String, Value>, config: &OidcConfig) -> Result<Self, OidcError> {
        let committee = claim_str(claims, &config.race_committee_claim).ok_or_else(|| {
            OidcError::Unauthenticated(format!(
                "claim \"{}\" is missing",
                config.race_committee_claim
            ))
        })?;
        let external_identity = ExternalIdentity::new(committee)
            .map_err(|e| OidcError::Unauthenticated(e.to_string()))?;

        let user_id = claim_str(claims, &config.user_id_claim)
            .or_else(|| claim_str(claims, "sub"))
            .unwrap_or_default();
        let display_name = claim_str(claims, &config.race_committee_name_claim)
            .or_else(|| claim_str(claims, "name"))
            .unwrap_or_else(|| DEFAULT_COMMITTEE_NAME.to_string());

        Ok(Self {
            user_id,
            external_identity,
            display_name,
            email: claim_str(claims, "email"),
            logo_url: claim_str(claims, &config.logo_claim),
        })
    }

    /// The owner attributes carried by this session.
    pub fn profile(&self) -> OwnerProfile {
        OwnerProfile {
            external_identity: self.external_identity.clone(),
            display_name: self.display_name.clone(),
            logo_url: self.logo_url.clone(),
        }
    }
}

/// A claim as a non-empty string. Numeric claims are stringified.
fn claim_str(claims: &Map<String, Value>, key: &str) -> Option<String> {
    match claims.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
