//! # Owners
//!
//! A race committee owns documents. It is keyed by the stable identity the
//! identity provider asserts ([`ExternalIdentity`]); the display name and
//! logo are refreshable metadata and never used for matching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ExternalIdentity, OwnerId};

/// Attributes of a race committee as reported by the identity provider.
///
/// This is the input of the owner get-or-create step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub external_identity: ExternalIdentity,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// A persisted race committee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: OwnerId,
    pub external_identity: ExternalIdentity,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owner {
    /// A fresh owner for a first-seen identity.
    pub fn from_profile(profile: OwnerProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: OwnerId::new(),
            external_identity: profile.external_identity,
            display_name: profile.display_name,
            logo_url: profile.logo_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy changed metadata from `profile`. Returns `true` if anything changed.
    ///
    /// A profile without a logo leaves an existing logo in place.
    pub fn refresh(&mut self, profile: &OwnerProfile, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        if self.display_name != profile.display_name {
            self.display_name = profile.display_name.clone();
            changed = true;
        }
        if profile.logo_url.is_some() && self.logo_url != profile.logo_url {
            self.logo_url = profile.logo_url.clone();
            changed = true;
        }
        if changed {
            self.updated_at = now;
        }
        changed
    }
}
