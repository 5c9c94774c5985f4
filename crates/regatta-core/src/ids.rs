//! # Identifier Newtypes
//!
//! Domain-primitive newtypes for identifiers used across the workspace.
//! Each identifier is a distinct type: a [`FleetId`] cannot be passed where a
//! [`ProvisionId`] is expected.
//!
//! ## Validation
//!
//! UUID-based identifiers ([`DocumentId`], [`OwnerId`]) are always valid by
//! construction. String-based identifiers ([`RuleId`], [`FleetId`],
//! [`ProvisionId`], [`ExternalIdentity`]) reject empty input at construction
//! and deserialization time.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::DocumentError;

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

/// Identifier of a persisted regatta document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Create a new random document identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a document identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a race committee (the owner of a set of documents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(Uuid);

impl OwnerId {
    /// Create a new random owner identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an owner identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// String-based identifiers (validated at construction)
// ---------------------------------------------------------------------------

/// Generates the boilerplate shared by the non-empty string identifiers.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Create the identifier, rejecting empty or whitespace-only input.
            ///
            /// # Errors
            ///
            /// Returns [`DocumentError::Invalid`] if the value is blank.
            pub fn new(value: impl Into<String>) -> Result<Self, DocumentError> {
                let s = value.into();
                if s.trim().is_empty() {
                    return Err(DocumentError::Invalid(format!(
                        "{} must not be empty",
                        $label
                    )));
                }
                Ok(Self(s))
            }

            /// Access the identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        // Ord, Eq and Hash are derived from the inner String, so they agree
        // with str's and sets or maps keyed by the id can be queried by &str.
        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_id!(
    /// Catalog identifier of a racing rule, e.g. `rule-30.1` or `appendix-t`.
    RuleId,
    "rule id"
);

string_id!(
    /// Identifier of a fleet within one document.
    ///
    /// Clients may supply their own ids (the editor generates `fleet-<n>`);
    /// [`FleetId::generate`] mints a fresh one server-side.
    FleetId,
    "fleet id"
);

string_id!(
    /// Identifier of a fleet-specific provision within one document.
    ProvisionId,
    "provision id"
);

string_id!(
    /// Opaque, machine-generated identity of a race committee as asserted by
    /// the identity provider. This is the owner uniqueness key; display names
    /// are never used for matching.
    ExternalIdentity,
    "external identity"
);

impl FleetId {
    /// Mint a fresh fleet identifier.
    pub fn generate() -> Self {
        Self(format!("fleet-{}", Uuid::new_v4().simple()))
    }
}

impl ProvisionId {
    /// Mint a fresh provision identifier.
    pub fn generate() -> Self {
        Self(format!("provision-{}", Uuid::new_v4().simple()))
    }
}

impl PartialEq<&str> for RuleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
