//! # Error Hierarchy
//!
//! Structured error types for the document model, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Every variant of [`DocumentError`] is raised before any state is mutated,
//! so a failed operation leaves the document exactly as it was.

use thiserror::Error;

/// Errors raised by the static rule catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No rule with this id exists in the catalog.
    #[error("rule not found in catalog: \"{0}\"")]
    NotFound(String),
}

/// Errors raised while editing or validating a regatta document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The referenced rule id is not part of the catalog.
    #[error("invalid rule: \"{0}\" is not in the catalog")]
    InvalidRule(String),

    /// An override was attempted on a rule that does not accept one.
    #[error("rule \"{rule}\" cannot be modified: {reason}")]
    NotModifiable {
        /// The rule id the override targeted.
        rule: String,
        /// Why the override was refused.
        reason: String,
    },

    /// A provision referenced a fleet that does not exist in the document.
    #[error("unknown fleet: \"{0}\"")]
    UnknownFleet(String),

    /// A provision id does not exist in the document.
    #[error("unknown provision: \"{0}\"")]
    UnknownProvision(String),

    /// The same id was used twice for fleets or provisions.
    #[error("duplicate {kind} id: \"{id}\"")]
    DuplicateId {
        /// What kind of entity carried the duplicate ("fleet" or "provision").
        kind: &'static str,
        /// The repeated id.
        id: String,
    },

    /// Any other field-level validation failure.
    #[error("{0}")]
    Invalid(String),
}

impl From<CatalogError> for DocumentError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::InvalidRule(id),
        }
    }
}
