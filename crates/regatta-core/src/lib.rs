//! # regatta-core: Document Model for Regatta NOR/SI Generation
//!
//! Everything needed to describe a regatta document and turn it into a
//! Notice of Race and Sailing Instructions, with no I/O. Only `serde`,
//! `thiserror`, `chrono` and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **The catalog is a static table.** [`catalog::RULES`] is never mutated
//!    and lookups never allocate.
//!
//! 2. **Validate, then mutate.** Every editing operation and
//!    [`DocumentPayload::into_content`] checks all preconditions first; a
//!    rejected call leaves state untouched.
//!
//! 3. **Newtype wrappers for identifiers.** A [`FleetId`] cannot be passed
//!    where a [`ProvisionId`] is expected.
//!
//! 4. **Assembly is pure.** [`assemble`] is deterministic over its input.

pub mod assembler;
pub mod catalog;
pub mod custom;
pub mod document;
pub mod error;
pub mod event;
pub mod fleet;
pub mod ids;
pub mod owner;
pub mod rule;
pub mod selection;

// Re-export primary types at crate root for ergonomic imports.
pub use assembler::{
    assemble, assemble_kind, coverage, AssembledDocument, Assembly, CategoryCoverage,
};
pub use catalog::{filter_rules, get_rule, list_rules, suggestions_for, Suggestion};
pub use custom::CustomFields;
pub use document::{DocumentContent, DocumentPayload, RegattaDocument};
pub use error::{CatalogError, DocumentError};
pub use event::EventMetadata;
pub use fleet::{Fleet, FleetRegistry, Provision, ProvisionPatch};
pub use ids::{DocumentId, ExternalIdentity, FleetId, OwnerId, ProvisionId, RuleId};
pub use owner::{Owner, OwnerProfile};
pub use rule::{DocumentKind, DocumentSection, RuleCategory, RuleDefinition};
pub use selection::SelectionState;
