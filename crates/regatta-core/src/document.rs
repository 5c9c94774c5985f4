//! # Regatta Documents
//!
//! Three views of the same aggregate:
//!
//! - [`DocumentPayload`]: the camelCase transport shape exchanged with clients
//!   and read from files. Nothing in it is trusted.
//! - [`DocumentContent`]: a payload that passed [`DocumentPayload::into_content`].
//!   Every rule id is in the catalog, every override is allowed, every
//!   provision points at a fleet.
//! - [`RegattaDocument`]: validated content plus its persistent identity
//!   (id, owner, timestamps).
//!
//! Validation runs to completion before any caller touches storage, so a
//! rejected payload never results in a partial write.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::RULES;
use crate::custom::CustomFields;
use crate::error::DocumentError;
use crate::event::EventMetadata;
use crate::fleet::{Fleet, FleetRegistry, Provision};
use crate::ids::{DocumentId, OwnerId, RuleId};
use crate::selection::SelectionState;

/// Longest accepted document title, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Transport shape of a document, as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub event_data: EventMetadata,
    #[serde(default)]
    pub selected_rules: Vec<String>,
    #[serde(default)]
    pub modified_rules: BTreeMap<String, String>,
    #[serde(default)]
    pub custom_fields: CustomFields,
    #[serde(default)]
    pub fleets: Vec<Fleet>,
    #[serde(default)]
    pub fleet_provisions: Vec<Provision>,
}

impl DocumentPayload {
    /// Validate the payload and convert it into [`DocumentContent`].
    ///
    /// # Errors
    ///
    /// - [`DocumentError::Invalid`] for a blank or over-long title.
    /// - [`DocumentError::InvalidRule`] for ids outside the catalog.
    /// - [`DocumentError::NotModifiable`] for overrides on unselected or
    ///   fixed rules.
    /// - [`DocumentError::DuplicateId`] / [`DocumentError::UnknownFleet`] for
    ///   inconsistent fleets and provisions.
    /// - [`DocumentError::Invalid`] for a blank custom field name.
    pub fn into_content(self) -> Result<DocumentContent, DocumentError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(DocumentError::Invalid("title is required".to_string()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(DocumentError::Invalid(format!(
                "title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }

        let selected = self
            .selected_rules
            .into_iter()
            .map(|id| RuleId::new(id.clone()).map_err(|_| DocumentError::InvalidRule(id)))
            .collect::<Result<Vec<_>, _>>()?;
        let overrides = self
            .modified_rules
            .into_iter()
            .map(|(id, text)| {
                RuleId::new(id.clone())
                    .map(|rid| (rid, text))
                    .map_err(|_| DocumentError::InvalidRule(id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let selection = SelectionState::from_parts(selected, overrides)?;
        let fleets = FleetRegistry::from_parts(self.fleets, self.fleet_provisions)?;
        if self.custom_fields.iter().any(|(name, _)| name.trim().is_empty()) {
            return Err(DocumentError::Invalid(
                "custom field name must not be empty".to_string(),
            ));
        }

        Ok(DocumentContent {
            title,
            event: self.event_data,
            selection,
            fleets,
            custom_fields: self.custom_fields,
        })
    }
}

/// Validated document state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentContent {
    /// Trimmed, non-empty title.
    pub title: String,
    pub event: EventMetadata,
    pub selection: SelectionState,
    pub fleets: FleetRegistry,
    pub custom_fields: CustomFields,
}

impl DocumentContent {
    /// Empty content with the given title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// File-name friendly form of the title: lowercase ASCII letters and
    /// digits separated by single dashes. Falls back to `regatta`.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        for c in self.title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        let trimmed = slug.trim_end_matches('-');
        if trimmed.is_empty() {
            "regatta".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Selected rule ids in catalog order.
    pub fn selected_rule_ids(&self) -> Vec<&'static str> {
        RULES
            .iter()
            .filter(|r| self.selection.is_selected(r.id))
            .map(|r| r.id)
            .collect()
    }

    /// Overrides as a plain string map.
    pub fn modified_rules(&self) -> BTreeMap<String, String> {
        self.selection
            .overrides()
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// A persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegattaDocument {
    pub id: DocumentId,
    pub owner_id: OwnerId,
    pub content: DocumentContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Borrowed transport view used to serialize a [`RegattaDocument`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentView<'a> {
    id: DocumentId,
    title: &'a str,
    event_data: &'a EventMetadata,
    selected_rules: Vec<&'static str>,
    modified_rules: BTreeMap<String, String>,
    custom_fields: &'a CustomFields,
    fleets: &'a [Fleet],
    fleet_provisions: &'a [Provision],
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Serialize for RegattaDocument {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DocumentView {
            id: self.id,
            title: &self.content.title,
            event_data: &self.content.event,
            selected_rules: self.content.selected_rule_ids(),
            modified_rules: self.content.modified_rules(),
            custom_fields: &self.content.custom_fields,
            fleets: self.content.fleets.fleets(),
            fleet_provisions: self.content.fleets.provisions(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .serialize(serializer)
    }
}
