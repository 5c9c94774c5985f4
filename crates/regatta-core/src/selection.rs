//! # Selection & Override State
//!
//! Per-document record of which catalog rules are chosen and which of them
//! carry replacement text.
//!
//! ## Invariants
//!
//! - Every selected id exists in the catalog.
//! - Every override key is also selected; deselecting a rule drops its
//!   override.
//! - Overrides are only accepted for rules with `can_modify = true`.
//!
//! Each operation checks its preconditions before touching the state, so a
//! rejected call leaves the selection unchanged.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::get_rule;
use crate::error::DocumentError;
use crate::ids::RuleId;
use crate::rule::RuleDefinition;

/// The chosen rules of one document and their override texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<RuleId>,
    overrides: BTreeMap<RuleId, String>,
}

impl SelectionState {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a selection from its stored parts, validating every entry.
    ///
    /// # Errors
    ///
    /// [`DocumentError::InvalidRule`] for unknown ids;
    /// [`DocumentError::NotModifiable`] for overrides on unselected or fixed
    /// rules.
    pub fn from_parts(
        selected: impl IntoIterator<Item = RuleId>,
        overrides: impl IntoIterator<Item = (RuleId, String)>,
    ) -> Result<Self, DocumentError> {
        let mut state = Self::new();
        for id in selected {
            state.select(&id)?;
        }
        for (id, text) in overrides {
            state.set_override(&id, text)?;
        }
        Ok(state)
    }

    /// Add a rule to the selection. Returns `false` if it was already selected.
    ///
    /// # Errors
    ///
    /// [`DocumentError::InvalidRule`] if the id is not in the catalog.
    pub fn select(&mut self, id: &RuleId) -> Result<bool, DocumentError> {
        get_rule(id.as_str())?;
        Ok(self.selected.insert(id.clone()))
    }

    /// Remove a rule and any override it had. Returns `false` if it was not
    /// selected.
    pub fn deselect(&mut self, id: &RuleId) -> bool {
        self.overrides.remove(id);
        self.selected.remove(id)
    }

    /// Store replacement text for a selected, modifiable rule.
    ///
    /// The text is kept verbatim. An empty string is accepted and simply
    /// falls back to the default text when the document is assembled.
    ///
    /// # Errors
    ///
    /// [`DocumentError::InvalidRule`] for unknown ids and
    /// [`DocumentError::NotModifiable`] if the rule is not selected or does
    /// not accept modifications.
    pub fn set_override(
        &mut self,
        id: &RuleId,
        text: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let rule = get_rule(id.as_str())?;
        if !rule.can_modify {
            return Err(DocumentError::NotModifiable {
                rule: id.to_string(),
                reason: "rule text is fixed by the rulebook".to_string(),
            });
        }
        if !self.selected.contains(id) {
            return Err(DocumentError::NotModifiable {
                rule: id.to_string(),
                reason: "rule is not selected".to_string(),
            });
        }
        self.overrides.insert(id.clone(), text.into());
        Ok(())
    }

    /// Drop the override for a rule. Returns the removed text, if any.
    pub fn clear_override(&mut self, id: &RuleId) -> Option<String> {
        self.overrides.remove(id)
    }

    /// Whether the rule is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// The override text stored for a rule, if any.
    pub fn override_for(&self, id: &str) -> Option<&str> {
        self.overrides.get(id).map(String::as_str)
    }

    /// The clause text a rule contributes to a document.
    ///
    /// A non-empty override wins when the rule accepts modifications;
    /// otherwise the catalog default is used.
    pub fn effective_text<'a>(&'a self, rule: &'a RuleDefinition) -> &'a str {
        match self.override_for(rule.id) {
            Some(text) if rule.can_modify && !text.trim().is_empty() => text,
            _ => rule.default_text,
        }
    }

    /// Selected ids in sorted order.
    pub fn selected(&self) -> impl Iterator<Item = &RuleId> {
        self.selected.iter()
    }

    /// All stored overrides.
    pub fn overrides(&self) -> &BTreeMap<RuleId, String> {
        &self.overrides
    }

    /// Number of selected rules.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
