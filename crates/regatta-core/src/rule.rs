//! # Rule Definitions
//!
//! The vocabulary of the rule catalog: which rulebook a rule comes from
//! ([`RuleCategory`]), which output document it belongs in
//! ([`DocumentSection`]), and the immutable [`RuleDefinition`] itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Which rulebook a catalog entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Racing Rules of Sailing, parts 1 to 5.
    Rrs,
    /// National authority prescriptions (US Sailing).
    Prescription,
    /// RRS appendices.
    Appendix,
}

impl RuleCategory {
    /// All categories in display order.
    pub const ALL: [RuleCategory; 3] = [Self::Rrs, Self::Prescription, Self::Appendix];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rrs => "rrs",
            Self::Prescription => "prescription",
            Self::Appendix => "appendix",
        }
    }

    /// Human-readable label used in coverage summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rrs => "Racing Rules of Sailing",
            Self::Prescription => "US Sailing Prescriptions",
            Self::Appendix => "Appendices",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleCategory {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rrs" => Ok(Self::Rrs),
            "prescription" => Ok(Self::Prescription),
            "appendix" => Ok(Self::Appendix),
            other => Err(DocumentError::Invalid(format!(
                "unknown rule category \"{other}\" (expected rrs, prescription or appendix)"
            ))),
        }
    }
}

/// Which output document(s) a rule or provision is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSection {
    /// Notice of Race only.
    Nor,
    /// Sailing Instructions only.
    Si,
    /// Both documents.
    #[default]
    Both,
}

impl DocumentSection {
    /// Whether content tagged with this section belongs in `kind`.
    pub fn includes(&self, kind: DocumentKind) -> bool {
        matches!(
            (self, kind),
            (Self::Both, _) | (Self::Nor, DocumentKind::Nor) | (Self::Si, DocumentKind::Si)
        )
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nor => "nor",
            Self::Si => "si",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for DocumentSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentSection {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nor" => Ok(Self::Nor),
            "si" => Ok(Self::Si),
            "both" => Ok(Self::Both),
            other => Err(DocumentError::Invalid(format!(
                "unknown section \"{other}\" (expected nor, si or both)"
            ))),
        }
    }
}

/// One of the two generated output documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Notice of Race.
    Nor,
    /// Sailing Instructions.
    Si,
}

impl DocumentKind {
    /// Both kinds, NOR first.
    pub const ALL: [DocumentKind; 2] = [Self::Nor, Self::Si];

    /// Full document title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Nor => "Notice of Race",
            Self::Si => "Sailing Instructions",
        }
    }

    /// Stable lowercase name, also used in exported file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nor => "nor",
            Self::Si => "si",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nor" => Ok(Self::Nor),
            "si" => Ok(Self::Si),
            other => Err(DocumentError::Invalid(format!(
                "unknown document kind \"{other}\" (expected nor or si)"
            ))),
        }
    }
}

/// An immutable catalog entry.
///
/// All fields borrow from the static catalog table; a `RuleDefinition` is
/// never constructed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    /// Unique catalog id, e.g. `rule-30.1`.
    pub id: &'static str,
    /// Rulebook number as printed, e.g. `30.1` or `Appendix A`.
    pub number: &'static str,
    /// Short title.
    pub title: &'static str,
    /// One-line summary shown in the selector.
    pub description: &'static str,
    /// Source rulebook.
    pub category: RuleCategory,
    /// The rule only applies when the NOR or SI mentions it.
    pub applies_if_mentioned: bool,
    /// Clause text used when no override is set.
    pub default_text: &'static str,
    /// Output document(s) the clause is placed in.
    pub section: DocumentSection,
    /// Whether a race committee may replace the default text.
    pub can_modify: bool,
    /// Rulebook part heading the rule is listed under.
    pub part: &'static str,
}
