//! # Document Assembler
//!
//! Merges validated [`DocumentContent`] into the two output documents, Notice
//! of Race and Sailing Instructions.
//!
//! Each output is laid out as:
//!
//! 1. a header built from event metadata;
//! 2. a "Rules" section with the selected rules in catalog order;
//! 3. one section per fleet (creation order) holding its provisions;
//! 4. an "Additional Information" section with the custom fields.
//!
//! Rules and provisions are filtered by their section tag, so `nor` content
//! never appears in the SI and vice versa. Empty sections are omitted.
//! Assembly is a pure function of its input: the same content always yields
//! the same outputs.

use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::RULES;
use crate::document::DocumentContent;
use crate::event::Header;
use crate::rule::{DocumentKind, RuleCategory};
use crate::selection::SelectionState;

/// Heading of the section holding the selected rules.
pub const RULES_HEADING: &str = "Rules";
/// Heading of the section holding custom fields.
pub const CUSTOM_FIELDS_HEADING: &str = "Additional Information";

/// One clause of an output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    /// Short bold lead-in, e.g. `RRS 30.1 I Flag Rule` or a custom field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub text: String,
    /// Catalog id for rule clauses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<&'static str>,
    /// The text comes from an override rather than the catalog default.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub modified: bool,
}

/// A titled group of clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub heading: String,
    pub clauses: Vec<Clause>,
}

/// A fully assembled NOR or SI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembledDocument {
    pub kind: DocumentKind,
    pub header: Header,
    pub sections: Vec<Section>,
}

/// Selected versus available rules for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCoverage {
    pub category: RuleCategory,
    pub label: &'static str,
    pub selected: usize,
    pub total: usize,
}

/// Both outputs plus the selection summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assembly {
    pub nor: AssembledDocument,
    pub si: AssembledDocument,
    pub coverage: Vec<CategoryCoverage>,
}

impl Assembly {
    /// The output for `kind`.
    pub fn get(&self, kind: DocumentKind) -> &AssembledDocument {
        match kind {
            DocumentKind::Nor => &self.nor,
            DocumentKind::Si => &self.si,
        }
    }
}

/// Assemble both output documents.
pub fn assemble(content: &DocumentContent) -> Assembly {
    Assembly {
        nor: assemble_kind(content, DocumentKind::Nor),
        si: assemble_kind(content, DocumentKind::Si),
        coverage: coverage(&content.selection),
    }
}

/// Assemble a single output document.
pub fn assemble_kind(content: &DocumentContent, kind: DocumentKind) -> AssembledDocument {
    let mut sections = Vec::new();

    // ── Rules ────────────────────────────────────────────────────────
    let rules: Vec<Clause> = RULES
        .iter()
        .filter(|r| r.section.includes(kind) && content.selection.is_selected(r.id))
        .map(|r| {
            let text = content.selection.effective_text(r);
            let label = match r.category {
                RuleCategory::Rrs => format!("RRS {} {}", r.number, r.title),
                RuleCategory::Prescription | RuleCategory::Appendix => {
                    format!("{} {}", r.number, r.title)
                }
            };
            Clause {
                label: Some(label),
                text: text.to_string(),
                rule_id: Some(r.id),
                modified: text != r.default_text,
            }
        })
        .collect();
    if !rules.is_empty() {
        sections.push(Section {
            heading: RULES_HEADING.to_string(),
            clauses: rules,
        });
    }

    // ── Fleet provisions ─────────────────────────────────────────────
    for fleet in content.fleets.fleets() {
        let clauses: Vec<Clause> = content
            .fleets
            .provisions_for(&fleet.id)
            .filter(|p| p.section.includes(kind) && !p.content.trim().is_empty())
            .map(|p| Clause {
                label: None,
                text: p.content.trim().to_string(),
                rule_id: None,
                modified: false,
            })
            .collect();
        if !clauses.is_empty() {
            sections.push(Section {
                heading: fleet.name.clone(),
                clauses,
            });
        }
    }

    // ── Custom fields ────────────────────────────────────────────────
    let custom: Vec<Clause> = content
        .custom_fields
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(name, value)| Clause {
            label: Some(name.to_string()),
            text: value.trim().to_string(),
            rule_id: None,
            modified: false,
        })
        .collect();
    if !custom.is_empty() {
        sections.push(Section {
            heading: CUSTOM_FIELDS_HEADING.to_string(),
            clauses: custom,
        });
    }

    AssembledDocument {
        kind,
        header: content.event.header(kind, &content.title),
        sections,
    }
}

/// Per-category count of selected rules, in [`RuleCategory::ALL`] order.
pub fn coverage(selection: &SelectionState) -> Vec<CategoryCoverage> {
    RuleCategory::ALL
        .iter()
        .map(|&category| {
            let in_category = RULES.iter().filter(|r| r.category == category);
            let total = in_category.clone().count();
            let selected = in_category.filter(|r| selection.is_selected(r.id)).count();
            CategoryCoverage {
                category,
                label: category.label(),
                selected,
                total,
            }
        })
        .collect()
}

impl AssembledDocument {
    /// Render as Markdown with numbered sections and clauses.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "# {}\n", self.header.title);
        let _ = writeln!(out, "## {}\n", self.header.subtitle);
        for line in &self.header.lines {
            let _ = writeln!(out, "**{}:** {}  ", line.label, line.value);
        }
        if !self.header.lines.is_empty() {
            out.push('\n');
        }
        for (i, section) in self.sections.iter().enumerate() {
            let n = i + 1;
            let _ = writeln!(out, "### {n}. {}\n", section.heading);
            for (j, clause) in section.clauses.iter().enumerate() {
                let m = j + 1;
                match &clause.label {
                    Some(label) => {
                        let _ = writeln!(out, "{n}.{m} **{label}.** {}\n", clause.text);
                    }
                    None => {
                        let _ = writeln!(out, "{n}.{m} {}\n", clause.text);
                    }
                }
            }
        }
        out
    }

    /// Whether any section contains `needle` in a clause text.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.sections
            .iter()
            .flat_map(|s| &s.clauses)
            .any(|c| c.text.contains(needle))
    }

    /// The section with the given heading.
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}
