//! # Event Metadata
//!
//! Free-form named fields describing the regatta (title, venue, dates, ...)
//! and the fixed header layout they are rendered into.
//!
//! Any key is accepted and stored. Only the keys listed in [`FIELDS`] are
//! placed in generated headers; the rest travel with the document untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rule::{DocumentKind, DocumentSection};

/// A header field known to the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderField {
    /// Transport key, camelCase.
    pub key: &'static str,
    /// Label printed in front of the value.
    pub label: &'static str,
    /// Which header(s) show the field.
    pub section: DocumentSection,
}

const fn field(key: &'static str, label: &'static str, section: DocumentSection) -> HeaderField {
    HeaderField {
        key,
        label,
        section,
    }
}

/// Header layout, in print order. `title` is rendered as the heading and is
/// not repeated here.
pub const FIELDS: &[HeaderField] = &[
    field("venue", "Venue", DocumentSection::Both),
    field("dates", "Event Dates", DocumentSection::Both),
    field("organizingAuthority", "Organizing Authority", DocumentSection::Both),
    field("classes", "Classes / Divisions", DocumentSection::Nor),
    field("registrationLink", "Registration", DocumentSection::Nor),
    field("entryFee", "Entry Fee", DocumentSection::Nor),
    field("awardsDateTime", "Awards", DocumentSection::Nor),
    field("vhfChannel", "VHF Channel", DocumentSection::Si),
    field("racingArea", "Racing Area", DocumentSection::Si),
    field("courseLength", "Course Length", DocumentSection::Si),
    field("timeLimit", "Time Limit", DocumentSection::Si),
    field("scoringSystem", "Scoring System", DocumentSection::Both),
    field("contactName", "Contact", DocumentSection::Both),
    field("contactEmail", "Email", DocumentSection::Both),
    field("contactPhone", "Phone", DocumentSection::Both),
];

/// Flat mapping of event field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventMetadata(BTreeMap<String, String>);

impl EventMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, if present and not blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// The event title, if set.
    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lay the metadata out as the header of one output document.
    ///
    /// `fallback_title` is used when the metadata carries no `title`.
    pub fn header(&self, kind: DocumentKind, fallback_title: &str) -> Header {
        let lines = FIELDS
            .iter()
            .filter(|f| f.section.includes(kind))
            .filter_map(|f| {
                self.get(f.key).map(|value| HeaderLine {
                    label: f.label.to_string(),
                    value: value.trim().to_string(),
                })
            })
            .collect();
        Header {
            title: self
                .title()
                .unwrap_or(fallback_title)
                .trim()
                .to_string(),
            subtitle: kind.title().to_string(),
            lines,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EventMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Rendered header of a NOR or SI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: String,
    /// "Notice of Race" or "Sailing Instructions".
    pub subtitle: String,
    pub lines: Vec<HeaderLine>,
}

/// One `label: value` line of a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderLine {
    pub label: String,
    pub value: String,
}
