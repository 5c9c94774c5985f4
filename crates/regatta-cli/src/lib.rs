//! # regatta-cli: Command-Line Tool for Regatta Documents
//!
//! Provides the `regatta` command for working with document files offline,
//! without the API service.
//!
//! ## Subcommands
//!
//! - `regatta rules`: Print the rule catalog, optionally filtered.
//! - `regatta validate`: Check a document file against every content rule.
//! - `regatta render`: Assemble the NOR and/or SI as Markdown.
//!
//! ```bash
//! regatta rules --category appendix
//! regatta validate spring-series.json
//! regatta render spring-series.json --kind si --out-dir out/
//! ```
//!
//! Document files hold the same JSON the editor sends to the API. A saved
//! API response (`{"document": {...}}`) is accepted as well.

pub mod render;
pub mod rules;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use regatta_core::{DocumentContent, DocumentError, DocumentPayload};
use serde_json::Value;

/// Exit code for a document that parsed but broke a content rule.
pub const EXIT_INVALID: u8 = 1;
/// Exit code for a file that could not be read or is not a JSON document.
pub const EXIT_UNREADABLE: u8 = 2;

/// Read and validate a document file.
///
/// The outer `Result` fails when the file is unreadable or not a JSON
/// object of the document shape. The inner one carries the content
/// validation outcome.
pub fn load_document(path: &Path) -> Result<Result<DocumentContent, DocumentError>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    if let Some(inner) = value.get_mut("document").filter(|v| v.is_object()) {
        value = inner.take();
    }
    let payload: DocumentPayload = serde_json::from_value(value)
        .with_context(|| format!("{} is not a regatta document", path.display()))?;

    tracing::debug!(path = %path.display(), "document file parsed");
    Ok(payload.into_content())
}
