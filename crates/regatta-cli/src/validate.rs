//! # Validate Subcommand
//!
//! Runs a document file through the same checks the API applies before
//! saving: title, catalog membership of selected rules, override
//! eligibility, and fleet/provision consistency.
//!
//! Exit codes: 0 valid, 1 invalid, 2 unreadable.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::{load_document, EXIT_INVALID, EXIT_UNREADABLE};

/// Arguments for the `regatta validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document JSON file.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

/// Execute the validate subcommand, writing the verdict to `out`.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let loaded = match load_document(&args.path) {
        Ok(loaded) => loaded,
        Err(e) => {
            writeln!(out, "ERROR: {e:#}")?;
            return Ok(EXIT_UNREADABLE);
        }
    };

    match loaded {
        Ok(content) => {
            writeln!(
                out,
                "OK: {} ({} rule(s), {} override(s), {} fleet(s), {} custom field(s))",
                content.title,
                content.selection.len(),
                content.selection.overrides().len(),
                content.fleets.fleets().len(),
                content.custom_fields.len()
            )?;
            Ok(0)
        }
        Err(e) => {
            tracing::info!(path = %args.path.display(), error = %e, "document rejected");
            writeln!(out, "FAIL: {}: {e}", args.path.display())?;
            Ok(EXIT_INVALID)
        }
    }
}
