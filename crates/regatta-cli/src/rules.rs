//! # Rules Subcommand
//!
//! Prints the rule catalog in rulebook order, as a table or as JSON.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use regatta_core::{filter_rules, DocumentSection, RuleCategory, RuleDefinition};

/// Arguments for the `regatta rules` subcommand.
#[derive(Args, Debug, Default)]
pub struct RulesArgs {
    /// Only rules from this rulebook: rrs, prescription or appendix.
    #[arg(long)]
    pub category: Option<String>,

    /// Only rules placed in this document: nor, si or both.
    #[arg(long)]
    pub section: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Execute the rules subcommand, writing to `out`.
pub fn run_rules(args: &RulesArgs, out: &mut dyn Write) -> Result<u8> {
    let category: Option<RuleCategory> = args
        .category
        .as_deref()
        .map(str::parse)
        .transpose()
        .context("invalid --category")?;
    let section: Option<DocumentSection> = args
        .section
        .as_deref()
        .map(str::parse)
        .transpose()
        .context("invalid --section")?;

    let rules: Vec<&RuleDefinition> = filter_rules(category, section).collect();
    tracing::info!(count = rules.len(), "catalog filtered");

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &rules)?;
        writeln!(out)?;
        return Ok(0);
    }

    for rule in &rules {
        let marker = if rule.can_modify { "*" } else { " " };
        writeln!(
            out,
            "{:<14} {:<12} {:<5} {}{marker} {}",
            rule.id,
            rule.number,
            rule.section.as_str(),
            rule.category.as_str(),
            rule.title
        )?;
    }
    writeln!(out, "\n{} rule(s); * = text may be modified", rules.len())?;
    Ok(0)
}
