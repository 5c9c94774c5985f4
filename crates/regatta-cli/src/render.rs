//! # Render Subcommand
//!
//! Assembles a document file into Markdown. Without `--out-dir` the output
//! goes to stdout; with it, each document is written to
//! `<slug>-nor.md` / `<slug>-si.md`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use regatta_core::{assemble_kind, DocumentContent, DocumentKind};

use crate::{load_document, EXIT_INVALID, EXIT_UNREADABLE};

/// Which output document(s) to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Nor,
    Si,
    #[default]
    Both,
}

impl KindArg {
    fn kinds(self) -> &'static [DocumentKind] {
        match self {
            Self::Nor => &[DocumentKind::Nor],
            Self::Si => &[DocumentKind::Si],
            Self::Both => &DocumentKind::ALL,
        }
    }
}

/// Arguments for the `regatta render` subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Document JSON file.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Output document(s).
    #[arg(long, value_enum, default_value_t = KindArg::Both)]
    pub kind: KindArg,

    /// Write `<slug>-<kind>.md` files here instead of printing.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// Execute the render subcommand.
///
/// Markdown (or the list of written files) goes to `out`.
pub fn run_render(args: &RenderArgs, out: &mut dyn Write) -> Result<u8> {
    let content = match load_document(&args.path) {
        Ok(Ok(content)) => content,
        Ok(Err(e)) => {
            writeln!(out, "FAIL: {}: {e}", args.path.display())?;
            return Ok(EXIT_INVALID);
        }
        Err(e) => {
            writeln!(out, "ERROR: {e:#}")?;
            return Ok(EXIT_UNREADABLE);
        }
    };

    match &args.out_dir {
        Some(dir) => {
            for path in write_files(&content, args.kind, dir)? {
                writeln!(out, "wrote {}", path.display())?;
            }
        }
        None => {
            for (i, &kind) in args.kind.kinds().iter().enumerate() {
                if i > 0 {
                    writeln!(out, "\n---\n")?;
                }
                out.write_all(assemble_kind(&content, kind).to_markdown().as_bytes())?;
            }
        }
    }
    Ok(0)
}

/// Write one Markdown file per requested kind into `dir`, creating it if
/// needed. Existing files are overwritten.
pub fn write_files(content: &DocumentContent, kind: KindArg, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let slug = content.slug();
    let mut written = Vec::new();
    for &kind in kind.kinds() {
        let path = dir.join(format!("{slug}-{}.md", kind.as_str()));
        std::fs::write(&path, assemble_kind(content, kind).to_markdown())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), %kind, "rendered");
        written.push(path);
    }
    Ok(written)
}
