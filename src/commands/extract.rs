use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::docx;
use crate::model::{BookmarkNode, TocEntry};
use crate::pdf::{self, PdfSupport};
use crate::toc::{TocLineParser, build_bookmark_tree, extract_entries};
use crate::util::{has_extension, sibling_with_suffix, write_json_pretty};

const JSON_SUFFIX: &str = "_bookmarks.json";
const PREVIEW_ENTRIES: usize = 15;

#[derive(Debug)]
pub struct Extraction {
    pub tree: Vec<BookmarkNode>,
    pub json_path: PathBuf,
}

pub fn run(args: ExtractArgs, support: PdfSupport) -> Result<()> {
    let docx_path = args
        .file
        .clone()
        .context("no DOCX file given; usage: tocmarks [--quiet] <FILE.docx>")?;

    let extraction = extract_to_json(&docx_path, args.output.as_deref())?;

    if args.no_embed {
        info!("skipping pdf embedding (--no-embed)");
        return Ok(());
    }

    let Some(pdf_path) = args.pdf.clone().or_else(|| pdf::find_sibling_pdf(&docx_path)) else {
        let expected_pdf = docx_path.with_extension("pdf");
        warn!(
            expected = %expected_pdf.display(),
            json = %extraction.json_path.display(),
            "no matching pdf found; pass --pdf or run `tocmarks embed <PDF> <JSON>` to embed bookmarks"
        );
        return Ok(());
    };

    if !support.is_available() {
        warn!(pdf = %pdf_path.display(), "pdf support not built in; skipping bookmark embedding");
        return Ok(());
    }

    let output_path = args
        .pdf_output
        .clone()
        .unwrap_or_else(|| pdf::default_output_path(&pdf_path));

    info!(pdf = %pdf_path.display(), "embedding bookmarks into pdf");
    let report = pdf::embed_bookmarks(support, &pdf_path, &extraction.tree, &output_path)
        .with_context(|| format!("failed to embed bookmarks into {}", pdf_path.display()))?;

    info!(
        path = %report.output_path.display(),
        bookmarks = report.bookmark_count,
        pages = report.page_count,
        "wrote bookmarked pdf"
    );

    Ok(())
}

/// Reads the DOCX, parses its ToC, and writes the bookmark tree as JSON.
pub fn extract_to_json(docx_path: &Path, output: Option<&Path>) -> Result<Extraction> {
    if !docx_path.is_file() {
        bail!("file not found: {}", docx_path.display());
    }
    if !has_extension(docx_path, "docx") {
        bail!("expected a .docx file, got {}", docx_path.display());
    }

    info!(path = %docx_path.display(), "reading table of contents");
    let paragraphs = docx::read_paragraphs(docx_path)?;

    let parser = TocLineParser::new()?;
    let entries = extract_entries(&parser, &paragraphs);
    if entries.is_empty() {
        warn!(
            paragraphs = paragraphs.len(),
            "expected lines like '3.4.2.1 Section title 69' (section number, title, page number)"
        );
        bail!("no table of contents lines found in {}", docx_path.display());
    }

    info!(entries = entries.len(), "found toc entries");
    log_preview(&entries);

    let tree = build_bookmark_tree(&entries);
    let json_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling_with_suffix(docx_path, JSON_SUFFIX));

    write_json_pretty(&json_path, &tree)?;
    info!(path = %json_path.display(), roots = tree.len(), "wrote bookmark json");

    Ok(Extraction {
        tree,
        json_path,
    })
}

fn log_preview(entries: &[TocEntry]) {
    for entry in entries.iter().take(PREVIEW_ENTRIES) {
        let indent = "  ".repeat(entry.level.saturating_sub(1));
        info!("{indent}{} -> p. {}", entry.title, entry.page);
    }
    if entries.len() > PREVIEW_ENTRIES {
        info!("... and {} more", entries.len() - PREVIEW_ENTRIES);
    }
}
