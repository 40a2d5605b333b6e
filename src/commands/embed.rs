use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::EmbedArgs;
use crate::model::BookmarkNode;
use crate::pdf::{self, PdfSupport};
use crate::util::{has_extension, read_json};

pub fn run(args: EmbedArgs, support: PdfSupport) -> Result<()> {
    check_inputs(&args.pdf, &args.json)?;

    let nodes: Vec<BookmarkNode> = read_json(&args.json)?;
    info!(json = %args.json.display(), roots = nodes.len(), "loaded bookmark json");

    if args.dry_run {
        let items = pdf::preview_outline(support, &args.pdf, &nodes)?;
        let rendered =
            serde_json::to_string_pretty(&items).context("failed to serialize outline")?;

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}").context("failed to write outline to stdout")?;
        info!(bookmarks = items.len(), "embed dry-run complete");
        return Ok(());
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| pdf::default_output_path(&args.pdf));

    let report = pdf::embed_bookmarks(support, &args.pdf, &nodes, &output_path)
        .with_context(|| format!("failed to embed bookmarks into {}", args.pdf.display()))?;

    info!(
        path = %report.output_path.display(),
        bookmarks = report.bookmark_count,
        pages = report.page_count,
        source = %args.pdf.display(),
        "wrote bookmarked pdf"
    );

    Ok(())
}

fn check_inputs(pdf_path: &Path, json_path: &Path) -> Result<()> {
    if !pdf_path.is_file() {
        bail!("PDF file not found: {}", pdf_path.display());
    }
    if !has_extension(pdf_path, "pdf") {
        bail!("expected a .pdf file, got {}", pdf_path.display());
    }
    if !json_path.is_file() {
        bail!("JSON file not found: {}", json_path.display());
    }
    Ok(())
}
