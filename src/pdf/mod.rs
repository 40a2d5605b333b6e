use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::debug;

use crate::model::{BookmarkNode, OutlineItem};
use crate::util::sibling_with_suffix;

#[cfg(feature = "pdf")]
mod outline_writer;

#[cfg(feature = "pdf")]
pub use outline_writer::PdfOutlineWriter;

const OUTPUT_SUFFIX: &str = "_with_bookmarks.pdf";
const NO_PDF_SUPPORT: &str =
    "this build has no PDF support; rebuild with `--features pdf` to embed bookmarks";

/// Whether this build can rewrite PDF outlines. Decided once at startup.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PdfSupport {
    Available,
    Unavailable,
}

impl PdfSupport {
    pub fn detect() -> Self {
        if cfg!(feature = "pdf") {
            Self::Available
        } else {
            Self::Unavailable
        }
    }

    pub fn is_available(self) -> bool {
        self == Self::Available
    }

    fn require(self) -> Result<()> {
        if !self.is_available() {
            bail!(NO_PDF_SUPPORT);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct EmbedReport {
    pub output_path: PathBuf,
    pub bookmark_count: usize,
    pub page_count: u32,
}

/// `<dir>/<stem>.pdf` next to the DOCX, if such a file exists.
pub fn find_sibling_pdf(docx_path: &Path) -> Option<PathBuf> {
    let candidate = docx_path.with_extension("pdf");
    let found = candidate.is_file();
    debug!(candidate = %candidate.display(), found, "looked for sibling pdf");
    found.then_some(candidate)
}

pub fn default_output_path(pdf_path: &Path) -> PathBuf {
    sibling_with_suffix(pdf_path, OUTPUT_SUFFIX)
}

/// Replaces the outline of `pdf_path` with `nodes` and saves the result to `output_path`.
pub fn embed_bookmarks(
    support: PdfSupport,
    pdf_path: &Path,
    nodes: &[BookmarkNode],
    output_path: &Path,
) -> Result<EmbedReport> {
    support.require()?;
    write_outline(pdf_path, nodes, output_path)
}

/// Projects `nodes` against the page count of `pdf_path` without writing anything.
pub fn preview_outline(
    support: PdfSupport,
    pdf_path: &Path,
    nodes: &[BookmarkNode],
) -> Result<Vec<OutlineItem>> {
    support.require()?;
    project_outline(pdf_path, nodes)
}

#[cfg(feature = "pdf")]
fn write_outline(pdf_path: &Path, nodes: &[BookmarkNode], output_path: &Path) -> Result<EmbedReport> {
    let mut writer = PdfOutlineWriter::load(pdf_path)?;
    let page_count = writer.page_count();
    let items = crate::toc::flatten_outline(nodes, page_count);

    let bookmark_count = writer.set_outline(&items)?;
    writer.save(output_path)?;

    Ok(EmbedReport {
        output_path: output_path.to_path_buf(),
        bookmark_count,
        page_count,
    })
}

#[cfg(feature = "pdf")]
fn project_outline(pdf_path: &Path, nodes: &[BookmarkNode]) -> Result<Vec<OutlineItem>> {
    let writer = PdfOutlineWriter::load(pdf_path)?;
    Ok(crate::toc::flatten_outline(nodes, writer.page_count()))
}

#[cfg(all(test, feature = "pdf"))]
pub(crate) fn test_pdf_bytes(pages: usize) -> Vec<u8> {
    outline_writer::tests::pdf_bytes(pages, false)
}

#[cfg(not(feature = "pdf"))]
fn write_outline(_: &Path, _: &[BookmarkNode], _: &Path) -> Result<EmbedReport> {
    bail!(NO_PDF_SUPPORT)
}

#[cfg(not(feature = "pdf"))]
fn project_outline(_: &Path, _: &[BookmarkNode]) -> Result<Vec<OutlineItem>> {
    bail!(NO_PDF_SUPPORT)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::model::Destination;

    #[test]
    fn find_sibling_pdf_requires_existing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let docx = dir.path().join("manual.docx");

        assert_eq!(find_sibling_pdf(&docx), None);

        let pdf = dir.path().join("manual.pdf");
        fs::write(&pdf, b"%PDF-1.5").expect("write pdf stub");
        assert_eq!(find_sibling_pdf(&docx), Some(pdf));
    }

    #[test]
    fn default_output_path_adds_suffix() {
        assert_eq!(
            default_output_path(Path::new("out/manual.pdf")),
            PathBuf::from("out/manual_with_bookmarks.pdf")
        );
    }

    #[test]
    fn embedding_fails_without_pdf_support() {
        let node = BookmarkNode {
            title: "1 Intro".to_string(),
            destination: Destination::page(1),
            style: Default::default(),
            children: Vec::new(),
        };

        let err = embed_bookmarks(
            PdfSupport::Unavailable,
            Path::new("missing.pdf"),
            &[node],
            Path::new("missing_with_bookmarks.pdf"),
        )
        .expect_err("no pdf support");
        assert!(err.to_string().contains("--features pdf"));
    }
}
