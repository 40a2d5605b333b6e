use tracing::debug;

use super::TocLineParser;
use crate::model::TocEntry;

/// Collects ToC entries from paragraphs in document order. Lines that do not parse are skipped.
pub fn extract_entries<S: AsRef<str>>(parser: &TocLineParser, paragraphs: &[S]) -> Vec<TocEntry> {
    let mut entries = Vec::<TocEntry>::new();
    let mut skipped_lines = 0usize;

    for paragraph in paragraphs {
        for raw_line in paragraph.as_ref().lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            match parser.parse_line(line) {
                Some(entry) => entries.push(entry),
                None => skipped_lines += 1,
            }
        }
    }

    debug!(
        entries = entries.len(),
        skipped_lines, "extracted toc entries from paragraphs"
    );

    entries
}
