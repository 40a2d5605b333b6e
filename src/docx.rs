use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the text of every paragraph of a DOCX file, in document order.
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let paragraphs = read_paragraphs_from(file)
        .with_context(|| format!("failed to read paragraphs from {}", path.display()))?;

    debug!(path = %path.display(), paragraphs = paragraphs.len(), "read docx paragraphs");
    Ok(paragraphs)
}

pub fn read_paragraphs_from<R: Read + Seek>(reader: R) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(reader).context("file is not a DOCX (ZIP) archive")?;

    let xml = {
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .with_context(|| format!("archive has no {DOCUMENT_PART}"))?;
        let mut content = String::new();
        part.read_to_string(&mut content)
            .with_context(|| format!("failed to read {DOCUMENT_PART}"))?;
        content
    };

    parse_document_xml(&xml)
}

#[derive(Debug, Default)]
struct ParagraphCollector {
    // Slots in `paragraphs` of the paragraphs still open, innermost last.
    open: Vec<usize>,
    run_depth: usize,
    in_text: bool,
    paragraphs: Vec<String>,
}

impl ParagraphCollector {
    fn start(&mut self, element: &BytesStart<'_>) {
        match element.name().as_ref() {
            b"w:p" => {
                self.open.push(self.paragraphs.len());
                self.paragraphs.push(String::new());
            }
            b"w:r" => self.run_depth += 1,
            b"w:t" => self.in_text = true,
            _ => {}
        }
    }

    fn empty(&mut self, element: &BytesStart<'_>) {
        match element.name().as_ref() {
            b"w:p" => self.paragraphs.push(String::new()),
            b"w:tab" if self.run_depth > 0 => self.push_char('\t'),
            b"w:br" | b"w:cr" if self.run_depth > 0 => self.push_char('\n'),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"w:p" => {
                self.open.pop();
            }
            b"w:r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"w:t" => self.in_text = false,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if !self.in_text {
            return;
        }
        if let Some(current) = self.current() {
            current.push_str(text);
        }
    }

    fn push_char(&mut self, ch: char) {
        if let Some(current) = self.current() {
            current.push(ch);
        }
    }

    fn current(&mut self) -> Option<&mut String> {
        let slot = *self.open.last()?;
        self.paragraphs.get_mut(slot)
    }
}

fn parse_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut collector = ParagraphCollector::default();

    loop {
        let position = reader.buffer_position();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element)) => collector.start(&element),
            Ok(Event::Empty(element)) => collector.empty(&element),
            Ok(Event::End(element)) => collector.end(element.name().as_ref()),
            Ok(Event::Text(text)) => {
                let unescaped = text
                    .unescape()
                    .with_context(|| format!("invalid text in {DOCUMENT_PART} near byte {position}"))?;
                collector.text(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("malformed {DOCUMENT_PART} near byte {position}"));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(collector.paragraphs)
}
