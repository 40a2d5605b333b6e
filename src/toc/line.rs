use anyhow::{Context, Result};
use regex::Regex;

use crate::model::TocEntry;

/// Recognizes `<section> <title> <page>` lines such as `3.4.2. Interfaces ..... 69`.
///
/// Digits may come from any script with Unicode decimal digits, so fullwidth
/// lines like `１.１ 概要 ５` parse too.
#[derive(Debug, Clone)]
pub struct TocLineParser {
    line_regex: Regex,
    leader_regex: Regex,
    digit_regex: Regex,
}

impl TocLineParser {
    pub fn new() -> Result<Self> {
        let line_regex = Regex::new(r"^(\d+(?:\.\d+)*)\.?\s+(.+?)\s+(\d+)$")
            .context("failed to compile toc line regex")?;
        let leader_regex =
            Regex::new(r"\.{2,}").context("failed to compile leader dots regex")?;
        let digit_regex = Regex::new(r"^\d$").context("failed to compile digit regex")?;

        Ok(Self {
            line_regex,
            leader_regex,
            digit_regex,
        })
    }

    /// Returns `None` for anything that is not a ToC line.
    pub fn parse_line(&self, text: &str) -> Option<TocEntry> {
        let captures = self.line_regex.captures(text.trim())?;

        let section_number = captures.get(1)?.as_str();
        let raw_title = captures.get(2)?.as_str();
        let page = self.parse_page(captures.get(3)?.as_str())?;

        let title = self.strip_leaders(raw_title);
        if title.is_empty() {
            return None;
        }

        Some(TocEntry {
            title: format!("{section_number} {title}"),
            level: section_number.matches('.').count() + 1,
            page,
        })
    }

    /// Removes every run of two or more dots, then trims surrounding whitespace.
    pub fn strip_leaders(&self, text: &str) -> String {
        self.leader_regex.replace_all(text, "").trim().to_string()
    }

    // Saturates at u32::MAX; page clamping brings oversized values back in range.
    fn parse_page(&self, digits: &str) -> Option<u32> {
        digits.chars().try_fold(0u32, |page, ch| {
            let digit = self.digit_value(ch)?;
            Some(page.saturating_mul(10).saturating_add(digit))
        })
    }

    // Unicode encodes each set of decimal digits as ten consecutive code points
    // starting at zero, so the value is the distance back to the start of the run.
    fn digit_value(&self, ch: char) -> Option<u32> {
        if let Some(value) = ch.to_digit(10) {
            return Some(value);
        }
        if !self.is_decimal_digit(ch) {
            return None;
        }

        let mut steps = 0;
        let mut code = u32::from(ch);
        while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
            if !self.is_decimal_digit(prev) {
                break;
            }
            steps += 1;
            code -= 1;
        }
        Some(steps % 10)
    }

    fn is_decimal_digit(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.digit_regex.is_match(ch.encode_utf8(&mut buf))
    }
}
