use super::*;
use crate::model::{BookmarkNode, OutlineItem, TocEntry};

fn parser() -> TocLineParser {
    TocLineParser::new().expect("compile toc parser")
}

fn entry(title: &str, level: usize, page: u32) -> TocEntry {
    TocEntry {
        title: title.to_string(),
        level,
        page,
    }
}

fn titles(nodes: &[BookmarkNode]) -> Vec<&str> {
    nodes.iter().map(|node| node.title.as_str()).collect()
}

fn outline(items: &[(usize, &str, u32)]) -> Vec<OutlineItem> {
    items
        .iter()
        .map(|(depth, title, page)| OutlineItem(*depth, title.to_string(), *page))
        .collect()
}

#[test]
fn parse_line_recovers_section_title_and_page() {
    let parser = parser();

    assert_eq!(
        parser.parse_line("3.4.2.1 Interface description 69"),
        Some(entry("3.4.2.1 Interface description", 4, 69))
    );
    assert_eq!(
        parser.parse_line("1. Overview 5"),
        Some(entry("1 Overview", 1, 5))
    );
    assert_eq!(
        parser.parse_line("  2.3.\tScope\t12  "),
        Some(entry("2.3 Scope", 2, 12))
    );
}

#[test]
fn parse_line_strips_leader_dots_from_title() {
    let parser = parser();

    assert_eq!(
        parser.parse_line("1.2 Goals ................ 8"),
        Some(entry("1.2 Goals", 2, 8))
    );
    assert_eq!(
        parser.parse_line("4 Annex A.. part B 30"),
        Some(entry("4 Annex A part B", 1, 30))
    );
    assert_eq!(
        parser.parse_line("5 Version 2.1 notes 44"),
        Some(entry("5 Version 2.1 notes", 1, 44))
    );
}

#[test]
fn parse_line_keeps_numbers_inside_title() {
    let parser = parser();

    assert_eq!(
        parser.parse_line("7 Changes since 2020 15"),
        Some(entry("7 Changes since 2020", 1, 15))
    );
}

#[test]
fn parse_line_rejects_non_toc_lines() {
    let parser = parser();

    for line in [
        "",
        "   ",
        "Contents",
        "1.1 Scope",
        "Scope 12",
        "A.1 Annex 40",
        "1.1 Scope 12 draft",
        "1.1 Scope 12a",
        "1 5",
        "1. ........ 5",
        "see section 1.2 Goals 8",
    ] {
        assert_eq!(parser.parse_line(line), None, "line {line:?} should not parse");
    }
}

#[test]
fn parse_line_accepts_fullwidth_and_other_script_digits() {
    let parser = parser();

    assert_eq!(
        parser.parse_line("１.１ 概要 ５"),
        Some(entry("１.１ 概要", 2, 5))
    );
    assert_eq!(
        parser.parse_line("２ 設計 ........ １２０"),
        Some(entry("２ 設計", 1, 120))
    );
    assert_eq!(
        parser.parse_line("३.२ परिचय ४७"),
        Some(entry("३.२ परिचय", 2, 47))
    );
}

#[test]
fn parse_line_saturates_oversized_page_numbers() {
    let parser = parser();

    let parsed = parser
        .parse_line("1.1 Scope 99999999999")
        .expect("oversized page is still a toc line");
    assert_eq!(parsed, entry("1.1 Scope", 2, u32::MAX));

    let tree = build_bookmark_tree(&[entry("1 Intro", 1, 1), parsed]);
    assert_eq!(
        flatten_outline(&tree, 40),
        outline(&[(1, "1 Intro", 1), (2, "1.1 Scope", 40)])
    );
}

#[test]
fn strip_leaders_is_idempotent() {
    let parser = parser();

    for text in [
        "Goals ......",
        "A.. B... C",
        ". . .. .",
        "plain",
        " .. padded .. ",
        "x.y..z",
    ] {
        let once = parser.strip_leaders(text);
        assert_eq!(parser.strip_leaders(&once), once, "text {text:?}");
        assert!(!once.contains(".."));
    }
}

#[test]
fn extract_entries_skips_noise_and_keeps_order() {
    let parser = parser();
    let paragraphs = vec![
        "CONTENTS".to_string(),
        String::new(),
        "1. Overview 5".to_string(),
        "Some prose paragraph that mentions page 4".to_string(),
        "1.1 Scope\t6\n1.2 Goals\t8".to_string(),
        "   ".to_string(),
        "2. Design 10".to_string(),
    ];

    let entries = extract_entries(&parser, &paragraphs);

    assert_eq!(
        entries,
        vec![
            entry("1 Overview", 1, 5),
            entry("1.1 Scope", 2, 6),
            entry("1.2 Goals", 2, 8),
            entry("2 Design", 1, 10),
        ]
    );
}

#[test]
fn extract_entries_returns_empty_when_nothing_matches() {
    let parser = parser();
    let entries = extract_entries(&parser, &["Introduction", "", "Body text"]);
    assert!(entries.is_empty());
}

#[test]
fn end_to_end_example_builds_expected_tree_and_outline() {
    let parser = parser();
    let entries = extract_entries(
        &parser,
        &["1. Overview 5", "1.1 Scope 6", "1.2 Goals 8", "2. Design 10"],
    );

    let tree = build_bookmark_tree(&entries);

    assert_eq!(titles(&tree), vec!["1 Overview", "2 Design"]);
    assert_eq!(titles(&tree[0].children), vec!["1.1 Scope", "1.2 Goals"]);
    assert!(tree[1].children.is_empty());

    assert_eq!(
        flatten_outline(&tree, 100),
        outline(&[
            (1, "1 Overview", 5),
            (2, "1.1 Scope", 6),
            (2, "1.2 Goals", 8),
            (1, "2 Design", 10),
        ])
    );
}

#[test]
fn build_tree_promotes_orphan_to_root() {
    let tree = build_bookmark_tree(&[entry("2.1 Sub", 2, 4)]);

    assert_eq!(titles(&tree), vec!["2.1 Sub"]);
    assert!(tree[0].children.is_empty());
}

#[test]
fn build_tree_attaches_to_latest_ancestor_at_parent_level() {
    let tree = build_bookmark_tree(&[
        entry("1 A", 1, 1),
        entry("1.1 A1", 2, 2),
        entry("1.1.1 A1a", 3, 3),
        entry("1.2 A2", 2, 4),
        entry("1.2.1 A2a", 3, 5),
        entry("1.2.1.1 A2a-i", 4, 6),
        entry("2 B", 1, 7),
        entry("2.1.1 B-deep", 3, 8),
    ]);

    assert_eq!(titles(&tree), vec!["1 A", "2 B"]);
    assert_eq!(titles(&tree[0].children), vec!["1.1 A1", "1.2 A2"]);
    assert_eq!(titles(&tree[0].children[0].children), vec!["1.1.1 A1a"]);
    assert_eq!(
        titles(&tree[0].children[1].children[0].children),
        vec!["1.2.1.1 A2a-i"]
    );
    // No level 2 entry under "2 B" yet, so the latest level 2 node is still "1.2 A2".
    assert_eq!(
        titles(&tree[0].children[1].children),
        vec!["1.2.1 A2a", "2.1.1 B-deep"]
    );
    assert!(tree[1].children.is_empty());
}

#[test]
fn build_tree_keeps_duplicates() {
    let tree = build_bookmark_tree(&[
        entry("1 Intro", 1, 1),
        entry("1 Intro", 1, 1),
        entry("1.1 Part", 2, 2),
        entry("1.1 Part", 2, 2),
    ]);

    assert_eq!(titles(&tree), vec!["1 Intro", "1 Intro"]);
    assert!(tree[0].children.is_empty());
    assert_eq!(titles(&tree[1].children), vec!["1.1 Part", "1.1 Part"]);
}

#[test]
fn build_tree_clamps_excessive_depth() {
    let mut entries = Vec::new();
    for level in 1..=9 {
        entries.push(entry(&format!("level {level}"), level, level as u32));
    }
    entries.push(entry("too deep", 12, 10));

    let tree = build_bookmark_tree(&entries);
    let items = flatten_outline(&tree, 20);

    assert_eq!(tree.len(), 1);
    let last = items.last().expect("outline item");
    assert_eq!(last.title(), "too deep");
    // Clamped to level 9, which hangs off the level 8 node at depth 8.
    assert_eq!(last.depth(), 9);
    assert_eq!(items[items.len() - 2].depth(), 9);
}

#[test]
fn build_tree_accepts_empty_input() {
    assert!(build_bookmark_tree(&[]).is_empty());
    assert!(flatten_outline(&[], 10).is_empty());
}

#[test]
fn flatten_outline_rederives_depth_for_promoted_orphans() {
    let tree = build_bookmark_tree(&[
        entry("3.1.2 Orphan", 3, 7),
        entry("3.1.2.1 Child", 4, 8),
        entry("4 Next", 1, 9),
    ]);

    assert_eq!(
        flatten_outline(&tree, 50),
        outline(&[(1, "3.1.2 Orphan", 7), (2, "3.1.2.1 Child", 8), (1, "4 Next", 9)])
    );
}

#[test]
fn flatten_outline_keeps_child_depth_one_below_parent() {
    let tree = build_bookmark_tree(&[
        entry("1 A", 1, 1),
        entry("1.1 B", 2, 2),
        entry("1.1.1 C", 3, 3),
        entry("1.2 D", 2, 4),
        entry("2 E", 1, 5),
    ]);
    let items = flatten_outline(&tree, 10);

    assert!(items.iter().all(|item| item.depth() >= 1));
    for pair in items.windows(2) {
        assert!(pair[1].depth() <= pair[0].depth() + 1);
    }
}

#[test]
fn flatten_outline_preserves_root_order() {
    let entries: Vec<TocEntry> = (1..=6)
        .flat_map(|n| {
            vec![
                entry(&format!("{n} Chapter"), 1, n * 10),
                entry(&format!("{n}.1 Section"), 2, n * 10 + 1),
            ]
        })
        .collect();

    let tree = build_bookmark_tree(&entries);
    let roots: Vec<String> = flatten_outline(&tree, 100)
        .into_iter()
        .filter(|item| item.depth() == 1)
        .map(|item| item.title().to_string())
        .collect();

    let expected: Vec<String> = (1..=6).map(|n| format!("{n} Chapter")).collect();
    assert_eq!(roots, expected);
}

#[test]
fn clamp_page_stays_within_document() {
    for total in [0u32, 1, 3, 250] {
        for page in [0u32, 1, 2, 3, 4, 249, 250, 251, u32::MAX] {
            let clamped = clamp_page(page, total);
            assert!(clamped >= 1);
            assert!(clamped <= total.max(1));
        }
    }

    assert_eq!(clamp_page(0, 10), 1);
    assert_eq!(clamp_page(11, 10), 10);
    assert_eq!(clamp_page(7, 10), 7);
}

#[test]
fn flatten_outline_clamps_pages_to_total() {
    let tree = build_bookmark_tree(&[entry("1 Start", 1, 0), entry("2 End", 1, 400)]);

    assert_eq!(
        flatten_outline(&tree, 120),
        outline(&[(1, "1 Start", 1), (1, "2 End", 120)])
    );
}
