use crate::model::{BookmarkNode, MAX_LEVEL, TocEntry};

struct DraftNode {
    node: BookmarkNode,
    children: Vec<usize>,
}

/// Rebuilds the section hierarchy from entries in reading order.
///
/// Each entry hangs off the most recent entry one level above it. An entry whose
/// parent level has not been seen yet (for example `2.1` before any `2`) becomes a root.
// TODO: offer a strict mode that reports orphaned entries instead of promoting them to roots.
pub fn build_bookmark_tree(entries: &[TocEntry]) -> Vec<BookmarkNode> {
    let mut drafts = Vec::<DraftNode>::with_capacity(entries.len());
    let mut roots = Vec::<usize>::new();
    let mut latest_at_level: [Option<usize>; MAX_LEVEL + 1] = [None; MAX_LEVEL + 1];

    for entry in entries {
        let level = entry.level.clamp(1, MAX_LEVEL);
        let index = drafts.len();
        drafts.push(DraftNode {
            node: BookmarkNode::from_entry(entry),
            children: Vec::new(),
        });

        let parent = if level == 1 {
            None
        } else {
            latest_at_level[level - 1]
        };

        match parent {
            Some(parent_index) => drafts[parent_index].children.push(index),
            None => roots.push(index),
        }

        latest_at_level[level] = Some(index);
    }

    assemble(drafts, &roots)
}

// Children always have a larger index than their parent, so building from the back
// finishes every subtree before its owner needs it.
fn assemble(drafts: Vec<DraftNode>, roots: &[usize]) -> Vec<BookmarkNode> {
    let mut built: Vec<Option<BookmarkNode>> = Vec::with_capacity(drafts.len());
    built.resize_with(drafts.len(), || None);

    for (index, draft) in drafts.into_iter().enumerate().rev() {
        let DraftNode { mut node, children } = draft;
        node.children = children
            .iter()
            .filter_map(|child| built[*child].take())
            .collect();
        built[index] = Some(node);
    }

    roots
        .iter()
        .filter_map(|root| built[*root].take())
        .collect()
}
