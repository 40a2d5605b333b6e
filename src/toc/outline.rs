use crate::model::{BookmarkNode, OutlineItem};

/// Flattens the forest in pre-order, deriving depth from the tree shape and
/// clamping every page into the document.
pub fn flatten_outline(nodes: &[BookmarkNode], total_pages: u32) -> Vec<OutlineItem> {
    let mut items = Vec::<OutlineItem>::new();
    push_level(nodes, 1, total_pages, &mut items);
    items
}

fn push_level(nodes: &[BookmarkNode], depth: usize, total_pages: u32, items: &mut Vec<OutlineItem>) {
    for node in nodes {
        items.push(OutlineItem(
            depth,
            node.title.clone(),
            clamp_page(node.destination.page, total_pages),
        ));
        push_level(&node.children, depth + 1, total_pages, items);
    }
}

/// Clamps into `[1, total_pages]`; an empty document counts as one page.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}
