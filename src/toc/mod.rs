mod extract;
mod line;
mod outline;
#[cfg(test)]
mod tests;
mod tree;

pub use extract::extract_entries;
pub use line::TocLineParser;
pub use outline::{clamp_page, flatten_outline};
pub use tree::build_bookmark_tree;
