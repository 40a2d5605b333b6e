use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, dictionary};
use tracing::debug;

use crate::model::{FitMode, OutlineItem};
use crate::toc::clamp_page;

/// Rewrites the bookmark outline of a loaded PDF.
pub struct PdfOutlineWriter {
    document: Document,
}

struct OutlineSlot {
    id: ObjectId,
    dict: Dictionary,
    children: Vec<usize>,
}

impl PdfOutlineWriter {
    pub fn load(path: &Path) -> Result<Self> {
        let document = Document::load(path)
            .with_context(|| format!("failed to open PDF {}", path.display()))?;
        Ok(Self::from_document(document))
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn page_count(&self) -> u32 {
        u32::try_from(self.document.get_pages().len()).unwrap_or(u32::MAX)
    }

    /// Drops any existing outline and writes `items`, which must be in pre-order.
    /// Returns the number of bookmarks written.
    pub fn set_outline(&mut self, items: &[OutlineItem]) -> Result<usize> {
        let page_ids: Vec<ObjectId> = self.document.get_pages().into_values().collect();
        let catalog_id = self.catalog_id()?;

        self.catalog_mut(catalog_id)?.remove(b"Outlines");

        if items.is_empty() || page_ids.is_empty() {
            debug!(items = items.len(), pages = page_ids.len(), "nothing to outline");
            return Ok(0);
        }

        let (mut slots, roots) = self.nest_items(items, &page_ids);

        let outline_root_id = self.document.new_object_id();
        link_siblings(&roots, outline_root_id, &mut slots);
        for index in 0..slots.len() {
            let children = slots[index].children.clone();
            let (Some(first), Some(last)) = (children.first(), children.last()) else {
                continue;
            };
            let first_id = slots[*first].id;
            let last_id = slots[*last].id;
            let parent_id = slots[index].id;

            let dict = &mut slots[index].dict;
            dict.set("First", Object::Reference(first_id));
            dict.set("Last", Object::Reference(last_id));
            dict.set("Count", -(children.len() as i64));
            link_siblings(&children, parent_id, &mut slots);
        }

        let root_dict = dictionary! {
            "Type" => "Outlines",
            "First" => Object::Reference(slots[roots[0]].id),
            "Last" => Object::Reference(slots[roots[roots.len() - 1]].id),
            "Count" => roots.len() as i64,
        };
        self.document
            .objects
            .insert(outline_root_id, Object::Dictionary(root_dict));

        let written = slots.len();
        for slot in slots {
            self.document
                .objects
                .insert(slot.id, Object::Dictionary(slot.dict));
        }

        let catalog = self.catalog_mut(catalog_id)?;
        catalog.set("Outlines", Object::Reference(outline_root_id));
        catalog.set("PageMode", "UseOutlines");

        debug!(bookmarks = written, roots = roots.len(), "wrote pdf outline");
        Ok(written)
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create PDF {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.save_to(&mut writer)
            .with_context(|| format!("failed to write PDF {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush PDF {}", path.display()))
    }

    pub fn save_to<W: Write>(&mut self, target: &mut W) -> Result<()> {
        self.document.prune_objects();
        self.document
            .save_to(target)
            .context("failed to serialize PDF document")?;
        Ok(())
    }

    // Rebuilds nesting from the depth column: each item becomes a child of the
    // closest preceding item with a smaller depth.
    fn nest_items(
        &mut self,
        items: &[OutlineItem],
        page_ids: &[ObjectId],
    ) -> (Vec<OutlineSlot>, Vec<usize>) {
        let total_pages = u32::try_from(page_ids.len()).unwrap_or(u32::MAX);
        let mut slots = Vec::<OutlineSlot>::with_capacity(items.len());
        let mut roots = Vec::<usize>::new();
        let mut stack = Vec::<(usize, usize)>::new();

        for item in items {
            while stack
                .last()
                .is_some_and(|(depth, _)| *depth >= item.depth())
            {
                stack.pop();
            }

            let page_index = (clamp_page(item.page(), total_pages) - 1) as usize;
            let dest = vec![
                Object::Reference(page_ids[page_index]),
                Object::Name(FitMode::Fit.as_str().as_bytes().to_vec()),
            ];

            let index = slots.len();
            slots.push(OutlineSlot {
                id: self.document.new_object_id(),
                dict: dictionary! {
                    "Title" => text_string(item.title()),
                    "Dest" => dest,
                },
                children: Vec::new(),
            });

            match stack.last() {
                Some((_, parent)) => slots[*parent].children.push(index),
                None => roots.push(index),
            }
            stack.push((item.depth(), index));
        }

        (slots, roots)
    }

    fn catalog_id(&self) -> Result<ObjectId> {
        self.document
            .trailer
            .get(b"Root")
            .and_then(|root| root.as_reference())
            .context("PDF trailer has no /Root catalog reference")
    }

    fn catalog_mut(&mut self, catalog_id: ObjectId) -> Result<&mut Dictionary> {
        self.document
            .get_object_mut(catalog_id)
            .and_then(|catalog| catalog.as_dict_mut())
            .context("PDF catalog is not a dictionary")
    }

    #[cfg(test)]
    pub(crate) fn document(&self) -> &Document {
        &self.document
    }
}

fn link_siblings(siblings: &[usize], parent_id: ObjectId, slots: &mut [OutlineSlot]) {
    for (position, index) in siblings.iter().enumerate() {
        let prev_id = position
            .checked_sub(1)
            .map(|prev| slots[siblings[prev]].id);
        let next_id = siblings.get(position + 1).map(|next| slots[*next].id);

        let dict = &mut slots[*index].dict;
        dict.set("Parent", Object::Reference(parent_id));
        if let Some(prev_id) = prev_id {
            dict.set("Prev", Object::Reference(prev_id));
        }
        if let Some(next_id) = next_id {
            dict.set("Next", Object::Reference(next_id));
        }
    }
}

/// PDF text string: literal for ASCII, UTF-16BE with byte order mark otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
