//! Conversion of `tdoc` documents into block content.
//!
//! Every leaf paragraph and checklist item becomes one block. Inline styles
//! are flattened onto the characters they cover and each link span becomes
//! an entity referenced by all of its characters.

use tdoc::{ChecklistItem, Document, InlineStyle, Paragraph, ParagraphType, Span};
use tracing::debug;

use crate::content::{
    CharacterMetadata, ContentBlock, ContentState, EntityInstance, EntityKey, EntityMap,
    Mutability,
};
use crate::error::Result;

pub const LINK_URL_FIELD: &str = "url";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportOptions {
    /// Mutability given to the entities created for links.
    pub link_mutability: Mutability,
    /// Entity type given to the entities created for links.
    pub link_entity_type: String,
    /// Whether nested paragraphs, list entries and checklist items become
    /// blocks as well. Otherwise only top-level leaf paragraphs are imported.
    pub flatten_nested: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            link_mutability: Mutability::Mutable,
            link_entity_type: "LINK".to_string(),
            flatten_nested: true,
        }
    }
}

impl ImportOptions {
    pub fn with_link_mutability(mut self, mutability: Mutability) -> Self {
        self.link_mutability = mutability;
        self
    }

    pub fn with_link_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.link_entity_type = entity_type.into();
        self
    }

    pub fn with_flatten_nested(mut self, flatten_nested: bool) -> Self {
        self.flatten_nested = flatten_nested;
        self
    }
}

impl ContentState {
    pub fn from_document(document: &Document, options: &ImportOptions) -> Result<Self> {
        let mut importer = Importer {
            options,
            entity_map: EntityMap::new(),
            blocks: Vec::new(),
        };
        for paragraph in &document.paragraphs {
            importer.paragraph(paragraph, true)?;
        }
        debug!(
            blocks = importer.blocks.len(),
            entities = importer.entity_map.len(),
            "imported document"
        );
        ContentState::from_blocks(importer.blocks, importer.entity_map)
    }
}

struct Importer<'a> {
    options: &'a ImportOptions,
    entity_map: EntityMap,
    blocks: Vec<ContentBlock>,
}

#[derive(Default)]
struct BlockBuilder {
    text: String,
    characters: Vec<CharacterMetadata>,
}

impl Importer<'_> {
    fn paragraph(&mut self, paragraph: &Paragraph, is_root: bool) -> Result<()> {
        if !is_root && !self.options.flatten_nested {
            return Ok(());
        }
        if paragraph.paragraph_type().is_leaf() {
            let builder = self.spans(paragraph.content());
            self.push_block(builder)?;
        }
        for child in paragraph.children() {
            self.paragraph(child, false)?;
        }
        for entry in paragraph.entries() {
            for child in entry {
                self.paragraph(child, false)?;
            }
        }
        if paragraph.paragraph_type() == ParagraphType::Checklist {
            for item in paragraph.checklist_items() {
                self.checklist_item(item)?;
            }
        }
        Ok(())
    }

    fn checklist_item(&mut self, item: &ChecklistItem) -> Result<()> {
        if !self.options.flatten_nested {
            return Ok(());
        }
        let builder = self.spans(&item.content);
        self.push_block(builder)?;
        for child in &item.children {
            self.checklist_item(child)?;
        }
        Ok(())
    }

    fn spans(&mut self, spans: &[Span]) -> BlockBuilder {
        let mut builder = BlockBuilder::default();
        let mut styles = Vec::new();
        for span in spans {
            self.span(span, &mut styles, None, &mut builder);
        }
        builder
    }

    fn span(
        &mut self,
        span: &Span,
        styles: &mut Vec<InlineStyle>,
        entity: Option<EntityKey>,
        builder: &mut BlockBuilder,
    ) {
        let entity = match (&span.link_target, span.style) {
            (Some(target), InlineStyle::Link) => {
                let options = self.options;
                let instance =
                    EntityInstance::new(&options.link_entity_type, options.link_mutability)
                        .with_data(LINK_URL_FIELD, target.as_str());
                Some(self.entity_map.add(instance))
            }
            _ => entity,
        };

        let pushed = span.style != InlineStyle::None;
        if pushed {
            styles.push(span.style);
        }

        let metadata = CharacterMetadata::new()
            .with_styles(styles.iter().copied())
            .with_entity(entity);
        for ch in span.text.chars() {
            builder.text.push(ch);
            builder.characters.push(metadata.clone());
        }
        for child in &span.children {
            self.span(child, styles, entity, builder);
        }

        if pushed {
            styles.pop();
        }
    }

    fn push_block(&mut self, builder: BlockBuilder) -> Result<()> {
        let key = format!("b{}", self.blocks.len());
        let block = ContentBlock::from_parts(key, &builder.text, builder.characters)?;
        self.blocks.push(block);
        Ok(())
    }
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod import_tests;
