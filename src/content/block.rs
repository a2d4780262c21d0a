use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use imbl::Vector;
use tdoc::InlineStyle;

use super::{CharacterMetadata, EntityKey};
use crate::error::{ContentError, Result};
use crate::ranges::find_ranges;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockKey(Arc<str>);

impl BlockKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for BlockKey {
    fn from(key: String) -> Self {
        Self(Arc::from(key))
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One paragraph of text with an annotation entry per character.
///
/// Blocks are values. Every transform returns a new block and leaves the
/// receiver untouched; unchanged parts stay shared between the two. The
/// character list is a persistent vector, so rewriting `k` characters costs
/// `O(k log n)` instead of a copy of the whole list.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentBlock {
    key: BlockKey,
    text: Arc<str>,
    characters: Arc<Vector<CharacterMetadata>>,
}

impl ContentBlock {
    /// Creates a block whose characters carry no styles and no entity.
    pub fn new(key: impl Into<BlockKey>, text: &str) -> Self {
        let characters = text.chars().map(|_| CharacterMetadata::new()).collect();
        Self {
            key: key.into(),
            text: Arc::from(text),
            characters: Arc::new(characters),
        }
    }

    pub fn from_parts(
        key: impl Into<BlockKey>,
        text: &str,
        characters: Vec<CharacterMetadata>,
    ) -> Result<Self> {
        let key = key.into();
        check_length(&key, text.chars().count(), characters.len())?;
        Ok(Self {
            key,
            text: Arc::from(text),
            characters: Arc::new(Vector::from(characters)),
        })
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn characters(&self) -> &Vector<CharacterMetadata> {
        &self.characters
    }

    /// Length in characters, the unit all offsets are measured in.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn character_at(&self, offset: usize) -> Option<&CharacterMetadata> {
        self.characters.get(offset)
    }

    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.character_at(offset).and_then(CharacterMetadata::entity)
    }

    pub fn inline_styles_at(&self, offset: usize) -> &[InlineStyle] {
        self.character_at(offset)
            .map(CharacterMetadata::styles)
            .unwrap_or(&[])
    }

    /// Replaces the character list, keeping key and text.
    ///
    /// Fails with [`ContentError::LengthMismatch`] unless the new list has
    /// one entry per character of text.
    pub fn with_characters(&self, characters: Vec<CharacterMetadata>) -> Result<Self> {
        check_length(&self.key, self.len(), characters.len())?;
        Ok(self.with_character_vector(Vector::from(characters)))
    }

    /// Points every character in `range` at `entity`, or clears them with `None`.
    ///
    /// The range is clamped to the block.
    pub fn with_entity_range(&self, range: Range<usize>, entity: Option<EntityKey>) -> Self {
        self.map_range(range, |character| character.apply_entity(entity))
    }

    /// Drops the entity reference of every character in `range`, leaving
    /// styles alone. The range is clamped to the block.
    pub fn clear_entity_range(&self, range: Range<usize>) -> Self {
        self.map_range(range, CharacterMetadata::clear_entity)
    }

    pub fn with_style_range(&self, range: Range<usize>, style: InlineStyle) -> Self {
        self.map_range(range, |character| character.apply_style(style))
    }

    /// Reports each maximal run of characters sharing one entity reference
    /// (including runs with none) that `filter` accepts.
    pub fn find_entity_ranges<F, R>(&self, mut filter: F, found: R)
    where
        F: FnMut(&CharacterMetadata) -> bool,
        R: FnMut(usize, usize),
    {
        find_ranges(
            self.characters.iter(),
            |a, b| a.entity() == b.entity(),
            |character| filter(*character),
            found,
        );
    }

    /// Reports each maximal run of characters sharing one style set that
    /// `filter` accepts.
    pub fn find_style_ranges<F, R>(&self, mut filter: F, found: R)
    where
        F: FnMut(&CharacterMetadata) -> bool,
        R: FnMut(usize, usize),
    {
        find_ranges(
            self.characters.iter(),
            |a, b| a.same_styles(b),
            |character| filter(*character),
            found,
        );
    }

    pub fn shares_characters_with(&self, other: &ContentBlock) -> bool {
        Arc::ptr_eq(&self.characters, &other.characters)
    }

    fn map_range<F>(&self, range: Range<usize>, mut update: F) -> Self
    where
        F: FnMut(&CharacterMetadata) -> CharacterMetadata,
    {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        let mut characters = Vector::clone(&self.characters);
        for idx in start..end {
            let updated = update(&characters[idx]);
            characters.set(idx, updated);
        }
        self.with_character_vector(characters)
    }

    fn with_character_vector(&self, characters: Vector<CharacterMetadata>) -> Self {
        Self {
            key: self.key.clone(),
            text: Arc::clone(&self.text),
            characters: Arc::new(characters),
        }
    }
}

fn check_length(block: &BlockKey, text_len: usize, characters: usize) -> Result<()> {
    if text_len != characters {
        return Err(ContentError::LengthMismatch {
            block: block.clone(),
            text_len,
            characters,
        });
    }
    Ok(())
}
