use std::sync::Arc;

use imbl::{HashMap, Vector};

use crate::error::{ContentError, Result};

mod block;
mod character;
mod entity;
mod selection;

pub use block::{BlockKey, ContentBlock};
pub use character::{CharacterMetadata, inline_style_label};
pub use entity::{EntityInstance, EntityKey, EntityMap, Mutability};
pub use selection::SelectionState;

/// Blocks in document order, held in persistent collections so that
/// replacing or appending a block costs `O(log n)` and leaves the previous
/// map intact.
#[derive(Clone, Debug, Default)]
struct BlockMap {
    order: Vector<BlockKey>,
    blocks: HashMap<BlockKey, Arc<ContentBlock>>,
}

impl BlockMap {
    /// Stores `block` under its key. Returns `false` if the key was taken,
    /// in which case the previous block is replaced in place.
    fn insert(&mut self, block: Arc<ContentBlock>) -> bool {
        let key = block.key().clone();
        let fresh = self.blocks.insert(key.clone(), block).is_none();
        if fresh {
            self.order.push_back(key);
        }
        fresh
    }

    fn get(&self, key: &BlockKey) -> Option<&Arc<ContentBlock>> {
        self.blocks.get(key)
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn values(&self) -> impl Iterator<Item = &Arc<ContentBlock>> {
        self.order.iter().filter_map(|key| self.blocks.get(key))
    }
}

/// An immutable snapshot of a document: its blocks in order, the entities they
/// reference and the selections recorded around the edit that produced it.
///
/// Cloning a state is cheap. Updates return a new state that shares every
/// block it did not touch with the old one, so older snapshots stay valid for
/// undo history.
#[derive(Clone, Debug)]
pub struct ContentState {
    block_map: Arc<BlockMap>,
    entity_map: EntityMap,
    selection_before: SelectionState,
    selection_after: SelectionState,
}

impl ContentState {
    /// Builds a state from blocks and the entities they reference.
    ///
    /// A document always has a block to put the cursor in, so an empty list
    /// yields a single empty block. Two blocks with the same key are rejected
    /// with [`ContentError::DuplicateBlock`].
    pub fn from_blocks(
        blocks: impl IntoIterator<Item = ContentBlock>,
        entity_map: EntityMap,
    ) -> Result<Self> {
        let mut block_map = BlockMap::default();
        for block in blocks {
            let key = block.key().clone();
            if !block_map.insert(Arc::new(block)) {
                return Err(ContentError::DuplicateBlock(key));
            }
        }
        Ok(Self::with_block_map(block_map, entity_map))
    }

    /// Builds a state with one unstyled block per line, keyed `b0`, `b1`, ...
    pub fn from_text(text: &str) -> Self {
        let mut block_map = BlockMap::default();
        for (idx, line) in text.split('\n').enumerate() {
            block_map.insert(Arc::new(ContentBlock::new(format!("b{idx}"), line)));
        }
        Self::with_block_map(block_map, EntityMap::new())
    }

    fn with_block_map(mut block_map: BlockMap, entity_map: EntityMap) -> Self {
        if block_map.is_empty() {
            block_map.insert(Arc::new(ContentBlock::new("b0", "")));
        }
        let first_key = block_map
            .order
            .front()
            .cloned()
            .unwrap_or_else(|| BlockKey::from("b0"));
        let selection = SelectionState::collapsed(first_key, 0);
        Self {
            block_map: Arc::new(block_map),
            entity_map,
            selection_before: selection.clone(),
            selection_after: selection,
        }
    }

    pub fn block_for_key(&self, key: &BlockKey) -> Result<&Arc<ContentBlock>> {
        self.block_map
            .get(key)
            .ok_or_else(|| ContentError::UnknownBlock(key.clone()))
    }

    pub fn get_block(&self, key: &BlockKey) -> Option<&ContentBlock> {
        self.block_map.get(key).map(Arc::as_ref)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.block_map.values().map(Arc::as_ref)
    }

    pub fn block_keys(&self) -> impl Iterator<Item = &BlockKey> {
        self.block_map.order.iter()
    }

    pub fn block_count(&self) -> usize {
        self.block_map.len()
    }

    pub fn entity_map(&self) -> &EntityMap {
        &self.entity_map
    }

    pub fn entity(&self, key: EntityKey) -> Result<&EntityInstance> {
        self.entity_map.get(key)
    }

    pub fn selection_before(&self) -> &SelectionState {
        &self.selection_before
    }

    pub fn selection_after(&self) -> &SelectionState {
        &self.selection_after
    }

    /// Registers a new entity and returns the updated state with its key.
    pub fn create_entity(&self, instance: EntityInstance) -> (Self, EntityKey) {
        let mut next = self.clone();
        let key = next.entity_map.add(instance);
        (next, key)
    }

    pub fn with_selection_before(&self, selection: SelectionState) -> Self {
        Self {
            selection_before: selection,
            ..self.clone()
        }
    }

    pub fn with_selection_after(&self, selection: SelectionState) -> Self {
        Self {
            selection_after: selection,
            ..self.clone()
        }
    }

    /// Replaces blocks by key, keeping their position in the document.
    ///
    /// Blocks whose key is not yet present are appended. Blocks passed as an
    /// `Arc` are stored as given, so the caller's pointer stays the map entry.
    pub fn merge_blocks<B>(&self, blocks: impl IntoIterator<Item = B>) -> Self
    where
        B: Into<Arc<ContentBlock>>,
    {
        let mut next = self.clone();
        let block_map = Arc::make_mut(&mut next.block_map);
        for block in blocks {
            block_map.insert(block.into());
        }
        next
    }

    pub fn plain_text(&self) -> String {
        self.blocks()
            .map(ContentBlock::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether both states hold the very same block map, not merely equal ones.
    pub fn shares_block_map_with(&self, other: &ContentState) -> bool {
        Arc::ptr_eq(&self.block_map, &other.block_map)
    }

    pub fn shares_block_with(&self, other: &ContentState, key: &BlockKey) -> bool {
        match (self.block_map.get(key), other.block_map.get(key)) {
            (Some(left), Some(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod content_tests;
