//! Removal of non-mutable entities around the edges of a selection.
//!
//! An edit made with the cursor inside an immutable entity would silently
//! extend or split that entity. Before such an edit runs, the entity is
//! stripped from the whole run it covers, so the edit lands in plain text.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::content::{ContentBlock, ContentState, EntityMap, SelectionState};
use crate::error::{ContentError, Result};

/// Strips non-mutable entities that enclose either edge of `selection`.
///
/// Returns the updated state with `selection` recorded as its selection after.
/// When nothing needs trimming, the block map of `content` is shared as is.
/// When both edges sit in the same block, the end edge is examined on the
/// block the start edge already produced.
pub fn remove_entities_at_edges(
    content: &ContentState,
    selection: &SelectionState,
) -> Result<ContentState> {
    let entity_map = content.entity_map();

    let start_block = content.block_for_key(selection.start_key())?;
    let updated_start =
        remove_entity_at_offset(entity_map, start_block, selection.start_offset())?;

    let same_block = selection.start_key() == selection.end_key();
    let end_block = if same_block {
        Arc::clone(&updated_start)
    } else {
        Arc::clone(content.block_for_key(selection.end_key())?)
    };
    let updated_end = remove_entity_at_offset(entity_map, &end_block, selection.end_offset())?;

    let mut changed: Vec<Arc<ContentBlock>> = Vec::new();
    if same_block {
        if !Arc::ptr_eq(&updated_end, start_block) {
            changed.push(updated_end);
        }
    } else {
        if !Arc::ptr_eq(&updated_start, start_block) {
            changed.push(updated_start);
        }
        if !Arc::ptr_eq(&updated_end, &end_block) {
            changed.push(updated_end);
        }
    }

    if changed.is_empty() {
        trace!(block = %selection.start_key(), "no entity to trim at selection edges");
        return Ok(content.with_selection_after(selection.clone()));
    }

    Ok(content
        .merge_blocks(changed)
        .with_selection_after(selection.clone()))
}

/// Strips the entity enclosing `offset` from `block` if it is not mutable.
///
/// The entity counts as enclosing only when the characters on both sides of
/// the offset reference it; an offset at either end of the entity's run, at
/// either end of the block, or between two different entities is left alone.
/// The whole run is cleared, not just one side of the offset. An unchanged
/// block is returned as the same `Arc`.
pub fn remove_entity_at_offset(
    entity_map: &EntityMap,
    block: &Arc<ContentBlock>,
    offset: usize,
) -> Result<Arc<ContentBlock>> {
    if offset > block.len() {
        return Err(ContentError::OffsetOutOfBounds {
            block: block.key().clone(),
            offset,
            len: block.len(),
        });
    }

    let key_before = offset.checked_sub(1).and_then(|before| block.entity_at(before));
    let key_after = block.entity_at(offset);

    let Some(entity_key) = key_after.filter(|key| Some(*key) == key_before) else {
        trace!(block = %block.key(), offset, "offset is not inside an entity");
        return Ok(Arc::clone(block));
    };

    let entity = entity_map.get(entity_key)?;
    if entity.mutability().is_mutable() {
        trace!(block = %block.key(), offset, entity = %entity_key, "entity is mutable");
        return Ok(Arc::clone(block));
    }

    let mut enclosing = None;
    block.find_entity_ranges(
        |character| character.entity() == Some(entity_key),
        |start, end| {
            if start <= offset && offset <= end {
                enclosing = Some((start, end));
            }
        },
    );
    let Some((start, end)) = enclosing else {
        return Err(ContentError::MissingEntityRange {
            block: block.key().clone(),
            entity: entity_key,
            offset,
        });
    };

    debug!(
        block = %block.key(),
        entity = %entity_key,
        mutability = %entity.mutability(),
        start,
        end,
        "clearing entity enclosing selection edge"
    );
    Ok(Arc::new(block.clear_entity_range(start..end)))
}

#[cfg(test)]
#[path = "trim_tests.rs"]
mod trim_tests;
