use thiserror::Error;

use crate::content::{BlockKey, EntityKey};

/// Failures raised while resolving or trimming content.
///
/// None of these are recoverable user errors. They signal a selection that does
/// not fit the document or a document whose entity references are broken, and
/// the operation that hit them is abandoned without producing a new state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("no block with key {0}")]
    UnknownBlock(BlockKey),

    #[error("block key {0} is used more than once")]
    DuplicateBlock(BlockKey),

    #[error("offset {offset} is outside block {block} of length {len}")]
    OffsetOutOfBounds {
        block: BlockKey,
        offset: usize,
        len: usize,
    },

    #[error("block {block} has {characters} character entries for {text_len} characters of text")]
    LengthMismatch {
        block: BlockKey,
        text_len: usize,
        characters: usize,
    },

    #[error("entity {0} is referenced but not present in the entity map")]
    UnknownEntity(EntityKey),

    #[error("no range of entity {entity} in block {block} contains offset {offset}")]
    MissingEntityRange {
        block: BlockKey,
        entity: EntityKey,
        offset: usize,
    },
}

pub type Result<T, E = ContentError> = std::result::Result<T, E>;
