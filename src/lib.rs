pub mod content;
pub mod error;
pub mod import;
pub mod ranges;
pub mod trim;

pub use content::{
    BlockKey, CharacterMetadata, ContentBlock, ContentState, EntityInstance, EntityKey, EntityMap,
    Mutability, SelectionState,
};
pub use error::ContentError;
pub use import::ImportOptions;
pub use trim::{remove_entities_at_edges, remove_entity_at_offset};
