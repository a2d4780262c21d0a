use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ContentError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey(u64);

impl EntityKey {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an entity reacts to edits touching its text.
///
/// Mutable entities may grow or shrink with the text. Immutable ones are atomic
/// and are removed rather than partially edited. Segmented entities behave like
/// immutable ones as far as boundary trimming is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mutability {
    #[default]
    Mutable,
    Immutable,
    Segmented,
}

impl Mutability {
    pub fn is_mutable(self) -> bool {
        self == Mutability::Mutable
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mutability::Mutable => "MUTABLE",
            Mutability::Immutable => "IMMUTABLE",
            Mutability::Segmented => "SEGMENTED",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityInstance {
    entity_type: String,
    mutability: Mutability,
    data: BTreeMap<String, String>,
}

impl EntityInstance {
    pub fn new(entity_type: impl Into<String>, mutability: Mutability) -> Self {
        Self {
            entity_type: entity_type.into(),
            mutability,
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }
}

/// Entity records keyed by the references stored on characters.
///
/// Cloning is cheap; the records are shared until one side writes.
#[derive(Clone, Debug, Default)]
pub struct EntityMap {
    entries: Arc<BTreeMap<EntityKey, EntityInstance>>,
    next_key: u64,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `instance` under a fresh key and returns that key.
    pub fn add(&mut self, instance: EntityInstance) -> EntityKey {
        self.next_key += 1;
        let key = EntityKey(self.next_key);
        Arc::make_mut(&mut self.entries).insert(key, instance);
        key
    }

    /// Looks up a key that a character refers to.
    ///
    /// A missing record means the document is corrupt, so this is an error
    /// rather than an empty result.
    pub fn get(&self, key: EntityKey) -> Result<&EntityInstance> {
        self.entries
            .get(&key)
            .ok_or(ContentError::UnknownEntity(key))
    }

    pub fn try_get(&self, key: EntityKey) -> Option<&EntityInstance> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &EntityInstance)> {
        self.entries.iter().map(|(key, instance)| (*key, instance))
    }

    /// Adds or overwrites the given data fields of an entity.
    pub fn merge_data<I, K, V>(&mut self, key: EntityKey, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let instance = self.get_mut(key)?;
        for (field, value) in fields {
            instance.data.insert(field.into(), value.into());
        }
        Ok(())
    }

    /// Replaces the entire data map of an entity.
    pub fn replace_data(&mut self, key: EntityKey, data: BTreeMap<String, String>) -> Result<()> {
        self.get_mut(key)?.data = data;
        Ok(())
    }

    pub fn shares_entries_with(&self, other: &EntityMap) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    fn get_mut(&mut self, key: EntityKey) -> Result<&mut EntityInstance> {
        if !self.entries.contains_key(&key) {
            return Err(ContentError::UnknownEntity(key));
        }
        Arc::make_mut(&mut self.entries)
            .get_mut(&key)
            .ok_or(ContentError::UnknownEntity(key))
    }
}
