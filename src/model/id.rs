//! Element identifiers and id-keyed entity storage.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

/// Stable identifier of a marker, path or area.
///
/// Entities reference each other only through ids; lookups go through the
/// owning [`EntityMap`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthesize a fresh id from the current time plus a random suffix.
    pub fn generate(prefix: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let suffix: u32 = rand::rng().random();
        Self(format!("{prefix}-{millis}-{suffix:08x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// Older plan files store timestamps as bare numbers.
impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Integer(n) => Self(n.to_string()),
            RawId::Float(n) => Self(n.to_string()),
        })
    }
}

/// Anything stored in an [`EntityMap`].
pub trait Entity {
    fn id(&self) -> &ElementId;
}

/// Insertion-ordered collection with O(1) lookup by id.
#[derive(Debug, Clone)]
pub struct EntityMap<T> {
    items: Vec<T>,
    index: HashMap<ElementId, usize>,
}

impl<T: Entity> EntityMap<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert an entity, replacing any existing entity with the same id in place.
    pub fn insert(&mut self, item: T) {
        match self.index.get(item.id()) {
            Some(&pos) => self.items[pos] = item,
            None => {
                self.index.insert(item.id().clone(), self.items.len());
                self.items.push(item);
            }
        }
    }

    pub fn get(&self, id: &ElementId) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut T> {
        match self.index.get(id) {
            Some(&pos) => self.items.get_mut(pos),
            None => None,
        }
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index.contains_key(id)
    }

    /// Remove an entity by id, keeping the order of the rest.
    pub fn remove(&mut self, id: &ElementId) -> Option<T> {
        let pos = self.index.remove(id)?;
        let removed = self.items.remove(pos);
        self.reindex_from(pos);
        Some(removed)
    }

    /// Remove every entity matching the predicate, returning the removed ones.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        let (removed, kept): (Vec<T>, Vec<T>) = self.items.drain(..).partition(|t| predicate(t));
        self.items = kept;
        self.index.clear();
        self.reindex_from(0);
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn reindex_from(&mut self, start: usize) {
        for (pos, item) in self.items.iter().enumerate().skip(start) {
            self.index.insert(item.id().clone(), pos);
        }
    }
}

impl<T: Entity> Default for EntityMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Index<&ElementId> for EntityMap<T> {
    type Output = T;

    /// Panics if no entity has the given id, like `HashMap` indexing.
    fn index(&self, id: &ElementId) -> &T {
        &self.items[self.index[id]]
    }
}

impl<T: Entity> FromIterator<T> for EntityMap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut map = Self::new();
        for item in iter {
            map.insert(item);
        }
        map
    }
}
