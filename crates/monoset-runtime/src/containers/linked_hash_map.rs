//! Insertion-ordered hash map.
//!
//! Values live in a `HashMap<K, V>`; a separate key set remembers insertion
//! order. Re-inserting a present key keeps its position, removing and
//! inserting it again moves it to the end.

use crate::containers::hash_map::HashMap;
use crate::indexmap::IndexSet;
use crate::traits::{AbstractMap, Key, Value};

#[derive(Debug, Clone)]
pub struct LinkedHashMap<K, V> {
    base: HashMap<K, V>,
    order: IndexSet<K>,
}

impl<K: Key, V: Value> LinkedHashMap<K, V> {
    pub fn new() -> Self {
        Self {
            base: HashMap::new(),
            order: IndexSet::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            base: HashMap::with_capacity(capacity),
            order: IndexSet::with_capacity(capacity),
        }
    }

    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        Self {
            base: HashMap::with_capacity_and_load_factor(capacity, load_factor),
            order: IndexSet::with_capacity(capacity),
        }
    }

    pub fn from_entries(entries: Vec<(K, V)>) -> Self {
        let mut map = Self::with_capacity(entries.len());
        map.put_all(entries);
        map
    }

    /// Oldest entry still present.
    pub fn first(&self) -> Option<(K, V)> {
        let key = self.order.first()?;
        self.base.get_ref(key).map(|v| (key.clone(), v.clone()))
    }
}

impl<K: Key, V: Value> Default for LinkedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, V: Value> AbstractMap<K, V> for LinkedHashMap<K, V> {
    fn type_name(&self) -> &'static str {
        stringify!(LinkedHashMap)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.base.put(key.clone(), value);
        if previous.is_none() {
            self.order.insert(key);
        }
        previous
    }

    fn get(&self, key: &K) -> Option<V> {
        self.base.get(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.base.contains_key(key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.base.remove(key)?;
        self.order.shift_remove(key);
        Some(removed)
    }

    fn len(&self) -> usize {
        self.base.len()
    }

    fn clear(&mut self) {
        self.base.clear();
        self.order.clear();
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.order
            .iter()
            .filter_map(|k| self.base.get_ref(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }
}
