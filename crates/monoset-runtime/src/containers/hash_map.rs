//! Unordered hash map.
//!
//! Generic source for `HashMap` specializations. The standard map is imported
//! under another name so that renaming `HashMap` never touches it.

use crate::traits::{normalize_load_factor, reserved_entries, AbstractMap, Key, Value, DEFAULT_LOAD_FACTOR};
use std::collections::HashMap as StdHashMap;

#[derive(Debug, Clone)]
pub struct HashMap<K, V> {
    table: StdHashMap<K, V>,
    load_factor: f32,
}

impl<K: Key, V: Value> HashMap<K, V> {
    pub fn new() -> Self {
        Self {
            table: StdHashMap::new(),
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR)
    }

    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        let load_factor = normalize_load_factor(load_factor);
        Self {
            table: StdHashMap::with_capacity(reserved_entries(capacity, load_factor)),
            load_factor,
        }
    }

    /// Copy entries; a key given twice keeps its last value.
    pub fn from_entries(entries: Vec<(K, V)>) -> Self {
        let mut map = Self::with_capacity(entries.len());
        for (key, value) in entries {
            map.table.insert(key, value);
        }
        map
    }

    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub fn get_ref(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }
}

impl<K: Key, V: Value> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, V: Value> AbstractMap<K, V> for HashMap<K, V> {
    fn type_name(&self) -> &'static str {
        stringify!(HashMap)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.table.get(key).cloned()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.table.remove(key)
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn clear(&mut self) {
        self.table.clear();
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.table
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
