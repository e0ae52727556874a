//! Sharded hash map for concurrent use.

use crate::dashmap::DashMap;
use crate::traits::{
    normalize_load_factor, reserved_entries, AbstractMap, Key, Value, DEFAULT_CONCURRENCY_LEVEL, DEFAULT_LOAD_FACTOR,
    MAX_CONCURRENCY_LEVEL,
};

pub struct ConcurrentHashMap<K, V> {
    table: DashMap<K, V>,
    load_factor: f32,
    concurrency_level: usize,
}

impl<K: Key, V: Value> ConcurrentHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_concurrency_level(0, DEFAULT_LOAD_FACTOR, DEFAULT_CONCURRENCY_LEVEL)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_concurrency_level(capacity, DEFAULT_LOAD_FACTOR, DEFAULT_CONCURRENCY_LEVEL)
    }

    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        Self::with_concurrency_level(capacity, load_factor, DEFAULT_CONCURRENCY_LEVEL)
    }

    /// `concurrency_level` is rounded up to a power of two shard count,
    /// between 2 and [`MAX_CONCURRENCY_LEVEL`].
    pub fn with_concurrency_level(capacity: usize, load_factor: f32, concurrency_level: usize) -> Self {
        let load_factor = normalize_load_factor(load_factor);
        let shards = concurrency_level.clamp(2, MAX_CONCURRENCY_LEVEL).next_power_of_two();
        Self {
            table: DashMap::with_capacity_and_shard_amount(reserved_entries(capacity, load_factor), shards),
            load_factor,
            concurrency_level: shards,
        }
    }

    pub fn from_entries(entries: Vec<(K, V)>) -> Self {
        let map = Self::with_capacity(entries.len());
        for (key, value) in entries {
            map.table.insert(key, value);
        }
        map
    }

    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub fn concurrency_level(&self) -> usize {
        self.concurrency_level
    }

    /// Insert through a shared reference.
    pub fn put_shared(&self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Look up through a shared reference.
    pub fn get_shared(&self, key: &K) -> Option<V> {
        self.table.get(key).map(|entry| entry.value().clone())
    }
}

impl<K: Key, V: Value> Default for ConcurrentHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, V: Value> AbstractMap<K, V> for ConcurrentHashMap<K, V> {
    fn type_name(&self) -> &'static str {
        stringify!(ConcurrentHashMap)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.get_shared(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.table.remove(key).map(|(_, v)| v)
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
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
