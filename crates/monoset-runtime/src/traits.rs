//! Abstract container capabilities
//!
//! Every container handed out by a factory, generic or specialized, is used
//! only through these traits. Callers never see the concrete type.

use monoset_types::ConstructorShape;
use std::fmt::Debug;
use std::hash::Hash;

/// Load factor used when none (or an unusable one) is given.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Concurrency level used by concurrent maps when none is given.
pub const DEFAULT_CONCURRENCY_LEVEL: usize = 16;

/// Largest shard count a concurrent map is built with.
pub const MAX_CONCURRENCY_LEVEL: usize = 1 << 16;

/// Anything that can be stored in a container.
pub trait Element: Clone + PartialEq + Debug + 'static {}

impl<T: Clone + PartialEq + Debug + 'static> Element for T {}

/// Map keys.
pub trait Key: Element + Eq + Hash {}

impl<T: Element + Eq + Hash> Key for T {}

/// Map values.
pub trait Value: Element {}

impl<T: Element> Value for T {}

/// Replace a non-finite or non-positive load factor by the default.
pub fn normalize_load_factor(load_factor: f32) -> f32 {
    if load_factor.is_finite() && load_factor > 0.0 {
        load_factor
    } else {
        DEFAULT_LOAD_FACTOR
    }
}

/// Number of entries to reserve for a requested bucket capacity.
pub fn reserved_entries(capacity: usize, load_factor: f32) -> usize {
    let load_factor = normalize_load_factor(load_factor).min(1.0);
    (capacity as f64 * load_factor as f64).ceil() as usize
}

/// Ordered, index-addressable sequence.
pub trait AbstractList<T: Element> {
    /// Name of the concrete type (the derived name for specialized lists).
    fn type_name(&self) -> &'static str;

    /// Append an element.
    fn add(&mut self, element: T);

    /// Insert at `index`, shifting later elements. Returns false when
    /// `index > len`.
    fn insert(&mut self, index: usize, element: T) -> bool;

    fn get(&self, index: usize) -> Option<&T>;

    /// Replace the element at `index`, returning the previous one.
    fn set(&mut self, index: usize, element: T) -> Option<T>;

    /// Remove the element at `index`, shifting later elements.
    fn remove(&mut self, index: usize) -> Option<T>;

    fn len(&self) -> usize;

    fn clear(&mut self);

    fn index_of(&self, element: &T) -> Option<usize>;

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, element: &T) -> bool {
        self.index_of(element).is_some()
    }

    fn add_all(&mut self, elements: Vec<T>) {
        for element in elements {
            self.add(element);
        }
    }

    fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Element-wise equality, independent of the concrete type.
    fn equals(&self, other: &dyn AbstractList<T>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

/// Key to value association.
///
/// `entries` defines the iteration order: insertion order for ordered maps,
/// unspecified otherwise.
pub trait AbstractMap<K: Key, V: Value> {
    fn type_name(&self) -> &'static str;

    /// Associate `value` with `key`, returning the previous value.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    fn get(&self, key: &K) -> Option<V>;

    fn contains_key(&self, key: &K) -> bool;

    fn remove(&mut self, key: &K) -> Option<V>;

    fn len(&self) -> usize;

    fn clear(&mut self);

    fn entries(&self) -> Vec<(K, V)>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn keys(&self) -> Vec<K> {
        self.entries().into_iter().map(|(k, _)| k).collect()
    }

    fn values(&self) -> Vec<V> {
        self.entries().into_iter().map(|(_, v)| v).collect()
    }

    fn put_all(&mut self, entries: Vec<(K, V)>) {
        for (key, value) in entries {
            self.put(key, value);
        }
    }

    /// Same key set with equal values, independent of order and concrete type.
    fn equals(&self, other: &dyn AbstractMap<K, V>) -> bool {
        self.len() == other.len()
            && self
                .entries()
                .iter()
                .all(|(k, v)| other.get(k).as_ref() == Some(v))
    }
}

/// Boxed list as returned by factories.
pub type ListRef<T> = Box<dyn AbstractList<T>>;

/// Boxed map as returned by factories.
pub type MapRef<K, V> = Box<dyn AbstractMap<K, V>>;

/// Constructor arguments for a list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListShape<T> {
    Empty,
    Sized(usize),
    From(Vec<T>),
}

impl<T> ListShape<T> {
    pub fn signature(&self) -> ConstructorShape {
        match self {
            ListShape::Empty => ConstructorShape::Empty,
            ListShape::Sized(_) => ConstructorShape::Sized,
            ListShape::From(_) => ConstructorShape::FromCollection,
        }
    }
}

/// Constructor arguments for a map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapShape<K, V> {
    Empty,
    Sized(usize),
    WithLoadFactor {
        capacity: usize,
        load_factor: f32,
    },
    WithConcurrencyLevel {
        capacity: usize,
        load_factor: f32,
        concurrency_level: usize,
    },
    From(Vec<(K, V)>),
}

impl<K, V> MapShape<K, V> {
    pub fn signature(&self) -> ConstructorShape {
        match self {
            MapShape::Empty => ConstructorShape::Empty,
            MapShape::Sized(_) => ConstructorShape::Sized,
            MapShape::WithLoadFactor { .. } => ConstructorShape::WithLoadFactor,
            MapShape::WithConcurrencyLevel { .. } => ConstructorShape::WithConcurrencyLevel,
            MapShape::From(_) => ConstructorShape::FromMap,
        }
    }
}
