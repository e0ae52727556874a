//! Constructor registry
//!
//! Maps derived names to typed constructor tables. Specialized containers are
//! registered here once their generated code is built into the program; the
//! factory resolves a name and a constructor shape against it instead of
//! looking types up by name at run time.

use crate::containers::{ArrayList, ConcurrentHashMap, HashMap, LinkedHashMap};
use crate::traits::{Element, Key, ListRef, ListShape, MapRef, MapShape, Value};
use log::debug;
use monoset_types::{ConstructorShape, ContainerKind, SpecializationError, SpecializationResult};
use std::any::Any;
use std::collections::HashMap as StdHashMap;

/// Constructors available for one specialized list type.
pub struct ListConstructors<T> {
    empty: Option<fn() -> ListRef<T>>,
    sized: Option<fn(usize) -> ListRef<T>>,
    from_collection: Option<fn(Vec<T>) -> ListRef<T>>,
}

impl<T: Element> ListConstructors<T> {
    pub fn new() -> Self {
        Self {
            empty: None,
            sized: None,
            from_collection: None,
        }
    }

    /// Constructors of the generic `ArrayList<T>`.
    pub fn array_list() -> Self {
        Self::new()
            .empty(|| Box::new(ArrayList::<T>::new()))
            .sized(|capacity| Box::new(ArrayList::<T>::with_capacity(capacity)))
            .from_collection(|elements| Box::new(ArrayList::from_vec(elements)))
    }

    pub fn empty(mut self, ctor: fn() -> ListRef<T>) -> Self {
        self.empty = Some(ctor);
        self
    }

    pub fn sized(mut self, ctor: fn(usize) -> ListRef<T>) -> Self {
        self.sized = Some(ctor);
        self
    }

    pub fn from_collection(mut self, ctor: fn(Vec<T>) -> ListRef<T>) -> Self {
        self.from_collection = Some(ctor);
        self
    }

    pub fn supports(&self, shape: ConstructorShape) -> bool {
        match shape {
            ConstructorShape::Empty => self.empty.is_some(),
            ConstructorShape::Sized => self.sized.is_some(),
            ConstructorShape::FromCollection => self.from_collection.is_some(),
            _ => false,
        }
    }

    /// Build a list, or hand the shape back when no constructor matches it.
    pub fn construct(&self, shape: ListShape<T>) -> Result<ListRef<T>, ListShape<T>> {
        match (shape, self) {
            (ListShape::Empty, Self { empty: Some(ctor), .. }) => Ok(ctor()),
            (ListShape::Sized(capacity), Self { sized: Some(ctor), .. }) => Ok(ctor(capacity)),
            (ListShape::From(elements), Self { from_collection: Some(ctor), .. }) => Ok(ctor(elements)),
            (shape, _) => Err(shape),
        }
    }
}

impl<T: Element> Default for ListConstructors<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Constructors available for one specialized map type.
pub struct MapConstructors<K, V> {
    empty: Option<fn() -> MapRef<K, V>>,
    sized: Option<fn(usize) -> MapRef<K, V>>,
    with_load_factor: Option<fn(usize, f32) -> MapRef<K, V>>,
    with_concurrency_level: Option<fn(usize, f32, usize) -> MapRef<K, V>>,
    from_map: Option<fn(Vec<(K, V)>) -> MapRef<K, V>>,
}

impl<K: Key, V: Value> MapConstructors<K, V> {
    pub fn new() -> Self {
        Self {
            empty: None,
            sized: None,
            with_load_factor: None,
            with_concurrency_level: None,
            from_map: None,
        }
    }

    /// Constructors of the generic implementation of `kind`.
    pub fn generic(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::OrderedHashMap => Self::new()
                .empty(|| Box::new(LinkedHashMap::<K, V>::new()))
                .sized(|c| Box::new(LinkedHashMap::<K, V>::with_capacity(c)))
                .with_load_factor(|c, lf| Box::new(LinkedHashMap::<K, V>::with_capacity_and_load_factor(c, lf)))
                .from_map(|entries| Box::new(LinkedHashMap::from_entries(entries))),
            ContainerKind::ConcurrentHashMap => Self::new()
                .empty(|| Box::new(ConcurrentHashMap::<K, V>::new()))
                .sized(|c| Box::new(ConcurrentHashMap::<K, V>::with_capacity(c)))
                .with_load_factor(|c, lf| Box::new(ConcurrentHashMap::<K, V>::with_capacity_and_load_factor(c, lf)))
                .with_concurrency_level(|c, lf, level| {
                    Box::new(ConcurrentHashMap::<K, V>::with_concurrency_level(c, lf, level))
                })
                .from_map(|entries| Box::new(ConcurrentHashMap::from_entries(entries))),
            _ => Self::new()
                .empty(|| Box::new(HashMap::<K, V>::new()))
                .sized(|c| Box::new(HashMap::<K, V>::with_capacity(c)))
                .with_load_factor(|c, lf| Box::new(HashMap::<K, V>::with_capacity_and_load_factor(c, lf)))
                .from_map(|entries| Box::new(HashMap::from_entries(entries))),
        }
    }

    pub fn empty(mut self, ctor: fn() -> MapRef<K, V>) -> Self {
        self.empty = Some(ctor);
        self
    }

    pub fn sized(mut self, ctor: fn(usize) -> MapRef<K, V>) -> Self {
        self.sized = Some(ctor);
        self
    }

    pub fn with_load_factor(mut self, ctor: fn(usize, f32) -> MapRef<K, V>) -> Self {
        self.with_load_factor = Some(ctor);
        self
    }

    pub fn with_concurrency_level(mut self, ctor: fn(usize, f32, usize) -> MapRef<K, V>) -> Self {
        self.with_concurrency_level = Some(ctor);
        self
    }

    pub fn from_map(mut self, ctor: fn(Vec<(K, V)>) -> MapRef<K, V>) -> Self {
        self.from_map = Some(ctor);
        self
    }

    pub fn supports(&self, shape: ConstructorShape) -> bool {
        match shape {
            ConstructorShape::Empty => self.empty.is_some(),
            ConstructorShape::Sized => self.sized.is_some(),
            ConstructorShape::WithLoadFactor => self.with_load_factor.is_some(),
            ConstructorShape::WithConcurrencyLevel => self.with_concurrency_level.is_some(),
            ConstructorShape::FromMap => self.from_map.is_some(),
            ConstructorShape::FromCollection => false,
        }
    }

    /// Build a map, or hand the shape back when no constructor matches it.
    pub fn construct(&self, shape: MapShape<K, V>) -> Result<MapRef<K, V>, MapShape<K, V>> {
        match shape {
            MapShape::Empty => match self.empty {
                Some(ctor) => Ok(ctor()),
                None => Err(MapShape::Empty),
            },
            MapShape::Sized(capacity) => match self.sized {
                Some(ctor) => Ok(ctor(capacity)),
                None => Err(MapShape::Sized(capacity)),
            },
            MapShape::WithLoadFactor { capacity, load_factor } => match self.with_load_factor {
                Some(ctor) => Ok(ctor(capacity, load_factor)),
                None => Err(MapShape::WithLoadFactor { capacity, load_factor }),
            },
            MapShape::WithConcurrencyLevel {
                capacity,
                load_factor,
                concurrency_level,
            } => match self.with_concurrency_level {
                Some(ctor) => Ok(ctor(capacity, load_factor, concurrency_level)),
                None => Err(MapShape::WithConcurrencyLevel {
                    capacity,
                    load_factor,
                    concurrency_level,
                }),
            },
            MapShape::From(entries) => match self.from_map {
                Some(ctor) => Ok(ctor(entries)),
                None => Err(MapShape::From(entries)),
            },
        }
    }
}

impl<K: Key, V: Value> Default for MapConstructors<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

struct RegistryEntry {
    kind: ContainerKind,
    constructors: Box<dyn Any + Send + Sync>,
}

/// Derived name -> constructor table.
#[derive(Default)]
pub struct Registry {
    entries: StdHashMap<String, RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a specialized list. A later registration under the same name
    /// replaces the earlier one.
    pub fn register_list<T: Element>(&mut self, class_name: impl Into<String>, constructors: ListConstructors<T>) {
        let class_name = class_name.into();
        debug!("registering list constructors for {}", class_name);
        self.entries.insert(
            class_name,
            RegistryEntry {
                kind: ContainerKind::List,
                constructors: Box::new(constructors),
            },
        );
    }

    /// Register a specialized map of the given map kind.
    pub fn register_map<K: Key, V: Value>(
        &mut self,
        kind: ContainerKind,
        class_name: impl Into<String>,
        constructors: MapConstructors<K, V>,
    ) {
        let class_name = class_name.into();
        debug!("registering {} constructors for {}", kind, class_name);
        self.entries.insert(
            class_name,
            RegistryEntry {
                kind,
                constructors: Box::new(constructors),
            },
        );
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.entries.contains_key(class_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Find the list constructors for `class_name` that accept `shape`.
    pub fn resolve_list<T: Element>(
        &self,
        class_name: &str,
        shape: ConstructorShape,
    ) -> SpecializationResult<&ListConstructors<T>> {
        let entry = self.entry(class_name, ContainerKind::List)?;
        let constructors = entry
            .constructors
            .downcast_ref::<ListConstructors<T>>()
            .ok_or_else(|| type_mismatch(class_name))?;
        if !constructors.supports(shape) {
            return Err(missing_shape(class_name, shape));
        }
        Ok(constructors)
    }

    /// Find the map constructors for `class_name` that accept `shape`.
    pub fn resolve_map<K: Key, V: Value>(
        &self,
        kind: ContainerKind,
        class_name: &str,
        shape: ConstructorShape,
    ) -> SpecializationResult<&MapConstructors<K, V>> {
        let entry = self.entry(class_name, kind)?;
        let constructors = entry
            .constructors
            .downcast_ref::<MapConstructors<K, V>>()
            .ok_or_else(|| type_mismatch(class_name))?;
        if !constructors.supports(shape) {
            return Err(missing_shape(class_name, shape));
        }
        Ok(constructors)
    }

    fn entry(&self, class_name: &str, kind: ContainerKind) -> SpecializationResult<&RegistryEntry> {
        let entry = self
            .entries
            .get(class_name)
            .ok_or_else(|| SpecializationError::ResolutionFailed {
                class_name: class_name.to_string(),
                reason: "no constructors registered under this name".to_string(),
            })?;
        if entry.kind != kind {
            return Err(SpecializationError::ResolutionFailed {
                class_name: class_name.to_string(),
                reason: format!("registered as {}, requested as {}", entry.kind, kind),
            });
        }
        Ok(entry)
    }
}

fn type_mismatch(class_name: &str) -> SpecializationError {
    SpecializationError::ResolutionFailed {
        class_name: class_name.to_string(),
        reason: "registered for different element types".to_string(),
    }
}

fn missing_shape(class_name: &str, shape: ConstructorShape) -> SpecializationError {
    SpecializationError::ResolutionFailed {
        class_name: class_name.to_string(),
        reason: format!("no {} constructor", shape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_list() {
        let mut registry = Registry::new();
        registry.register_list::<i32>("ArrayListInteger", ListConstructors::array_list());

        let ctors = registry
            .resolve_list::<i32>("ArrayListInteger", ConstructorShape::Empty)
            .unwrap();
        let mut list = ctors.construct(ListShape::Empty).ok().unwrap();
        list.add(5);
        assert_eq!(list.get(0), Some(&5));
    }

    #[test]
    fn test_resolve_unknown_name_fails() {
        let registry = Registry::new();
        let err = registry
            .resolve_list::<i32>("ArrayListInteger", ConstructorShape::Empty)
            .err()
            .unwrap();
        assert_eq!(err.code(), "M005");
    }

    #[test]
    fn test_resolve_with_wrong_types_fails() {
        let mut registry = Registry::new();
        registry.register_list::<i32>("ArrayListInteger", ListConstructors::array_list());
        assert!(registry
            .resolve_list::<i64>("ArrayListInteger", ConstructorShape::Empty)
            .is_err());
    }

    #[test]
    fn test_resolve_missing_shape_fails() {
        let mut registry = Registry::new();
        registry.register_list::<i32>(
            "ArrayListInteger",
            ListConstructors::new().empty(|| Box::new(ArrayList::<i32>::new())),
        );
        assert!(registry
            .resolve_list::<i32>("ArrayListInteger", ConstructorShape::Sized)
            .is_err());

        let ctors = registry
            .resolve_list::<i32>("ArrayListInteger", ConstructorShape::Empty)
            .unwrap();
        assert!(ctors.construct(ListShape::Sized(3)).is_err());
    }

    #[test]
    fn test_resolve_map_checks_kind() {
        let mut registry = Registry::new();
        registry.register_map::<String, i32>(
            ContainerKind::HashMap,
            "HashMapStringInteger",
            MapConstructors::generic(ContainerKind::HashMap),
        );
        assert!(registry
            .resolve_map::<String, i32>(
                ContainerKind::ConcurrentHashMap,
                "HashMapStringInteger",
                ConstructorShape::Empty
            )
            .is_err());

        let ctors = registry
            .resolve_map::<String, i32>(ContainerKind::HashMap, "HashMapStringInteger", ConstructorShape::FromMap)
            .unwrap();
        let map = ctors.construct(MapShape::From(vec![("a".to_string(), 1)])).ok().unwrap();
        assert_eq!(map.get(&"a".to_string()), Some(1));
        assert_eq!(registry.names(), vec!["HashMapStringInteger"]);
    }

    #[test]
    fn test_generic_hash_map_has_no_concurrency_constructor() {
        let ctors = MapConstructors::<i32, i32>::generic(ContainerKind::HashMap);
        assert!(!ctors.supports(ConstructorShape::WithConcurrencyLevel));
        let ctors = MapConstructors::<i32, i32>::generic(ContainerKind::ConcurrentHashMap);
        assert!(ctors.supports(ConstructorShape::WithConcurrencyLevel));
    }
}
