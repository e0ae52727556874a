//! Container factories
//!
//! [`CollectionFactory`] is the only API callers program against. It hands
//! out boxed containers typed by the abstract traits, so callers never see
//! whether they got a specialized or a generic implementation.
//!
//! - [`GenericFactory`] always builds the generic containers.
//! - [`SpecializedFactory`] runs the specialization pipeline, resolves the
//!   derived name in its registry and falls back to the generic container
//!   when any stage fails.
//! - [`FactoryHandle`] picks one of the two from configuration and is what
//!   applications pass around.

use crate::cache::{CacheEntry, SpecializationCache};
use crate::config::SpecializerConfig;
use crate::pipeline::{Pipeline, PipelineState, StageFailure};
use log::{debug, info, warn};
use monoset_runtime::{
    ArrayList, ConcurrentHashMap, Element, HashMap, Key, LinkedHashMap, ListRef, ListShape, MapRef, MapShape, Registry,
    Value,
};
use monoset_types::{derive_class_name, ContainerKind, SpecializationError, Stage, TypeToken};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Creates lists and maps for caller-supplied type tokens.
///
/// The type token names the type for code generation; `T` (or `K`, `V`) is
/// the Rust type the caller stores. A token that does not correspond to the
/// Rust type makes the specialized lookup fail, and the generic container is
/// returned instead.
pub trait CollectionFactory {
    fn list<T: Element>(&self, element: &TypeToken, shape: ListShape<T>) -> ListRef<T>;

    /// `kind` selects the map implementation; `ContainerKind::List` is
    /// treated as a plain hash map.
    fn map<K: Key, V: Value>(
        &self,
        kind: ContainerKind,
        key: &TypeToken,
        value: &TypeToken,
        shape: MapShape<K, V>,
    ) -> MapRef<K, V>;

    fn new_list<T: Element>(&self, element: &TypeToken) -> ListRef<T> {
        self.list(element, ListShape::Empty)
    }

    fn new_list_with_capacity<T: Element>(&self, element: &TypeToken, capacity: usize) -> ListRef<T> {
        self.list(element, ListShape::Sized(capacity))
    }

    fn new_list_from<T: Element>(&self, element: &TypeToken, elements: Vec<T>) -> ListRef<T> {
        self.list(element, ListShape::From(elements))
    }

    fn new_map<K: Key, V: Value>(&self, key: &TypeToken, value: &TypeToken) -> MapRef<K, V> {
        self.map(ContainerKind::HashMap, key, value, MapShape::Empty)
    }

    fn new_map_with_capacity<K: Key, V: Value>(&self, key: &TypeToken, value: &TypeToken, capacity: usize) -> MapRef<K, V> {
        self.map(ContainerKind::HashMap, key, value, MapShape::Sized(capacity))
    }

    fn new_map_with_load_factor<K: Key, V: Value>(
        &self,
        key: &TypeToken,
        value: &TypeToken,
        capacity: usize,
        load_factor: f32,
    ) -> MapRef<K, V> {
        self.map(
            ContainerKind::HashMap,
            key,
            value,
            MapShape::WithLoadFactor { capacity, load_factor },
        )
    }

    fn new_map_from<K: Key, V: Value>(&self, key: &TypeToken, value: &TypeToken, entries: Vec<(K, V)>) -> MapRef<K, V> {
        self.map(ContainerKind::HashMap, key, value, MapShape::From(entries))
    }

    fn new_ordered_map<K: Key, V: Value>(&self, key: &TypeToken, value: &TypeToken) -> MapRef<K, V> {
        self.map(ContainerKind::OrderedHashMap, key, value, MapShape::Empty)
    }

    fn new_ordered_map_with_capacity<K: Key, V: Value>(
        &self,
        key: &TypeToken,
        value: &TypeToken,
        capacity: usize,
    ) -> MapRef<K, V> {
        self.map(ContainerKind::OrderedHashMap, key, value, MapShape::Sized(capacity))
    }

    fn new_ordered_map_with_load_factor<K: Key, V: Value>(
        &self,
        key: &TypeToken,
        value: &TypeToken,
        capacity: usize,
        load_factor: f32,
    ) -> MapRef<K, V> {
        self.map(
            ContainerKind::OrderedHashMap,
            key,
            value,
            MapShape::WithLoadFactor { capacity, load_factor },
        )
    }

    fn new_ordered_map_from<K: Key, V: Value>(
        &self,
        key: &TypeToken,
        value: &TypeToken,
        entries: Vec<(K, V)>,
    ) -> MapRef<K, V> {
        self.map(ContainerKind::OrderedHashMap, key, value, MapShape::From(entries))
    }

    fn new_concurrent_map<K: Key, V: Value>(&self, key: &TypeToken, value: &TypeToken) -> MapRef<K, V> {
        self.map(ContainerKind::ConcurrentHashMap, key, value, MapShape::Empty)
    }

    fn new_concurrent_map_with_capacity<K: Key, V: Value>(
        &self,
        key: &TypeToken,
        value: &TypeToken,
        capacity: usize,
    ) -> MapRef<K, V> {
        self.map(ContainerKind::ConcurrentHashMap, key, value, MapShape::Sized(capacity))
    }

    fn new_concurrent_map_with_load_factor<K: Key, V: Value>(
        &self,
        key: &TypeToken,
        value: &TypeToken,
        capacity: usize,
        load_factor: f32,
    ) -> MapRef<K, V> {
        self.map(
            ContainerKind::ConcurrentHashMap,
            key,
            value,
            MapShape::WithLoadFactor { capacity, load_factor },
        )
    }

    fn new_concurrent_map_with_concurrency_level<K: Key, V: Value>(
        &self,
        key: &TypeToken,
        value: &TypeToken,
        capacity: usize,
        load_factor: f32,
        concurrency_level: usize,
    ) -> MapRef<K, V> {
        self.map(
            ContainerKind::ConcurrentHashMap,
            key,
            value,
            MapShape::WithConcurrencyLevel {
                capacity,
                load_factor,
                concurrency_level,
            },
        )
    }

    fn new_concurrent_map_from<K: Key, V: Value>(
        &self,
        key: &TypeToken,
        value: &TypeToken,
        entries: Vec<(K, V)>,
    ) -> MapRef<K, V> {
        self.map(ContainerKind::ConcurrentHashMap, key, value, MapShape::From(entries))
    }
}

/// Build the generic list for `shape`.
pub fn generic_list<T: Element>(shape: ListShape<T>) -> ListRef<T> {
    match shape {
        ListShape::Empty => Box::new(ArrayList::new()),
        ListShape::Sized(capacity) => Box::new(ArrayList::with_capacity(capacity)),
        ListShape::From(elements) => Box::new(ArrayList::from_vec(elements)),
    }
}

/// Build the generic map of `kind` for `shape`. A concurrency level is only
/// meaningful for the concurrent map and is ignored by the others.
pub fn generic_map<K: Key, V: Value>(kind: ContainerKind, shape: MapShape<K, V>) -> MapRef<K, V> {
    match kind {
        ContainerKind::ConcurrentHashMap => Box::new(match shape {
            MapShape::Empty => ConcurrentHashMap::new(),
            MapShape::Sized(capacity) => ConcurrentHashMap::with_capacity(capacity),
            MapShape::WithLoadFactor { capacity, load_factor } => {
                ConcurrentHashMap::with_capacity_and_load_factor(capacity, load_factor)
            }
            MapShape::WithConcurrencyLevel {
                capacity,
                load_factor,
                concurrency_level,
            } => ConcurrentHashMap::with_concurrency_level(capacity, load_factor, concurrency_level),
            MapShape::From(entries) => ConcurrentHashMap::from_entries(entries),
        }),
        ContainerKind::OrderedHashMap => Box::new(match shape {
            MapShape::Empty => LinkedHashMap::new(),
            MapShape::Sized(capacity) => LinkedHashMap::with_capacity(capacity),
            MapShape::WithLoadFactor { capacity, load_factor }
            | MapShape::WithConcurrencyLevel {
                capacity, load_factor, ..
            } => LinkedHashMap::with_capacity_and_load_factor(capacity, load_factor),
            MapShape::From(entries) => LinkedHashMap::from_entries(entries),
        }),
        ContainerKind::HashMap | ContainerKind::List => Box::new(match shape {
            MapShape::Empty => HashMap::new(),
            MapShape::Sized(capacity) => HashMap::with_capacity(capacity),
            MapShape::WithLoadFactor { capacity, load_factor }
            | MapShape::WithConcurrencyLevel {
                capacity, load_factor, ..
            } => HashMap::with_capacity_and_load_factor(capacity, load_factor),
            MapShape::From(entries) => HashMap::from_entries(entries),
        }),
    }
}

/// Always returns the generic containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericFactory;

impl CollectionFactory for GenericFactory {
    fn list<T: Element>(&self, _element: &TypeToken, shape: ListShape<T>) -> ListRef<T> {
        generic_list(shape)
    }

    fn map<K: Key, V: Value>(
        &self,
        kind: ContainerKind,
        _key: &TypeToken,
        _value: &TypeToken,
        shape: MapShape<K, V>,
    ) -> MapRef<K, V> {
        generic_map(kind, shape)
    }
}

/// Fallback counters, per failing stage.
#[derive(Debug, Default)]
pub struct FallbackStats {
    locate: AtomicU64,
    specialize: AtomicU64,
    materialize: AtomicU64,
    compile: AtomicU64,
    load: AtomicU64,
}

impl FallbackStats {
    fn counter(&self, stage: Stage) -> &AtomicU64 {
        match stage {
            Stage::Locate => &self.locate,
            Stage::Specialize => &self.specialize,
            Stage::Materialize => &self.materialize,
            Stage::Compile => &self.compile,
            Stage::Load => &self.load,
        }
    }

    pub fn record(&self, stage: Stage) {
        self.counter(stage).fetch_add(1, Ordering::Relaxed);
    }

    pub fn by_stage(&self, stage: Stage) -> u64 {
        self.counter(stage).load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        [Stage::Locate, Stage::Specialize, Stage::Materialize, Stage::Compile, Stage::Load]
            .iter()
            .map(|stage| self.by_stage(*stage))
            .sum()
    }
}

/// Factory that specializes on demand and falls back to generic containers.
///
/// Requests are serialized by one lock per factory, which also guards the
/// outcome cache: concurrent requests for the same derived name run the
/// pipeline once, later ones are answered from the cache.
pub struct SpecializedFactory {
    pipeline: Pipeline,
    registry: Registry,
    cache: Mutex<SpecializationCache>,
    stats: FallbackStats,
}

impl SpecializedFactory {
    /// `registry` holds the specialized containers built into the program.
    pub fn new(config: &SpecializerConfig, registry: Registry) -> Self {
        Self {
            pipeline: Pipeline::new(config),
            registry,
            cache: Mutex::new(SpecializationCache::new(config.factory.cache_capacity)),
            stats: FallbackStats::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn stats(&self) -> &FallbackStats {
        &self.stats
    }

    /// Cached outcome for a derived name, if any.
    pub fn cached(&self, class_name: &str) -> Option<CacheEntry> {
        self.lock_cache().peek(class_name).cloned()
    }

    /// Forget every cached outcome, so failed requests are retried.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> MutexGuard<'_, SpecializationCache> {
        // A panic while holding the lock leaves the cache consistent.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run (or recall) the pipeline for a derived name.
    fn ensure_prepared(&self, kind: ContainerKind, tokens: &[TypeToken]) -> Result<String, StageFailure> {
        let class_name = derive_class_name(kind, tokens).map_err(|error| StageFailure {
            stage: Stage::Specialize,
            error,
        })?;

        let mut cache = self.lock_cache();
        match cache.get(&class_name) {
            Some(CacheEntry::Ready) => {
                debug!("{}: cache hit", class_name);
                return Ok(class_name);
            }
            Some(CacheEntry::Failed { stage, code, message }) => {
                debug!("{}: cached failure at {}", class_name, stage);
                return Err(StageFailure {
                    stage,
                    error: SpecializationError::Recalled { code, message },
                });
            }
            None => {}
        }

        match self.pipeline.prepare(kind, tokens) {
            Ok(prepared) => {
                info!(
                    "specialized {} ({} source(s), compiled in {:.2}s)",
                    prepared.class_name,
                    prepared.artifacts.len(),
                    prepared.compile.duration.as_secs_f64()
                );
                cache.insert(class_name.clone(), CacheEntry::Ready);
                Ok(class_name)
            }
            Err(failure) => {
                cache.insert(
                    class_name,
                    CacheEntry::Failed {
                        stage: failure.stage,
                        code: failure.error.code(),
                        message: failure.error.to_string(),
                    },
                );
                Err(failure)
            }
        }
    }

    fn fall_back(&self, kind: ContainerKind, tokens: &[TypeToken], failure: &StageFailure) {
        self.stats.record(failure.stage);
        warn!(
            "falling back to generic {} for <{}>: {} [{}]",
            kind.generic_name(),
            tokens.iter().map(|t| t.path()).collect::<Vec<_>>().join(", "),
            failure,
            failure.error.code()
        );
        debug!("{}: {:?}", kind, PipelineState::Fallback);
    }
}

impl CollectionFactory for SpecializedFactory {
    fn list<T: Element>(&self, element: &TypeToken, shape: ListShape<T>) -> ListRef<T> {
        let tokens = std::slice::from_ref(element);
        let kind = ContainerKind::List;

        let class_name = match self.ensure_prepared(kind, tokens) {
            Ok(name) => name,
            Err(failure) => {
                self.fall_back(kind, tokens, &failure);
                return generic_list(shape);
            }
        };

        let constructors = match self.registry.resolve_list::<T>(&class_name, shape.signature()) {
            Ok(ctors) => ctors,
            Err(error) => {
                self.fall_back(kind, tokens, &StageFailure { stage: Stage::Load, error });
                return generic_list(shape);
            }
        };
        match constructors.construct(shape) {
            Ok(list) => {
                debug!("{}: {:?}", class_name, PipelineState::Done);
                list
            }
            Err(shape) => {
                let failure = StageFailure {
                    stage: Stage::Load,
                    error: SpecializationError::ResolutionFailed {
                        class_name,
                        reason: format!("no {} constructor", shape.signature()),
                    },
                };
                self.fall_back(kind, tokens, &failure);
                generic_list(shape)
            }
        }
    }

    fn map<K: Key, V: Value>(
        &self,
        kind: ContainerKind,
        key: &TypeToken,
        value: &TypeToken,
        shape: MapShape<K, V>,
    ) -> MapRef<K, V> {
        let kind = match kind {
            ContainerKind::List => ContainerKind::HashMap,
            kind => kind,
        };
        let tokens = [key.clone(), value.clone()];

        let class_name = match self.ensure_prepared(kind, &tokens) {
            Ok(name) => name,
            Err(failure) => {
                self.fall_back(kind, &tokens, &failure);
                return generic_map(kind, shape);
            }
        };

        let constructors = match self.registry.resolve_map::<K, V>(kind, &class_name, shape.signature()) {
            Ok(ctors) => ctors,
            Err(error) => {
                self.fall_back(kind, &tokens, &StageFailure { stage: Stage::Load, error });
                return generic_map(kind, shape);
            }
        };
        match constructors.construct(shape) {
            Ok(map) => {
                debug!("{}: {:?}", class_name, PipelineState::Done);
                map
            }
            Err(shape) => {
                let failure = StageFailure {
                    stage: Stage::Load,
                    error: SpecializationError::ResolutionFailed {
                        class_name,
                        reason: format!("no {} constructor", shape.signature()),
                    },
                };
                self.fall_back(kind, &tokens, &failure);
                generic_map(kind, shape)
            }
        }
    }
}

/// The factory an application is configured with.
pub enum FactoryHandle {
    Specialized(SpecializedFactory),
    Generic(GenericFactory),
}

impl FactoryHandle {
    /// Specialized factory over `registry` unless `factory.enabled` is off.
    pub fn from_config(config: &SpecializerConfig, registry: Registry) -> Self {
        if config.factory.enabled {
            FactoryHandle::Specialized(SpecializedFactory::new(config, registry))
        } else {
            info!("specialization disabled; using generic containers");
            FactoryHandle::Generic(GenericFactory)
        }
    }

    pub fn is_specialized(&self) -> bool {
        matches!(self, FactoryHandle::Specialized(_))
    }
}

impl CollectionFactory for FactoryHandle {
    fn list<T: Element>(&self, element: &TypeToken, shape: ListShape<T>) -> ListRef<T> {
        match self {
            FactoryHandle::Specialized(factory) => factory.list(element, shape),
            FactoryHandle::Generic(factory) => factory.list(element, shape),
        }
    }

    fn map<K: Key, V: Value>(
        &self,
        kind: ContainerKind,
        key: &TypeToken,
        value: &TypeToken,
        shape: MapShape<K, V>,
    ) -> MapRef<K, V> {
        match self {
            FactoryHandle::Specialized(factory) => factory.map(kind, key, value, shape),
            FactoryHandle::Generic(factory) => factory.map(kind, key, value, shape),
        }
    }
}
