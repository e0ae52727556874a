//! Container factories for monoset
//!
//! Wires the specialization stages into a pipeline, caches its outcomes and
//! exposes the caller-facing [`CollectionFactory`] with its specialized and
//! generic implementations.

pub mod cache;
pub mod config;
pub mod driver;
pub mod factory;
pub mod pipeline;

pub use cache::{CacheEntry, SpecializationCache};
pub use config::{FactorySettings, PathsConfig, SpecializerConfig, ToolchainConfig, CONFIG_FILE};
pub use driver::{CompilationDriver, CompileOutcome};
pub use factory::{
    generic_list, generic_map, CollectionFactory, FactoryHandle, FallbackStats, GenericFactory, SpecializedFactory,
};
pub use pipeline::{Pipeline, PipelineState, Prepared, StageFailure};
