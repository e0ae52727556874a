//! Runtime library for monoset
//!
//! Provides what both generic and specialized containers need at run time:
//! - The abstract container traits callers program against
//! - Generic implementations of every container kind (also the source corpus
//!   the specializer rewrites)
//! - The constructor registry specialized types are resolved through
//! - Wrapper type aliases usable as type tokens

pub mod containers;
pub mod registry;
pub mod traits;
pub mod wrappers;

// Generated sources reach these through the runtime so they only need to link
// against one crate.
pub use dashmap;
pub use indexmap;

pub use monoset_types::{ConstructorShape, ContainerKind};

pub use containers::{ArrayList, ConcurrentHashMap, HashMap, LinkedHashMap};
pub use registry::{ListConstructors, MapConstructors, Registry};
pub use traits::{
    AbstractList, AbstractMap, Element, Key, ListRef, ListShape, MapRef, MapShape, Value,
    DEFAULT_CONCURRENCY_LEVEL, DEFAULT_LOAD_FACTOR, MAX_CONCURRENCY_LEVEL,
};

/// Re-exported names for code that builds or registers containers.
pub mod prelude {
    pub use crate::registry::{ListConstructors, MapConstructors, Registry};
    pub use crate::traits::{AbstractList, AbstractMap, Element, Key, ListRef, MapRef, Value};
    pub use crate::wrappers::*;
}
