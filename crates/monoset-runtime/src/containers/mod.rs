//! Generic container implementations
//!
//! These are the containers handed out when no specialization is available,
//! and their source files form the corpus the specializer rewrites.

pub mod array_list;
pub mod concurrent_hash_map;
pub mod hash_map;
pub mod linked_hash_map;

pub use array_list::ArrayList;
pub use concurrent_hash_map::ConcurrentHashMap;
pub use hash_map::HashMap;
pub use linked_hash_map::LinkedHashMap;

#[cfg(test)]
mod tests;
