//! Container kinds that can be specialized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of container kinds the specializer knows how to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Growable list (`ArrayList<E>`)
    List,
    /// Unordered hash map (`HashMap<K, V>`)
    HashMap,
    /// Insertion-ordered hash map built on top of `HashMap<K, V>`
    OrderedHashMap,
    /// Sharded hash map safe for concurrent use
    ConcurrentHashMap,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 4] = [
        ContainerKind::List,
        ContainerKind::HashMap,
        ContainerKind::OrderedHashMap,
        ContainerKind::ConcurrentHashMap,
    ];

    /// Name of the generic type declared in the corpus source.
    pub fn generic_name(&self) -> &'static str {
        match self {
            ContainerKind::List => "ArrayList",
            ContainerKind::HashMap => "HashMap",
            ContainerKind::OrderedHashMap => "LinkedHashMap",
            ContainerKind::ConcurrentHashMap => "ConcurrentHashMap",
        }
    }

    /// File name of the generic source under the corpus root.
    pub fn corpus_file(&self) -> &'static str {
        match self {
            ContainerKind::List => "array_list.rs",
            ContainerKind::HashMap => "hash_map.rs",
            ContainerKind::OrderedHashMap => "linked_hash_map.rs",
            ContainerKind::ConcurrentHashMap => "concurrent_hash_map.rs",
        }
    }

    /// Number of type parameters on the generic declaration.
    pub fn arity(&self) -> usize {
        match self {
            ContainerKind::List => 1,
            _ => 2,
        }
    }

    pub fn is_map(&self) -> bool {
        self.arity() == 2
    }

    /// Kinds whose specialized source must be generated alongside this one,
    /// in the order they have to be compiled.
    pub fn dependencies(&self) -> &'static [ContainerKind] {
        match self {
            ContainerKind::OrderedHashMap => &[ContainerKind::HashMap],
            _ => &[],
        }
    }

    /// Stable identifier used for directory names and CLI arguments.
    pub fn slug(&self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::HashMap => "hash_map",
            ContainerKind::OrderedHashMap => "ordered_hash_map",
            ContainerKind::ConcurrentHashMap => "concurrent_hash_map",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for ContainerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContainerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.slug() == s || kind.generic_name() == s)
            .ok_or_else(|| format!("unknown container kind '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_slug() {
        for kind in ContainerKind::ALL {
            assert_eq!(kind.slug().parse::<ContainerKind>().unwrap(), kind);
            assert_eq!(kind.generic_name().parse::<ContainerKind>().unwrap(), kind);
        }
        assert!("vector".parse::<ContainerKind>().is_err());
    }

    #[test]
    fn test_ordered_map_depends_on_hash_map() {
        assert_eq!(ContainerKind::OrderedHashMap.dependencies(), &[ContainerKind::HashMap]);
        assert!(ContainerKind::List.dependencies().is_empty());
        assert_eq!(ContainerKind::List.arity(), 1);
        assert!(ContainerKind::ConcurrentHashMap.is_map());
    }
}
