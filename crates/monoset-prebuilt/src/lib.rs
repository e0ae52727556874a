//! Prebuilt specialized containers
//!
//! The build script specializes a fixed set of common containers from the
//! runtime's generic sources and compiles them into this crate. Hand
//! [`registry`] to a `SpecializedFactory` to have requests for these types
//! resolve to the specialized implementations.

use monoset_runtime::Registry;

include!(concat!(env!("OUT_DIR"), "/registry.rs"));

/// Registry holding every container built into this crate.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    register(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use monoset_factory::{CollectionFactory, SpecializedFactory, SpecializerConfig};
    use monoset_runtime::{AbstractList, AbstractMap, MAX_CONCURRENCY_LEVEL};
    use monoset_types::{Stage, TypeToken};
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::TempDir;

    fn token(path: &str) -> TypeToken {
        TypeToken::new(path).unwrap()
    }

    fn factory(dir: &Path, program: &str) -> SpecializedFactory {
        let mut config = SpecializerConfig::default();
        config.paths.corpus_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../monoset-runtime/src/containers");
        config.paths.generated_root = dir.join("generated");
        config.paths.output_dir = dir.join("out");
        config.paths.overlay_dir = dir.to_path_buf();
        config.toolchain.program = program.to_string();
        config.toolchain.args = vec![];
        SpecializedFactory::new(&config, registry())
    }

    #[test]
    fn test_array_list_integer() {
        let mut list = ArrayListInteger::new();
        list.add(5);
        assert_eq!(list.type_name(), "ArrayListInteger");
        assert_eq!(list.get(0), Some(&5));

        let list = ArrayListString::from_vec(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(list.type_name(), "ArrayListString");
        assert_eq!(list.index_of(&"b".to_string()), Some(1));
    }

    #[test]
    fn test_hash_map_string_integer() {
        let mut map = HashMapStringInteger::new();
        assert_eq!(map.put("a".to_string(), 1), None);
        assert_eq!(map.get(&"a".to_string()), Some(1));
        assert_eq!(map.type_name(), "HashMapStringInteger");
    }

    #[test]
    fn test_linked_hash_map_keeps_insertion_order() {
        let mut map = LinkedHashMapStringInteger::from_entries(vec![
            ("b".to_string(), 2),
            ("a".to_string(), 1),
            ("c".to_string(), 3),
        ]);
        map.put("a".to_string(), 10);
        map.put("d".to_string(), 4);
        assert_eq!(map.type_name(), "LinkedHashMapStringInteger");
        assert_eq!(map.keys(), vec!["b", "a", "c", "d"]);
        assert_eq!(map.get(&"a".to_string()), Some(10));
    }

    #[test]
    fn test_concurrent_hash_map_string_long() {
        let mut map = ConcurrentHashMapStringLong::with_concurrency_level(0, 0.75, usize::MAX);
        assert_eq!(map.concurrency_level(), MAX_CONCURRENCY_LEVEL);
        map.put("k".to_string(), 7);
        assert_eq!(map.get(&"k".to_string()), Some(7));
        assert_eq!(map.type_name(), "ConcurrentHashMapStringLong");
    }

    #[test]
    fn test_factory_hands_out_specialized_containers() {
        let dir = TempDir::new().unwrap();
        let factory = factory(dir.path(), "true");

        let mut list = factory.new_list::<i32>(&token("Integer"));
        list.add(5);
        assert_eq!(list.type_name(), "ArrayListInteger");
        assert_eq!(list.get(0), Some(&5));

        let mut map = factory.new_map::<String, i32>(&token("String"), &token("Integer"));
        map.put("a".to_string(), 1);
        assert_eq!(map.type_name(), "HashMapStringInteger");
        assert_eq!(map.get(&"a".to_string()), Some(1));

        let entries = vec![("z".to_string(), 26), ("a".to_string(), 1)];
        let ordered = factory.new_ordered_map_from::<String, i32>(&token("String"), &token("Integer"), entries.clone());
        assert_eq!(ordered.type_name(), "LinkedHashMapStringInteger");
        assert_eq!(ordered.entries(), entries);

        let concurrent = factory.new_concurrent_map_with_concurrency_level::<String, i64>(
            &token("String"),
            &token("Long"),
            16,
            0.75,
            4,
        );
        assert_eq!(concurrent.type_name(), "ConcurrentHashMapStringLong");
        assert_eq!(factory.stats().total(), 0);
    }

    #[test]
    fn test_specialized_and_generic_lists_agree() {
        let dir = TempDir::new().unwrap();
        let specialized = factory(dir.path(), "true").new_list_from::<i32>(&token("Integer"), vec![3, 1, 2]);
        let generic = factory(dir.path(), "false").new_list_from::<i32>(&token("Integer"), vec![3, 1, 2]);

        assert_eq!(specialized.type_name(), "ArrayListInteger");
        assert_eq!(generic.type_name(), "ArrayList");
        assert!(specialized.equals(generic.as_ref()));
    }

    #[test]
    fn test_compile_failure_still_yields_working_list() {
        let dir = TempDir::new().unwrap();
        let factory = factory(dir.path(), "false");

        let mut list = factory.new_list::<i32>(&token("Integer"));
        list.add(5);
        assert_eq!(list.get(0), Some(&5));
        assert_eq!(factory.stats().by_stage(Stage::Compile), 1);
    }
}
