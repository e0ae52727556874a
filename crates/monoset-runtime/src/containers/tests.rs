use super::*;
use crate::traits::{AbstractList, AbstractMap};
use pretty_assertions::assert_eq;

#[test]
fn test_array_list_add_get_set_remove() {
    let mut list: ArrayList<i32> = ArrayList::new();
    list.add(5);
    list.add(7);
    assert_eq!(list.get(0), Some(&5));
    assert_eq!(list.len(), 2);

    assert_eq!(list.set(1, 8), Some(7));
    assert_eq!(list.set(9, 1), None);
    assert!(list.insert(0, 1));
    assert!(!list.insert(10, 1));
    assert_eq!(list.to_vec(), vec![1, 5, 8]);

    assert_eq!(list.remove(1), Some(5));
    assert_eq!(list.remove(5), None);
    assert_eq!(list.index_of(&8), Some(1));
    assert!(!list.contains(&5));

    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.type_name(), "ArrayList");
}

#[test]
fn test_array_list_constructors() {
    let list: ArrayList<String> = ArrayList::with_capacity(32);
    assert!(list.capacity() >= 32);

    let list = ArrayList::from_vec(vec!["a".to_string(), "b".to_string()]);
    let other = ArrayList::from_vec(vec!["a".to_string(), "b".to_string()]);
    assert!(list.equals(&other));
}

#[test]
fn test_hash_map_put_get() {
    let mut map: HashMap<String, i32> = HashMap::new();
    assert_eq!(map.put("a".to_string(), 1), None);
    assert_eq!(map.put("a".to_string(), 2), Some(1));
    assert_eq!(map.get(&"a".to_string()), Some(2));
    assert!(map.contains_key(&"a".to_string()));
    assert_eq!(map.remove(&"a".to_string()), Some(2));
    assert!(map.is_empty());
    assert_eq!(map.type_name(), "HashMap");
}

#[test]
fn test_hash_map_from_entries_keeps_last_value() {
    let map = HashMap::from_entries(vec![(1, "x"), (2, "y"), (1, "z")]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&1), Some("z"));
}

#[test]
fn test_hash_map_invalid_load_factor_uses_default() {
    let map: HashMap<i32, i32> = HashMap::with_capacity_and_load_factor(8, f32::NAN);
    assert_eq!(map.load_factor(), crate::traits::DEFAULT_LOAD_FACTOR);
}

#[test]
fn test_linked_hash_map_keeps_insertion_order() {
    let mut map: LinkedHashMap<String, i32> = LinkedHashMap::new();
    for (i, key) in ["c", "a", "b"].iter().enumerate() {
        map.put(key.to_string(), i as i32);
    }
    map.put("a".to_string(), 10);
    assert_eq!(map.keys(), vec!["c".to_string(), "a".to_string(), "b".to_string()]);

    map.remove(&"c".to_string());
    map.put("c".to_string(), 3);
    assert_eq!(
        map.entries(),
        vec![
            ("a".to_string(), 10),
            ("b".to_string(), 2),
            ("c".to_string(), 3)
        ]
    );
    assert_eq!(map.first(), Some(("a".to_string(), 10)));
    assert_eq!(map.type_name(), "LinkedHashMap");
}

#[test]
fn test_concurrent_hash_map_shared_access() {
    let map: ConcurrentHashMap<u64, String> = ConcurrentHashMap::with_concurrency_level(16, 0.75, 3);
    assert_eq!(map.concurrency_level(), 4);
    map.put_shared(1, "one".to_string());
    assert_eq!(map.get_shared(&1), Some("one".to_string()));

    let mut map = map;
    assert_eq!(map.put(1, "uno".to_string()), Some("one".to_string()));
    assert_eq!(map.len(), 1);
    map.clear();
    assert!(map.is_empty());
}

#[test]
fn test_concurrent_hash_map_clamps_concurrency_level() {
    let mut huge: ConcurrentHashMap<i32, i32> = ConcurrentHashMap::with_concurrency_level(0, 0.75, usize::MAX);
    assert_eq!(huge.concurrency_level(), crate::traits::MAX_CONCURRENCY_LEVEL);
    huge.put(1, 2);
    assert_eq!(huge.get(&1), Some(2));

    let above_top_bit: ConcurrentHashMap<i32, i32> = ConcurrentHashMap::with_concurrency_level(0, 0.75, usize::MAX / 2 + 2);
    assert_eq!(above_top_bit.concurrency_level(), crate::traits::MAX_CONCURRENCY_LEVEL);

    let zero: ConcurrentHashMap<i32, i32> = ConcurrentHashMap::with_concurrency_level(0, 0.75, 0);
    assert_eq!(zero.concurrency_level(), 2);
}

#[test]
fn test_maps_compare_by_content() {
    let plain = HashMap::from_entries(vec![(1, 1), (2, 2)]);
    let ordered = LinkedHashMap::from_entries(vec![(2, 2), (1, 1)]);
    assert!(plain.equals(&ordered));
    assert!(ordered.equals(&plain));
}
