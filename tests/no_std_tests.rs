#![no_std]
extern crate alloc;
extern crate algokit;

use algokit::config::LruCacheConfig;
use algokit::error::EmptyQueueError;
use algokit::{HeapOrder, LruCache, Metrics, PriorityQueue};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::num::NonZeroUsize;

fn make_lru<K: core::hash::Hash + Eq + Clone, V>(cap: usize) -> LruCache<K, V> {
    let config = LruCacheConfig {
        capacity: NonZeroUsize::new(cap).unwrap(),
    };
    LruCache::init(config, None)
}

#[test]
fn test_lru_in_no_std() {
    let mut cache = make_lru(2);

    // Using String as it requires the alloc crate
    let key1 = String::from("key1");
    let key2 = String::from("key2");
    let key3 = String::from("key3");

    cache.put(key1.clone(), 1);
    cache.put(key2.clone(), 2);

    assert_eq!(*cache.get(&key1).unwrap(), 1);
    assert_eq!(*cache.get(&key2).unwrap(), 2);

    // This should evict key1
    cache.put(key3.clone(), 3);

    assert!(cache.get(&key1).is_none());
    assert_eq!(*cache.get(&key2).unwrap(), 2);
    assert_eq!(*cache.get(&key3).unwrap(), 3);
}

#[test]
fn test_lru_with_complex_values_in_no_std() {
    let mut cache = make_lru(3);

    for i in 0..5 {
        let payload: Vec<u8> = (0..i).collect();
        cache.put(format!("key{i}"), payload);
    }

    assert_eq!(cache.len(), 3);
    assert!(cache.get("key0").is_none());
    assert_eq!(cache.get("key4").map(Vec::len), Some(4));
}

#[test]
fn test_priority_queue_in_no_std() {
    let mut queue = PriorityQueue::new(HeapOrder::Min);
    for (i, name) in ["delta", "alpha", "charlie", "bravo"].iter().enumerate() {
        queue.push(String::from(*name), [4u8, 1, 3, 2][i]);
    }

    let drained: Vec<String> = queue.drain_sorted();
    assert_eq!(drained, ["alpha", "bravo", "charlie", "delta"]);
    assert_eq!(queue.pop(), Err(EmptyQueueError));
}

#[test]
fn test_display_in_no_std() {
    let mut queue = PriorityQueue::max();
    queue.push("x", 7);
    assert_eq!(format!("{queue}"), "PriorityQueue{7:x}");
    assert_eq!(format!("{}", EmptyQueueError), "no items are in the queue");
}

#[test]
fn test_metrics_in_no_std() {
    let mut cache = make_lru(1);
    cache.put(1u8, 1u8);
    cache.get(&1);
    cache.get(&2);
    let metrics = cache.metrics();
    assert_eq!(metrics.get("hit_rate"), Some(&0.5));
    assert_eq!(cache.algorithm_name(), "LRU");
}
