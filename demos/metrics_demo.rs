//! Metrics Demonstration
//!
//! Runs a small workload against an LRU cache and against a min-first and a
//! max-first priority queue, then prints every structure's counters through
//! the shared `Metrics` trait.

use algokit::{config::LruCacheConfig, metrics::Metrics, LruCache, PriorityQueue};
use core::num::NonZeroUsize;
use std::collections::BTreeMap;

fn main() {
    println!("📊 Metrics System Demonstration");
    println!("===============================\n");

    // A small capacity forces evictions so the counters have something to show
    let capacity = NonZeroUsize::new(3).unwrap();

    println!("   • Cache capacity: {} items", capacity.get());
    println!("   • Cache workload: Insert 3 items → Access patterns → Insert 2 more");
    println!("   • Queue workload: Push 8 jobs → Pop 5 → Pop on empty\n");

    let structures: Vec<(String, Box<dyn Metrics>)> = vec![
        ("LRU".to_string(), Box::new(run_lru(capacity))),
        ("MinHeap".to_string(), Box::new(run_queue(PriorityQueue::min()))),
        ("MaxHeap".to_string(), Box::new(run_queue(PriorityQueue::max()))),
    ];

    display_metrics(&structures);
    demonstrate_deterministic_ordering(&*structures[0].1);
}

/// LRU cache with a standard workload
fn run_lru(capacity: NonZeroUsize) -> LruCache<&'static str, i32> {
    let mut cache = LruCache::init(LruCacheConfig::new(capacity), None);

    cache.put("/index.html", 1);
    cache.put("/about.html", 2);
    cache.put("/blog.html", 3);

    // the index page becomes most recently used
    cache.get("/index.html");
    cache.get("/index.html");
    cache.get("/about.html");

    // misses
    cache.get("/contact.html");
    cache.get("/faq.html");

    // evicts the blog page, then the index page
    cache.put("/contact.html", 4);
    cache.put("/faq.html", 5);

    cache
}

/// Priority queue with a standard workload
fn run_queue(mut queue: PriorityQueue<&'static str, u32>) -> PriorityQueue<&'static str, u32> {
    let jobs = [
        ("backup", 40),
        ("email", 10),
        ("index", 30),
        ("report", 20),
        ("cleanup", 80),
        ("deploy", 5),
        ("audit", 60),
        ("billing", 15),
    ];
    queue.extend(jobs);

    for _ in 0..5 {
        if let Ok((job, priority)) = queue.pop_with_priority() {
            println!("   {} popped {job} ({priority})", queue.algorithm_name());
        }
    }
    queue.clear();
    let _ = queue.pop();
    println!();

    queue
}

fn display_metrics(structures: &[(String, Box<dyn Metrics>)]) {
    println!("📈 Metrics by structure:\n");

    for (name, structure) in structures {
        println!("{} ({}):", name, structure.algorithm_name());
        print_metrics(&structure.metrics());
        println!();
    }
}

fn print_metrics(metrics: &BTreeMap<String, f64>) {
    for (key, value) in metrics {
        if key.ends_with("_rate") || key == "utilization" {
            println!("  • {}: {:.1}%", key.replace('_', " "), value * 100.0);
        } else if value.fract() == 0.0 {
            println!("  • {}: {:.0}", key.replace('_', " "), value);
        } else {
            println!("  • {}: {:.2}", key.replace('_', " "), value);
        }
    }
}

/// Shows that metric keys come back in the same order on every run
fn demonstrate_deterministic_ordering(structure: &dyn Metrics) {
    println!("🔢 Deterministic Metrics Ordering (BTreeMap):");
    println!("==============================================");

    let metrics = structure.metrics();
    for (i, key) in metrics.keys().take(8).enumerate() {
        println!("  {}. {}", i + 1, key);
    }
}
