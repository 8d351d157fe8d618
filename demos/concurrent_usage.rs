//! Concurrent Cache Usage Examples
//!
//! Multi-threaded usage patterns for `ConcurrentLruCache`.
//!
//! Run with: cargo run --example concurrent_usage --features concurrent

extern crate algokit;

use algokit::config::{ConcurrentCacheConfig, ConcurrentLruCacheConfig, LruCacheConfig};
use algokit::metrics::Metrics;
use algokit::{ConcurrentLruCache, LruCache};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

fn lru_config(capacity: usize, segments: usize) -> ConcurrentLruCacheConfig {
    ConcurrentCacheConfig {
        base: LruCacheConfig {
            capacity: NonZeroUsize::new(capacity).unwrap(),
        },
        segments,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Concurrent Cache Usage Examples");
    println!("================================\n");

    basic_concurrent_usage()?;
    println!();

    zero_copy_get_with()?;
    println!();

    segment_tuning()?;
    println!();

    throughput_comparison()?;
    Ok(())
}

/// Basic multi-threaded cache usage
fn basic_concurrent_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. Basic Concurrent Usage");
    println!("   -----------------------");

    let cache = Arc::new(ConcurrentLruCache::init(lru_config(1000, 16), None)?);

    let num_threads = 4;
    let ops_per_thread = 1000;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = format!("thread{}-key{}", thread_id, i);
                    let value = thread_id * 10000 + i;

                    cache.put(key.clone(), value);

                    // Another thread may have evicted it already
                    if let Some(v) = cache.get(&key) {
                        assert_eq!(v, value);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().map_err(|_| "worker thread panicked")?;
    }

    println!(
        "   {} threads x {} ops, final size {} / {}",
        num_threads,
        ops_per_thread,
        cache.len(),
        cache.capacity()
    );
    let metrics = cache.metrics();
    println!(
        "   hit rate {:.1}%, evictions {:.0}",
        metrics.get("hit_rate").copied().unwrap_or(0.0) * 100.0,
        metrics.get("evictions").copied().unwrap_or(0.0)
    );
    Ok(())
}

/// Working on a value while the segment lock is held
fn zero_copy_get_with() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Zero-Copy Access with get_with");
    println!("   -------------------------------");

    let cache: ConcurrentLruCache<String, Vec<u8>> =
        ConcurrentLruCache::init(lru_config(100, 4), None)?;
    cache.put("blob".to_string(), vec![7u8; 4096]);

    let checksum = cache.get_with("blob", |bytes| bytes.iter().map(|&b| u64::from(b)).sum::<u64>());
    println!("   checksum without cloning 4 KiB: {:?}", checksum);

    cache.get_mut_with("blob", |bytes| bytes.truncate(16));
    println!(
        "   length after in-place truncate: {:?}",
        cache.get_with("blob", Vec::len)
    );
    Ok(())
}

/// Segment count trade-offs
fn segment_tuning() -> Result<(), Box<dyn std::error::Error>> {
    println!("3. Segment Tuning");
    println!("   ---------------");

    for segments in [1, 4, 16, 64] {
        let cache: ConcurrentLruCache<u64, u64> =
            ConcurrentLruCache::init(lru_config(40, segments), None)?;
        println!(
            "   requested {:>2} segments -> {:>2} segments, total capacity {}",
            segments,
            cache.segment_count(),
            cache.capacity()
        );
    }
    Ok(())
}

/// Lock striping against one global lock
fn throughput_comparison() -> Result<(), Box<dyn std::error::Error>> {
    println!("4. Throughput: ConcurrentLruCache vs Mutex<LruCache>");
    println!("   ------------------------------------------------");

    let num_threads = 8;
    let ops_per_thread = 50_000u64;

    let striped = Arc::new(ConcurrentLruCache::init(lru_config(10_000, 16), None)?);
    let start = Instant::now();
    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let cache = Arc::clone(&striped);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = (t * ops_per_thread + i) % 20_000;
                    if cache.get(&key).is_none() {
                        cache.put(key, i);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().map_err(|_| "worker thread panicked")?;
    }
    let striped_time = start.elapsed();

    let global = Arc::new(Mutex::new(LruCache::new(NonZeroUsize::new(10_000).unwrap())));
    let start = Instant::now();
    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let cache = Arc::clone(&global);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = (t * ops_per_thread + i) % 20_000;
                    let Ok(mut guard) = cache.lock() else { return };
                    if guard.get(&key).is_none() {
                        guard.put(key, i);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().map_err(|_| "worker thread panicked")?;
    }
    let global_time = start.elapsed();

    println!("   ConcurrentLruCache: {:?}", striped_time);
    println!("   Mutex<LruCache>:    {:?}", global_time);
    Ok(())
}
