//! Scheduler Usage Example
//!
//! Uses a min-first `PriorityQueue` as a deadline scheduler and an `LruCache`
//! to memoize the results of jobs that are requested repeatedly.
//!
//! Run with: cargo run --example scheduler_usage

use algokit::error::EmptyQueueError;
use algokit::metrics::Metrics;
use algokit::{HeapOrder, LruCache, PriorityQueue};
use std::num::NonZeroUsize;

#[derive(Debug, Clone)]
struct Job {
    name: &'static str,
    input: u64,
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.input)
    }
}

fn expensive(input: u64) -> u64 {
    (1..=input).fold(0u64, |acc, x| acc.wrapping_mul(31).wrapping_add(x * x))
}

fn main() {
    println!("Deadline Scheduler");
    println!("==================\n");

    // Lowest deadline runs first
    let mut scheduler: PriorityQueue<Job, u32> = PriorityQueue::new(HeapOrder::Min);
    let mut memo: LruCache<u64, u64> = LruCache::new(NonZeroUsize::new(2).unwrap());

    scheduler.extend([
        (Job { name: "render", input: 40 }, 300),
        (Job { name: "hash", input: 10 }, 100),
        (Job { name: "render", input: 40 }, 250),
        (Job { name: "compress", input: 25 }, 120),
        (Job { name: "hash", input: 10 }, 500),
        (Job { name: "index", input: 60 }, 410),
    ]);

    println!("queued (storage order): {scheduler}\n");

    loop {
        match scheduler.pop_with_priority() {
            Ok((job, deadline)) => {
                let cached = memo.get(&job.input).copied();
                let (result, source) = match cached {
                    Some(value) => (value, "cache"),
                    None => {
                        let computed = expensive(job.input);
                        if let Some((evicted, _)) = memo.put(job.input, computed) {
                            println!("   (memo evicted input {evicted})");
                        }
                        (computed, "computed")
                    }
                };
                let label = job.to_string();
                println!("t={deadline:>3}  {label:<14} -> {result:>20} [{source}]");
            }
            Err(EmptyQueueError) => break,
        }
    }

    println!("\nQueue: {:?}", scheduler.metrics());
    println!("Memo:  hit rate {:.0}%", memo.metrics()["hit_rate"] * 100.0);

    // Highest priority first works the same way
    let mut alerts = PriorityQueue::max();
    alerts.push("disk 91%", 2);
    alerts.push("node down", 9);
    alerts.push("latency p99", 5);
    println!("\nAlerts by severity: {:?}", alerts.drain_sorted());
}
