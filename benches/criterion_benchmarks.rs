use algokit::config::LruCacheConfig;
use algokit::{HeapOrder, LruCache, PriorityQueue};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::num::NonZeroUsize;

fn make_lru<K: std::hash::Hash + Eq + Clone, V>(cap: usize) -> LruCache<K, V> {
    let config = LruCacheConfig {
        capacity: NonZeroUsize::new(cap).unwrap(),
    };
    LruCache::init(config, None)
}

pub fn lru_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    let mut group = c.benchmark_group("LRU Operations");

    let mut cache = make_lru(CACHE_SIZE);
    for i in 0..CACHE_SIZE {
        cache.put(i, i);
    }

    group.bench_function("LRU get hit", |b| {
        b.iter(|| {
            for i in 0..100 {
                black_box(cache.get(&(i % CACHE_SIZE)));
            }
        });
    });

    group.bench_function("LRU get miss", |b| {
        b.iter(|| {
            for i in 0..100 {
                black_box(cache.get(&(i + CACHE_SIZE)));
            }
        });
    });

    group.bench_function("LRU put existing", |b| {
        b.iter(|| {
            for i in 0..100 {
                black_box(cache.put(i % CACHE_SIZE, i));
            }
        });
    });

    // Every put misses and evicts
    let mut next = CACHE_SIZE;
    group.bench_function("LRU put evicting", |b| {
        b.iter(|| {
            for _ in 0..100 {
                black_box(cache.put(next, next));
                next += 1;
            }
        });
    });

    group.finish();
}

pub fn priority_queue_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Priority Queue Operations");
    let mut rng = StdRng::seed_from_u64(42);

    for size in [100usize, 10_000] {
        let priorities: Vec<u64> = (0..size).map(|_| rng.gen()).collect();

        group.bench_with_input(BenchmarkId::new("push all", size), &priorities, |b, p| {
            b.iter(|| {
                let mut queue = PriorityQueue::with_capacity(HeapOrder::Min, p.len());
                for &priority in p {
                    queue.push(priority, priority);
                }
                black_box(queue.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("drain sorted", size), &priorities, |b, p| {
            b.iter_batched(
                || {
                    let mut queue = PriorityQueue::max();
                    queue.extend(p.iter().map(|&priority| (priority, priority)));
                    queue
                },
                |mut queue| black_box(queue.drain_sorted()),
                BatchSize::SmallInput,
            );
        });
    }

    // Steady-state scheduler: one push and one pop per step
    let mut queue = PriorityQueue::min();
    for i in 0..1_000u64 {
        queue.push(i, rng.gen::<u32>());
    }
    group.bench_function("push pop steady state", |b| {
        b.iter(|| {
            queue.push(0, rng.gen::<u32>());
            black_box(queue.pop())
        });
    });

    group.finish();
}

criterion_group!(benches, lru_benchmark, priority_queue_benchmark);
criterion_main!(benches);
