//! Simulation runner
//!
//! Replays a trace against several workloads, one at a time, streaming the
//! trace from disk for each so memory stays proportional to the structures
//! under test rather than to the trace:
//!
//! - **LRU**: for every request `get(key)`, and on a miss `put(key, priority)`.
//!   Runs once per [`CacheMode`].
//! - **Reference**: the same loop against the `lru` crate. A correct LRU
//!   produces exactly the same hit count on any trace.
//! - **Scheduler**: push every request onto a [`PriorityQueue`] keyed by its
//!   priority, pop one item every `pop_every` pushes, then drain. Each popped
//!   priority is checked against the next head of the queue and against the
//!   previous pop of the drain, which catches any heap-order violation.
//!
//! Latencies are timed around the data-structure calls only, so they exclude
//! trace I/O.

use std::collections::{BTreeMap, HashSet};
use std::num::NonZeroUsize;
use std::time::Instant;

use algokit::concurrent::default_segment_count;
use algokit::config::{ConcurrentCacheConfig, ConcurrentLruCacheConfig, LruCacheConfig};
use algokit::{ConcurrentLruCache, HeapOrder, LruCache, PriorityQueue};
use tracing::{debug, info, info_span, warn};

use crate::error::SimulatorError;
use crate::input::TraceReader;
use crate::models::{
    CacheMode, LatencyPercentiles, LatencyStats, LruRunStats, OpLatencyStats, QueueRunStats,
    QueueWorkloadConfig, ReferenceStats, SimulationConfig, SimulationResult,
};
use crate::stats::SimulationStats;

/// Requests between progress log lines
const PROGRESS_INTERVAL: u64 = 10_000_000;

/// Latency samples kept per operation for percentiles
const MAX_LATENCY_SAMPLES: usize = 5000;

/// The cache replayed by the LRU workload
enum CacheUnderTest {
    Sequential(LruCache<String, u32>),
    Concurrent(ConcurrentLruCache<String, u32>),
}

impl CacheUnderTest {
    fn build(
        mode: CacheMode,
        capacity: NonZeroUsize,
        segment_count: Option<usize>,
    ) -> Result<Self, SimulatorError> {
        let base = LruCacheConfig::new(capacity);
        match mode {
            CacheMode::Sequential => Ok(CacheUnderTest::Sequential(LruCache::init(base, None))),
            CacheMode::Concurrent => {
                let config: ConcurrentLruCacheConfig = ConcurrentCacheConfig {
                    base,
                    segments: segment_count.unwrap_or_else(default_segment_count),
                };
                Ok(CacheUnderTest::Concurrent(ConcurrentLruCache::init(
                    config, None,
                )?))
            }
        }
    }

    /// Returns true on a hit
    #[inline]
    fn get(&mut self, key: &str) -> bool {
        match self {
            CacheUnderTest::Sequential(c) => c.get(key).is_some(),
            CacheUnderTest::Concurrent(c) => c.get_with(key, |_| ()).is_some(),
        }
    }

    /// Inserts a missed key, returning true if an entry was evicted
    #[inline]
    fn put(&mut self, key: String, value: u32) -> bool {
        match self {
            CacheUnderTest::Sequential(c) => c.put(key, value).is_some(),
            CacheUnderTest::Concurrent(c) => c.put(key, value).is_some(),
        }
    }

    fn len(&self) -> usize {
        match self {
            CacheUnderTest::Sequential(c) => c.len(),
            CacheUnderTest::Concurrent(c) => c.len(),
        }
    }
}

/// Tracks latency for a single operation type
#[derive(Debug)]
struct OpLatencyTracker {
    total_ns: u64,
    count: u64,
    min_ns: u64,
    max_ns: u64,
    /// Sample reservoir for percentile calculation
    samples: Vec<u64>,
    max_samples: usize,
}

impl OpLatencyTracker {
    fn new() -> Self {
        Self::with_max_samples(MAX_LATENCY_SAMPLES)
    }

    fn with_max_samples(max_samples: usize) -> Self {
        Self {
            total_ns: 0,
            count: 0,
            min_ns: u64::MAX,
            max_ns: 0,
            samples: Vec::with_capacity(max_samples),
            max_samples,
        }
    }

    #[inline]
    fn record(&mut self, latency_ns: u64) {
        self.total_ns += latency_ns;
        self.count += 1;
        self.min_ns = self.min_ns.min(latency_ns);
        self.max_ns = self.max_ns.max(latency_ns);

        // Reservoir sampling (algorithm R)
        if self.samples.len() < self.max_samples {
            self.samples.push(latency_ns);
        } else {
            let slot = rand::random::<u64>() % self.count;
            if let Ok(slot) = usize::try_from(slot) {
                if slot < self.max_samples {
                    self.samples[slot] = latency_ns;
                }
            }
        }
    }

    /// Time `op` and record its latency
    #[inline]
    fn time<R>(&mut self, op: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let out = op();
        self.record(elapsed_ns(start));
        out
    }

    fn percentiles(&mut self) -> LatencyPercentiles {
        if self.samples.is_empty() {
            return LatencyPercentiles::default();
        }

        self.samples.sort_unstable();
        let len = self.samples.len();

        LatencyPercentiles {
            p50_ns: self.samples[len * 50 / 100],
            p90_ns: self.samples[len * 90 / 100],
            p99_ns: self.samples[len * 99 / 100],
            p999_ns: self.samples[len.saturating_sub(1).min(len * 999 / 1000)],
        }
    }

    fn finalize(&mut self) -> OpLatencyStats {
        OpLatencyStats {
            total_ns: self.total_ns,
            count: self.count,
            min_ns: if self.min_ns == u64::MAX {
                0
            } else {
                self.min_ns
            },
            max_ns: self.max_ns,
            percentiles: Some(self.percentiles()),
        }
    }
}

fn elapsed_ns(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// True if `later` should have been popped before `earlier`
fn out_of_order(order: HeapOrder, earlier: u32, later: u32) -> bool {
    match order {
        HeapOrder::Min => later < earlier,
        HeapOrder::Max => later > earlier,
    }
}

/// What the scan pass learns about the trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TraceSummary {
    requests: u64,
    unique_keys: usize,
}

/// Runner for trace simulations
#[derive(Debug)]
pub struct SimulationRunner {
    config: SimulationConfig,
    reader: TraceReader,
}

impl SimulationRunner {
    /// Create a new simulation runner
    pub fn new(config: SimulationConfig) -> Self {
        let reader = TraceReader::new(&config.input_dir);
        Self { config, reader }
    }

    /// Run every configured workload and collect the results.
    ///
    /// Fails if the trace cannot be read or parsed, is empty, or the cache
    /// configuration is rejected.
    pub fn run(&self) -> Result<SimulationResult, SimulatorError> {
        let summary = self.scan()?;
        let capacity = self.config.capacity;

        info!(
            requests = summary.requests,
            unique_keys = summary.unique_keys,
            capacity = capacity.get(),
            segments = ?self.config.segment_count,
            "trace scanned"
        );

        let mut stats = SimulationStats::new(&self.config.modes);
        let start_time = Instant::now();

        for &mode in &self.config.modes {
            let run = self.replay_lru(mode)?;
            stats.record_lru(mode, run);
        }

        if self.config.verify_reference {
            let reference = self.replay_reference()?;
            match stats.lru_stats(CacheMode::Sequential) {
                Some(seq) if !reference.agrees_with(seq) => warn!(
                    algokit_hits = seq.hits,
                    reference_hits = reference.hits,
                    "LRU hit count differs from the lru crate"
                ),
                Some(_) => info!(hits = reference.hits, "LRU hit count matches the lru crate"),
                None => {}
            }
            stats.record_reference(reference);
        }

        if let Some(queue_config) = self.config.queue {
            let run = self.replay_queue(queue_config)?;
            if run.ordering_violations > 0 {
                warn!(
                    violations = run.ordering_violations,
                    "priority queue popped items out of order"
                );
            }
            stats.record_queue(run);
        }

        Ok(stats.result(
            start_time.elapsed(),
            summary.requests,
            summary.unique_keys,
            capacity.get(),
        ))
    }

    /// First pass: count requests and distinct keys
    fn scan(&self) -> Result<TraceSummary, SimulatorError> {
        let _span = info_span!("scan", dir = %self.reader.input_dir().display()).entered();
        let scan_start = Instant::now();

        let requests_iter = self.reader.stream_requests()?;
        debug!(files = requests_iter.file_count(), "trace files found");

        let mut requests = 0u64;
        let mut keys: HashSet<String> = HashSet::new();
        for request in requests_iter {
            let request = request?;
            requests += 1;
            keys.insert(request.key);

            if requests % PROGRESS_INTERVAL == 0 {
                info!(million = requests / 1_000_000, "scanning");
            }
        }

        if requests == 0 {
            return Err(SimulatorError::EmptyTrace(self.reader.input_dir().to_path_buf()));
        }

        debug!(elapsed_ms = elapsed_ms(scan_start), "scan complete");
        Ok(TraceSummary {
            requests,
            unique_keys: keys.len(),
        })
    }

    /// Replay the trace against one algokit LRU cache: get, then put on miss
    fn replay_lru(&self, mode: CacheMode) -> Result<LruRunStats, SimulatorError> {
        let _span = info_span!("lru", %mode).entered();
        let mut cache = CacheUnderTest::build(mode, self.config.capacity, self.config.segment_count)?;

        let mut get_tracker = OpLatencyTracker::new();
        let mut put_tracker = OpLatencyTracker::new();
        let mut run = LruRunStats::default();
        let start = Instant::now();

        for request in self.reader.stream_requests()? {
            let request = request?;

            if get_tracker.time(|| cache.get(&request.key)) {
                run.hits += 1;
            } else {
                run.misses += 1;
                let priority = request.priority;
                if put_tracker.time(|| cache.put(request.key, priority)) {
                    run.evictions += 1;
                }
            }

            let processed = run.hits + run.misses;
            if processed % PROGRESS_INTERVAL == 0 {
                info!(
                    million = processed / 1_000_000,
                    len = cache.len(),
                    "replaying"
                );
            }
        }

        run.wall_time_ms = elapsed_ms(start);
        run.final_len = cache.len();

        let get_stats = get_tracker.finalize();
        let put_stats = put_tracker.finalize();
        run.latency = LatencyStats {
            total_ns: get_stats.total_ns + put_stats.total_ns,
            count: get_stats.count + put_stats.count,
            get_stats,
            put_stats,
        };

        info!(
            hit_rate = %format_args!("{:.2}%", run.hit_rate()),
            evictions = run.evictions,
            ops_per_sec = %format_args!("{:.0}", run.latency.ops_per_sec()),
            wall_ms = run.wall_time_ms,
            "replay complete"
        );
        Ok(run)
    }

    /// Replay the trace against the `lru` crate with the same access pattern
    fn replay_reference(&self) -> Result<ReferenceStats, SimulatorError> {
        let _span = info_span!("reference").entered();
        let mut cache: lru::LruCache<String, u32> = lru::LruCache::new(self.config.capacity);
        let mut stats = ReferenceStats::default();

        for request in self.reader.stream_requests()? {
            let request = request?;
            if cache.get(request.key.as_str()).is_some() {
                stats.hits += 1;
            } else {
                stats.misses += 1;
                cache.put(request.key, request.priority);
            }
        }

        debug!(hits = stats.hits, misses = stats.misses, "reference replay complete");
        Ok(stats)
    }

    /// Scheduler workload on the priority queue
    fn replay_queue(&self, config: QueueWorkloadConfig) -> Result<QueueRunStats, SimulatorError> {
        let _span = info_span!("queue", order = ?config.order, pop_every = config.pop_every.get())
            .entered();
        let mut queue: PriorityQueue<String, u32> = PriorityQueue::new(config.order);
        let mut run = QueueRunStats::new(config.order);
        let mut push_tracker = OpLatencyTracker::new();
        let mut pop_tracker = OpLatencyTracker::new();
        let pop_every = config.pop_every.get() as u64;
        let start = Instant::now();

        for request in self.reader.stream_requests()? {
            let request = request?;
            push_tracker.time(|| queue.push(request.key, request.priority));
            run.pushes += 1;
            run.peak_len = run.peak_len.max(queue.len());

            if run.pushes % pop_every == 0 {
                if let Ok((_, popped)) = pop_tracker.time(|| queue.pop_with_priority()) {
                    run.pops += 1;
                    if let Ok((_, &next)) = queue.peek_with_priority() {
                        if out_of_order(config.order, popped, next) {
                            run.ordering_violations += 1;
                        }
                    }
                }
            }
        }

        // Drain: the pops must come out monotonic
        let mut last: Option<u32> = None;
        while let Ok((_, priority)) = pop_tracker.time(|| queue.pop_with_priority()) {
            run.drained += 1;
            if last.is_some_and(|prev| out_of_order(config.order, prev, priority)) {
                run.ordering_violations += 1;
            }
            last = Some(priority);
        }

        run.wall_time_ms = elapsed_ms(start);
        run.push_stats = push_tracker.finalize();
        run.pop_stats = pop_tracker.finalize();

        info!(
            pushes = run.pushes,
            pops = run.pops + run.drained,
            peak_len = run.peak_len,
            violations = run.ordering_violations,
            "queue workload complete"
        );
        Ok(run)
    }
}

/// Headline numbers of a run, keyed by name
pub fn summarize(result: &SimulationResult) -> BTreeMap<String, f64> {
    let mut summary = BTreeMap::new();
    for (mode, run) in &result.lru {
        summary.insert(format!("lru_{mode}_hit_rate"), run.hit_rate());
    }
    if let Some(reference) = &result.reference {
        summary.insert("lru_reference_hit_rate".to_string(), reference.hit_rate());
    }
    if let Some(queue) = &result.queue {
        summary.insert(
            "queue_ordering_violations".to_string(),
            queue.ordering_violations as f64,
        );
    }
    summary
}
