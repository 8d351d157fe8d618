//! Synthetic trace generation
//!
//! Writes `timestamp,key,priority` traces with a hot/cold key mix: a small
//! set of hot keys receives most of the traffic, skewed further towards the
//! lowest-numbered hot keys, while the rest is spread uniformly over the cold
//! keys. Each output file is written by its own thread.

use crate::error::SimulatorError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Parameters for generating synthetic traces
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Total number of requests across all files
    pub requests: u64,
    /// Number of trace files to split the requests over
    pub files: u32,
    /// Number of distinct keys
    pub unique_keys: u32,
    /// Percentage of traffic that goes to hot keys
    pub hot_traffic_percent: u8,
    /// Percentage of keys that are hot
    pub hot_keys_percent: u8,
    /// Priorities are drawn from `0..=max_priority`
    pub max_priority: u32,
    /// Seed for reproducible traces (None = from entropy)
    pub seed: Option<u64>,
    /// Output directory
    pub output_dir: PathBuf,
    /// Write buffer size in KB
    pub buffer_size_kb: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            requests: 100_000,
            files: 1,
            unique_keys: 10_000,
            hot_traffic_percent: 80,
            hot_keys_percent: 20,
            max_priority: 1_000,
            seed: None,
            output_dir: PathBuf::from("traces"),
            buffer_size_kb: 1024,
        }
    }
}

impl TraceConfig {
    /// Number of hot keys, at least one when there are any keys
    fn hot_keys(&self) -> u32 {
        let hot = u64::from(self.unique_keys) * u64::from(self.hot_keys_percent.min(100)) / 100;
        u32::try_from(hot).unwrap_or(self.unique_keys).max(1).min(self.unique_keys)
    }
}

/// Parameters for writing a single trace file
struct FileGenerationParams<'a> {
    index: u32,
    requests: u64,
    start_time: u64,
    hot_keys: u32,
    cold_keys: u32,
    config: &'a TraceConfig,
    progress: &'a AtomicU64,
}

/// Summary of a finished generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub files: Vec<PathBuf>,
    pub requests: u64,
}

/// Generator for synthetic request traces
#[derive(Debug)]
pub struct TraceGenerator {
    config: TraceConfig,
}

impl TraceGenerator {
    /// Create a new generator with the given configuration
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    /// Generate the trace files described by the configuration
    pub fn generate(&self) -> Result<GenerationSummary, SimulatorError> {
        let config = &self.config;
        fs::create_dir_all(&config.output_dir)?;

        let files = config.files.max(1);
        let hot_keys = config.hot_keys();
        let cold_keys = config.unique_keys.saturating_sub(hot_keys);
        let start_time = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        info!(
            requests = config.requests,
            files,
            unique_keys = config.unique_keys,
            hot_keys,
            cold_keys,
            hot_traffic_percent = config.hot_traffic_percent,
            max_priority = config.max_priority,
            output_dir = %config.output_dir.display(),
            "generating traces"
        );

        let progress = AtomicU64::new(0);
        let per_file = config.requests / u64::from(files);
        let remainder = config.requests % u64::from(files);

        let results: Vec<Result<PathBuf, SimulatorError>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..files)
                .map(|index| {
                    let params = FileGenerationParams {
                        index,
                        // The first `remainder` files take one extra request
                        requests: per_file + u64::from(u64::from(index) < remainder),
                        start_time,
                        hot_keys,
                        cold_keys,
                        config,
                        progress: &progress,
                    };
                    scope.spawn(move || Self::generate_file(params))
                })
                .collect();

            handles
                .into_iter()
                .zip(0..files)
                .map(|(handle, index)| {
                    handle
                        .join()
                        .unwrap_or(Err(SimulatorError::WorkerPanicked(index)))
                })
                .collect()
        });

        let files = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        info!(
            requests = progress.load(Ordering::Relaxed),
            files = files.len(),
            "trace generation complete"
        );

        Ok(GenerationSummary {
            files,
            requests: progress.into_inner(),
        })
    }

    fn generate_file(params: FileGenerationParams<'_>) -> Result<PathBuf, SimulatorError> {
        let config = params.config;
        let path = config
            .output_dir
            .join(format!("trace_{:02}.csv", params.index));
        let file = File::create(&path)?;
        let mut writer = BufWriter::with_capacity(config.buffer_size_kb as usize * 1024, file);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(params.index))),
            None => StdRng::from_entropy(),
        };

        writeln!(writer, "timestamp,key,priority")?;

        let hot_probability = f64::from(config.hot_traffic_percent.min(100)) / 100.0;
        // One request per second, files laid end to end in time
        let mut timestamp = params.start_time + u64::from(params.index) * params.requests;

        for _ in 0..params.requests {
            let key = Self::pick_key(&mut rng, hot_probability, params.hot_keys, params.cold_keys);
            let priority = rng.gen_range(0..=config.max_priority);
            writeln!(writer, "{timestamp},{key},{priority}")?;
            timestamp += 1;
        }

        writer.flush()?;
        params.progress.fetch_add(params.requests, Ordering::Relaxed);
        debug!(file = %path.display(), requests = params.requests, "trace file written");

        Ok(path)
    }

    fn pick_key(rng: &mut StdRng, hot_probability: f64, hot_keys: u32, cold_keys: u32) -> String {
        if hot_keys > 0 && (cold_keys == 0 || rng.gen_bool(hot_probability)) {
            // Squaring a uniform sample skews towards the lowest ranks
            let skew: f64 = rng.gen::<f64>().powi(2);
            let rank = ((skew * f64::from(hot_keys)) as u32).min(hot_keys - 1);
            format!("hot_{rank}")
        } else if cold_keys > 0 {
            format!("cold_{}", rng.gen_range(0..cold_keys))
        } else {
            // No keys configured; every request hits the same key
            "key_0".to_string()
        }
    }
}

/// Write a small deterministic trace to `dir` if it has no trace files yet.
///
/// Used when `simulate` is run without an input directory.
pub fn ensure_sample_trace(dir: &Path) -> Result<(), SimulatorError> {
    let has_traces = dir.exists() && !crate::input::TraceReader::new(dir).trace_files()?.is_empty();
    if has_traces {
        return Ok(());
    }

    info!(dir = %dir.display(), "creating sample trace");
    let generator = TraceGenerator::new(TraceConfig {
        requests: 50_000,
        unique_keys: 5_000,
        seed: Some(0x5EED),
        output_dir: dir.to_path_buf(),
        ..TraceConfig::default()
    });
    generator.generate()?;
    Ok(())
}
