use algokit::HeapOrder;
use algokit_simulator::generator::{self, TraceConfig, TraceGenerator};
use algokit_simulator::models::{CacheMode, QueueWorkloadConfig, SimulationConfig};
use algokit_simulator::runner::{self, SimulationRunner};
use algokit_simulator::stats::SimulationStats;
use clap::{Parser, Subcommand, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Trace simulator for the algokit LRU cache and priority queue
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verbosity level (-v, -vv, -vvv); RUST_LOG wins when no flag is given
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay traces against the cache and the priority queue
    Simulate {
        /// Directory containing trace files (a sample trace is created if omitted)
        #[arg(short, long, value_name = "DIR")]
        input_dir: Option<PathBuf>,

        /// Cache capacity (number of entries)
        #[arg(short, long, default_value = "10000")]
        capacity: usize,

        /// Cache mode to replay
        #[arg(long, value_enum, default_value_t = ModeArg::Both)]
        mode: ModeArg,

        /// Number of segments for the concurrent cache (default: 16)
        #[arg(long)]
        segments: Option<usize>,

        /// Skip the comparison against the lru crate
        #[arg(long)]
        no_reference: bool,

        /// Priority queue ordering for the scheduler workload
        #[arg(long, value_enum, default_value_t = OrderArg::Min)]
        order: OrderArg,

        /// Pop one queued item after every N pushes (0 skips the queue workload)
        #[arg(long, default_value = "2")]
        pop_every: usize,

        /// Export results to CSV file
        #[arg(long, value_name = "PATH")]
        output_csv: Option<PathBuf>,
    },

    /// Generate synthetic traces
    Generate {
        /// Total number of requests
        #[arg(long, default_value = "100000")]
        requests: u64,

        /// Number of files to split the trace over
        #[arg(long, default_value = "1")]
        files: u32,

        /// Number of distinct keys
        #[arg(long, default_value = "10000")]
        keys: u32,

        /// Percentage of traffic that goes to hot keys
        #[arg(long, default_value = "80")]
        hot_traffic: u8,

        /// Percentage of keys that are hot
        #[arg(long, default_value = "20")]
        hot_keys: u8,

        /// Largest priority written
        #[arg(long, default_value = "1000")]
        max_priority: u32,

        /// Seed for a reproducible trace
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory
        #[arg(short, long, default_value = "traces")]
        output_dir: PathBuf,

        /// Write buffer size in KB
        #[arg(long, default_value = "1024")]
        buffer_size: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ModeArg {
    Sequential,
    Concurrent,
    Both,
}

impl ModeArg {
    fn modes(self) -> Vec<CacheMode> {
        match self {
            ModeArg::Sequential => vec![CacheMode::Sequential],
            ModeArg::Concurrent => vec![CacheMode::Concurrent],
            ModeArg::Both => CacheMode::all(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OrderArg {
    Min,
    Max,
}

impl From<OrderArg> for HeapOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Min => HeapOrder::Min,
            OrderArg::Max => HeapOrder::Max,
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Generate {
            requests,
            files,
            keys,
            hot_traffic,
            hot_keys,
            max_priority,
            seed,
            output_dir,
            buffer_size,
        } => {
            let config = TraceConfig {
                requests,
                files,
                unique_keys: keys,
                hot_traffic_percent: hot_traffic,
                hot_keys_percent: hot_keys,
                max_priority,
                seed,
                output_dir,
                buffer_size_kb: buffer_size,
            };

            let summary = TraceGenerator::new(config).generate()?;
            for file in &summary.files {
                println!("{}", file.display());
            }
            Ok(())
        }

        Commands::Simulate {
            input_dir,
            capacity,
            mode,
            segments,
            no_reference,
            order,
            pop_every,
            output_csv,
        } => {
            let input_dir = match input_dir {
                Some(dir) => dir,
                None => {
                    let dir = PathBuf::from("test_data");
                    generator::ensure_sample_trace(&dir)?;
                    dir
                }
            };

            let capacity = NonZeroUsize::new(capacity).ok_or(algokit::ConfigError::ZeroCapacity)?;
            let modes = mode.modes();
            let config = SimulationConfig {
                input_dir,
                capacity,
                verify_reference: !no_reference && modes.contains(&CacheMode::Sequential),
                modes,
                segment_count: segments,
                queue: NonZeroUsize::new(pop_every).map(|pop_every| QueueWorkloadConfig {
                    order: order.into(),
                    pop_every,
                }),
            };

            run_simulation(config, output_csv)
        }
    }
}

/// Run the simulation with the given configuration
fn run_simulation(
    config: SimulationConfig,
    output_csv: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        input_dir = %config.input_dir.display(),
        capacity = config.capacity.get(),
        modes = ?config.modes,
        queue = ?config.queue,
        "starting simulation"
    );

    let runner = SimulationRunner::new(config);
    let result = runner.run().map_err(|e| {
        error!(error = %e, "simulation failed");
        e
    })?;

    let stats = SimulationStats::from_result(&result);
    stats.print_summary();
    if result.lru.len() > 1 {
        stats.print_comparison();
    }

    println!("\nSimulation completed in {:.2?}", result.duration);
    println!("Unique keys: {}", result.unique_keys);
    info!(summary = ?runner::summarize(&result), "simulation finished");

    if let Some(csv_path) = output_csv {
        stats.export_csv(&csv_path)?;
        println!("\nResults exported to: {}", csv_path.display());
    }

    Ok(())
}
