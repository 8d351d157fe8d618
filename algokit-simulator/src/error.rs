//! Error type shared by trace generation, trace parsing and simulation.

use std::io;
use std::path::PathBuf;
use std::time::SystemTimeError;

use algokit::error::ConfigError;
use thiserror::Error;

/// Everything that can stop a simulator command.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// Reading a trace or writing a generated one failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A trace line could not be parsed.
    #[error("{}:{line}: {reason}", .file.display())]
    Parse {
        /// Trace file containing the bad line.
        file: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The input directory held no trace files, or only empty ones.
    #[error("no requests found in {}", .0.display())]
    EmptyTrace(PathBuf),

    /// The cache or queue rejected its configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Writing the CSV report failed.
    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),

    /// The system clock reported a time before the Unix epoch.
    #[error("system clock error: {0}")]
    Clock(#[from] SystemTimeError),

    /// A generator worker thread panicked.
    #[error("trace generator worker for file {0} panicked")]
    WorkerPanicked(u32),
}
