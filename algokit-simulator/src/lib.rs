// Trace-driven simulator for the algokit LRU cache and priority queue

pub mod error;
pub mod generator;
pub mod input;
pub mod models;
pub mod runner;
pub mod stats;

pub use error::SimulatorError;
