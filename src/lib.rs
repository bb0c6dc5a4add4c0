//! Deimos - a host-liveness sweeper forged in Rust
//!
//! Splits an IPv4 range across a bounded worker pool and probes every host
//! with a single ICMP echo, either through the system ping binary or a raw
//! socket.

pub mod config;
pub mod error;
pub mod network;
pub mod output;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use config::SweepConfig;
pub use error::{ScanError, ScanResult};
pub use network::{ProbeMethod, ProbeMode, ProbeOutcome, Prober, ProcessRegistry};
pub use scanner::engine::SweepEngine;
pub use scanner::{partition_offsets, Partition, WorkerConfig};

pub type Result<T> = std::result::Result<T, ScanError>;
