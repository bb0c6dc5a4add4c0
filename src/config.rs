//! Configuration module for the deimos sweeper

use crate::network::ProbeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for sweep operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Target network in CIDR notation
    pub target: String,

    /// Number of concurrent workers; None picks a size from the host count
    pub workers: Option<usize>,

    /// Output verbosity (0-2)
    pub verbosity: u8,

    /// Probe mechanism, selected once at sweep start
    pub probe: ProbeMode,

    /// Per-host reply timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            target: "192.168.0.0/24".to_string(),
            workers: None,
            verbosity: 0,
            probe: ProbeMode::Ping,
            timeout_ms: 1000,
        }
    }
}

impl SweepConfig {
    /// Create a new sweep configuration for a target network
    pub fn new(target: String) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the verbosity level
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the probe mechanism
    pub fn with_probe(mut self, probe: ProbeMode) -> Self {
        self.probe = probe;
        self
    }

    /// Set the per-host timeout
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| crate::ScanError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: SweepConfig = toml::from_str(&content)
            .map_err(|e| crate::ScanError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from the default location (~/.deimos.toml)
    pub fn load_default_config() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        let config_path = home_dir.join(".deimos.toml");

        if config_path.exists() {
            if let Ok(config) = Self::from_toml_file(&config_path) {
                log::info!("loaded config from {}", config_path.display());
                return config;
            }
        }

        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.target.is_empty() {
            return Err(crate::ScanError::ConfigError("Target cannot be empty".to_string()));
        }

        if self.verbosity > 2 {
            return Err(crate::ScanError::ConfigError("Verbosity must be 0, 1, or 2".to_string()));
        }

        if self.workers == Some(0) {
            return Err(crate::ScanError::ConfigError("Worker count must be greater than 0".to_string()));
        }

        if self.timeout_ms == 0 {
            return Err(crate::ScanError::ConfigError("Timeout must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Pick a worker count for a host range.
///
/// Small ranges get one worker per host; larger ranges get one worker per
/// eight hosts, clamped to [256, 1024] and never more than the host count.
pub fn default_workers(host_count: u32) -> usize {
    if host_count <= 254 {
        return host_count as usize;
    }

    let workers = (host_count / 8).clamp(256, 1024);
    workers.min(host_count) as usize
}
