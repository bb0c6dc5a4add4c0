//! Sweep coordinator and worker loop

use crate::config::{default_workers, SweepConfig};
use crate::network::{ProbeMethod, ProbeMode, Prober, ProcessRegistry};
use crate::output;
use crate::scanner::{partition_offsets, WorkerConfig};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sweep coordinator: owns the worker pool lifecycle.
///
/// Workers are spawned once at sweep start, one per partition, and joined
/// once at sweep end. No resizing, no work stealing, no shared results; the
/// per-host stdout lines are the only output.
pub struct SweepEngine {
    base: Ipv4Addr,
    host_count: u32,
    workers: usize,
    verbosity: u8,
    probe: ProbeMode,
    timeout: Duration,
    registry: Arc<ProcessRegistry>,
}

impl SweepEngine {
    /// Create a sweep engine over `host_count` usable hosts above `base`.
    ///
    /// The caller has already validated the CIDR block; only the guards
    /// needed to keep partitioning well-defined are re-checked here.
    pub fn new(base: Ipv4Addr, host_count: u32, config: &SweepConfig) -> crate::Result<Self> {
        config.validate()?;

        if host_count == 0 {
            return Err(crate::ScanError::ConfigError(
                "Host range is empty".to_string(),
            ));
        }

        let workers = config
            .workers
            .unwrap_or_else(|| default_workers(host_count))
            .min(host_count as usize);

        Ok(Self {
            base,
            host_count,
            workers,
            verbosity: config.verbosity,
            probe: config.probe,
            timeout: config.timeout_duration(),
            registry: Arc::new(ProcessRegistry::new()),
        })
    }

    /// Number of workers the sweep will run with
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// The registry tracking in-flight ping subprocesses, for wiring up an
    /// interrupt handler
    pub fn registry(&self) -> Arc<ProcessRegistry> {
        Arc::clone(&self.registry)
    }

    /// Run the sweep. Returns only once every host in [1, host_count] has
    /// been probed exactly once.
    pub async fn run(&self) -> crate::Result<()> {
        let probe = self.probe;
        let timeout = self.timeout;
        let registry = Arc::clone(&self.registry);

        self.run_with(move || Prober::build(probe, timeout, Arc::clone(&registry)))
            .await
    }

    /// Sweep with a caller-supplied prober builder. Each worker builds its
    /// own prober instance, so raw mode gets one socket per worker and a
    /// setup failure costs only that worker's partition.
    async fn run_with<P, F>(&self, build: F) -> crate::Result<()>
    where
        P: ProbeMethod + 'static,
        F: Fn() -> crate::Result<P> + Send + Sync + Clone + 'static,
    {
        let start = Instant::now();
        let partitions = partition_offsets(self.host_count, self.workers);
        log::info!(
            "sweeping {} hosts from {} with {} workers",
            self.host_count,
            self.base,
            partitions.len()
        );

        let mut handles = Vec::with_capacity(partitions.len());

        for (worker_id, partition) in partitions.into_iter().enumerate() {
            let config = WorkerConfig {
                worker_id,
                base: self.base,
                partition,
                verbosity: self.verbosity,
            };
            let build = build.clone();

            handles.push(tokio::spawn(async move {
                let prober = match build() {
                    Ok(prober) => prober,
                    Err(e) => {
                        log::error!(
                            "worker {}: probe setup failed, abandoning offsets {}-{}: {}",
                            config.worker_id,
                            config.partition.start,
                            config.partition.end,
                            e
                        );
                        return;
                    }
                };
                run_worker(&config, &prober).await;
            }));
        }

        // A panicked worker never aborts its siblings; join everything.
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                log::error!("worker task failed: {}", e);
            }
        }

        log::info!("sweep finished in {:.2?}", start.elapsed());
        Ok(())
    }
}

/// Probe one partition, strictly in ascending offset order, reporting each
/// outcome at the configured verbosity.
pub async fn run_worker<P: ProbeMethod>(config: &WorkerConfig, prober: &P) {
    let base = u32::from(config.base);

    for offset in config.partition.start..=config.partition.end {
        let target = Ipv4Addr::from(base.wrapping_add(offset));
        let outcome = prober.probe(target).await;
        output::report(config.worker_id, target, outcome, config.verbosity);
    }
}
