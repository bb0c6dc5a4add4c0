//! Subprocess echo prober and the registry of its spawned processes
//!
//! Each probe spawns one `ping -c 1 -W 1 <addr>` with stdout/stderr sent to
//! the null sink, so the only output on the terminal is the sweeper's own.
//! Child pids are tracked in a shared [`ProcessRegistry`] so an operator
//! interrupt can reap every in-flight probe at once.

use crate::network::{ProbeMethod, ProbeOutcome};
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::process::Command;

/// Hard cap on tracked pids; spawns beyond it still run, they just lose
/// cancellation coverage.
const MAX_TRACKED_PIDS: usize = 65536;

/// Thread-safe set of live probe-process identifiers.
///
/// Owned by the coordinator and handed to each subprocess prober; the lock
/// is held only for insert/remove/sweep, never across a probe await.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    pids: Mutex<HashSet<u32>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<u32>> {
        match self.pids.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Track a spawned probe process. Beyond the hard cap the pid is
    /// silently dropped rather than failing the sweep.
    pub fn register(&self, pid: u32) {
        let mut pids = self.lock();
        if pids.len() >= MAX_TRACKED_PIDS {
            log::debug!("process registry full, not tracking pid {}", pid);
            return;
        }
        pids.insert(pid);
    }

    /// Stop tracking a probe process that has completed
    pub fn deregister(&self, pid: u32) {
        self.lock().remove(&pid);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Registered pids at this instant
    pub fn snapshot(&self) -> Vec<u32> {
        self.lock().iter().copied().collect()
    }

    /// Send SIGKILL to every registered probe process. Best-effort: a pid
    /// that already exited is a harmless no-op target. Returns the number
    /// of pids signalled.
    #[cfg(unix)]
    pub fn kill_all(&self) -> usize {
        let pids = self.snapshot();
        for &pid in &pids {
            // SAFETY: plain kill(2) call; no memory is touched.
            unsafe {
                libc::kill(pid as libc::pid_t, libc::SIGKILL);
            }
        }
        pids.len()
    }

    #[cfg(not(unix))]
    pub fn kill_all(&self) -> usize {
        0
    }
}

/// Subprocess echo prober; delegates raw-socket work to the ping binary
pub struct PingProber {
    timeout: Duration,
    registry: Arc<ProcessRegistry>,
}

impl PingProber {
    pub fn new(timeout: Duration, registry: Arc<ProcessRegistry>) -> Self {
        Self { timeout, registry }
    }
}

/// The ping binary's `-W` takes whole seconds, so this variant works at
/// one-second granularity: sub-second timeouts round up, never down to 0.
fn ping_timeout_secs(timeout: Duration) -> u64 {
    (((timeout.as_millis() + 999) / 1000) as u64).max(1)
}

#[async_trait::async_trait]
impl ProbeMethod for PingProber {
    async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome {
        let timeout_secs = ping_timeout_secs(self.timeout);

        let child = Command::new("ping")
            .arg("-c")
            .arg("1")
            .arg("-W")
            .arg(timeout_secs.to_string())
            .arg(target.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                log::debug!("failed to spawn ping for {}: {}", target, e);
                return ProbeOutcome::SendFailed;
            }
        };

        // Register before blocking on completion so an interrupt sweep
        // can reach this probe.
        let pid = child.id();
        if let Some(pid) = pid {
            self.registry.register(pid);
        }

        let status = child.wait().await;

        if let Some(pid) = pid {
            self.registry.deregister(pid);
        }

        match status {
            Ok(status) if status.success() => ProbeOutcome::Alive,
            // Non-zero exit, or killed by a cancellation sweep
            Ok(_) => ProbeOutcome::NoReply,
            Err(e) => {
                log::debug!("wait on ping for {} failed: {}", target, e);
                ProbeOutcome::NoReply
            }
        }
    }

    fn method_name(&self) -> &str {
        "ping-command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_deregister() {
        let registry = ProcessRegistry::new();
        assert!(registry.is_empty());

        registry.register(1234);
        registry.register(5678);
        assert_eq!(registry.len(), 2);

        registry.deregister(1234);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot(), vec![5678]);
    }

    #[test]
    fn test_no_double_registration() {
        let registry = ProcessRegistry::new();
        registry.register(42);
        registry.register(42);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_only_contains_registered() {
        let registry = ProcessRegistry::new();
        registry.register(10);
        registry.register(20);
        registry.deregister(10);

        let snapshot = registry.snapshot();
        assert!(!snapshot.contains(&10));
        assert!(snapshot.contains(&20));
        assert!(!snapshot.contains(&30));
    }

    #[test]
    fn test_ping_timeout_rounds_up_to_whole_seconds() {
        assert_eq!(ping_timeout_secs(Duration::from_millis(500)), 1);
        assert_eq!(ping_timeout_secs(Duration::from_millis(1000)), 1);
        assert_eq!(ping_timeout_secs(Duration::from_millis(1001)), 2);
        assert_eq!(ping_timeout_secs(Duration::from_millis(2500)), 3);
        assert_eq!(ping_timeout_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_register_beyond_cap_is_a_silent_no_op() {
        let registry = ProcessRegistry::new();
        for pid in 0..MAX_TRACKED_PIDS as u32 {
            registry.register(pid);
        }
        assert_eq!(registry.len(), MAX_TRACKED_PIDS);

        // The overflow pid is dropped, not stored, and nothing fails.
        let overflow_pid = MAX_TRACKED_PIDS as u32;
        registry.register(overflow_pid);
        assert_eq!(registry.len(), MAX_TRACKED_PIDS);
        assert!(!registry.snapshot().contains(&overflow_pid));

        // Completed probes still free capacity for new registrations.
        registry.deregister(0);
        registry.register(overflow_pid);
        assert_eq!(registry.len(), MAX_TRACKED_PIDS);
        assert!(registry.snapshot().contains(&overflow_pid));
    }

    #[test]
    fn test_registry_shared_across_threads() {
        let registry = Arc::new(ProcessRegistry::new());
        let mut handles = Vec::new();

        for base in 0..4u32 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    registry.register(base * 1000 + i);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 400);
    }
}
