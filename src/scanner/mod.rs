//! Scanner module containing range partitioning and the sweep engine

pub mod engine;

use std::net::Ipv4Addr;

pub use engine::SweepEngine;

/// A contiguous sub-range of host offsets, owned by exactly one worker.
/// Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub start: u32,
    pub end: u32,
}

impl Partition {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Per-worker configuration, built once by the coordinator and read-only
/// for the worker's lifetime
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub worker_id: usize,
    pub base: Ipv4Addr,
    pub partition: Partition,
    pub verbosity: u8,
}

/// Split the usable host offsets [1, host_count] into near-equal contiguous
/// partitions, one per worker.
///
/// Offset 0 (the network address) is always skipped. The first
/// `host_count % workers` partitions absorb the uneven remainder, so sizes
/// differ by at most one and assignment order is strictly increasing. A
/// worker count above the host count is capped so no partition is empty.
pub fn partition_offsets(host_count: u32, workers: usize) -> Vec<Partition> {
    if host_count == 0 {
        return Vec::new();
    }

    let workers = (workers.max(1) as u32).min(host_count);
    let per_worker = host_count / workers;
    let remainder = host_count % workers;

    let mut partitions = Vec::with_capacity(workers as usize);
    let mut start = 1u32;

    for i in 0..workers {
        let mut end = start + per_worker - 1;
        if i < remainder {
            end += 1;
        }
        partitions.push(Partition::new(start, end));
        start = end + 1;
    }

    partitions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let partitions = partition_offsets(12, 3);
        assert_eq!(
            partitions,
            vec![
                Partition::new(1, 4),
                Partition::new(5, 8),
                Partition::new(9, 12),
            ]
        );
    }

    #[test]
    fn test_remainder_spread_over_first_partitions() {
        // 10 hosts over 3 workers -> sizes {4, 3, 3}
        let partitions = partition_offsets(10, 3);
        assert_eq!(
            partitions,
            vec![
                Partition::new(1, 4),
                Partition::new(5, 7),
                Partition::new(8, 10),
            ]
        );
    }

    #[test]
    fn test_workers_capped_at_host_count() {
        let partitions = partition_offsets(3, 10);
        assert_eq!(partitions.len(), 3);
        for p in &partitions {
            assert_eq!(p.len(), 1);
        }
    }

    #[test]
    fn test_single_worker_gets_everything() {
        let partitions = partition_offsets(254, 1);
        assert_eq!(partitions, vec![Partition::new(1, 254)]);
    }

    #[test]
    fn test_single_host() {
        assert_eq!(partition_offsets(1, 1), vec![Partition::new(1, 1)]);
    }

    #[test]
    fn test_zero_hosts_yields_no_partitions() {
        assert!(partition_offsets(0, 4).is_empty());
    }
}
