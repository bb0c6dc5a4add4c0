//! Range partitioner property tests

use deimos::{partition_offsets, Partition};
use proptest::prelude::*;

proptest! {
    /// The union of all partitions is exactly {1, ..., H}, each offset
    /// assigned to exactly one partition.
    #[test]
    fn coverage(host_count in 1u32..5000, workers in 1usize..600) {
        let partitions = partition_offsets(host_count, workers);

        let mut expected = 1u32;
        for p in &partitions {
            prop_assert_eq!(p.start, expected);
            prop_assert!(p.start <= p.end);
            expected = p.end + 1;
        }
        prop_assert_eq!(expected, host_count + 1);
    }

    /// Partition sizes differ by at most one.
    #[test]
    fn balance(host_count in 1u32..5000, workers in 1usize..600) {
        let partitions = partition_offsets(host_count, workers);

        let largest = partitions.iter().map(Partition::len).max().unwrap();
        let smallest = partitions.iter().map(Partition::len).min().unwrap();
        prop_assert!(largest - smallest <= 1);
    }

    /// Partition i's offsets are strictly below partition i+1's.
    #[test]
    fn monotonicity(host_count in 1u32..5000, workers in 1usize..600) {
        let partitions = partition_offsets(host_count, workers);

        for pair in partitions.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    /// A worker count above the host count never produces empty partitions.
    #[test]
    fn no_empty_partitions(host_count in 1u32..200, workers in 1usize..600) {
        let partitions = partition_offsets(host_count, workers);

        prop_assert!(partitions.len() as u32 <= host_count);
        for p in &partitions {
            prop_assert!(p.len() >= 1);
        }
    }
}

#[test]
fn example_scenario_ten_hosts_three_workers() {
    let partitions = partition_offsets(10, 3);

    let sizes: Vec<u32> = partitions.iter().map(Partition::len).collect();
    assert_eq!(sizes, vec![4, 3, 3]);
    assert_eq!(partitions.first().unwrap().start, 1);
    assert_eq!(partitions.last().unwrap().end, 10);
}
