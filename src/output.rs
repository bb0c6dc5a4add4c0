//! Per-host result lines, gated by verbosity
//!
//! Interleaving across concurrent workers is expected; no ordering or
//! buffering is promised across partitions.

use crate::network::ProbeOutcome;
use std::net::Ipv4Addr;

/// Render one probe result as an output line, or None when the verbosity
/// level suppresses it.
///
/// Level 0 prints only alive hosts with no worker identity; level 1 adds
/// the worker tag; level 2 also reports unreachable and send-failed hosts.
pub fn format_event(
    worker_id: usize,
    target: Ipv4Addr,
    outcome: ProbeOutcome,
    verbosity: u8,
) -> Option<String> {
    match outcome {
        ProbeOutcome::Alive => match verbosity {
            0 => Some(format!("Host alive: {}", target)),
            _ => Some(format!("[Worker {}] Host alive: {}", worker_id, target)),
        },
        ProbeOutcome::NoReply if verbosity >= 2 => {
            Some(format!("[Worker {}] No response: {}", worker_id, target))
        }
        ProbeOutcome::SendFailed if verbosity >= 2 => {
            Some(format!("[Worker {}] Send failed: {}", worker_id, target))
        }
        _ => None,
    }
}

/// Print one probe result to stdout, if the verbosity level shows it
pub fn report(worker_id: usize, target: Ipv4Addr, outcome: ProbeOutcome, verbosity: u8) {
    if let Some(line) = format_event(worker_id, target, outcome, verbosity) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Ipv4Addr {
        Ipv4Addr::new(192, 168, 1, 5)
    }

    #[test]
    fn test_quiet_level_prints_only_alive() {
        assert_eq!(
            format_event(3, addr(), ProbeOutcome::Alive, 0),
            Some("Host alive: 192.168.1.5".to_string())
        );
        assert_eq!(format_event(3, addr(), ProbeOutcome::NoReply, 0), None);
        assert_eq!(format_event(3, addr(), ProbeOutcome::SendFailed, 0), None);
    }

    #[test]
    fn test_level_one_adds_worker_identity() {
        assert_eq!(
            format_event(3, addr(), ProbeOutcome::Alive, 1),
            Some("[Worker 3] Host alive: 192.168.1.5".to_string())
        );
        assert_eq!(format_event(3, addr(), ProbeOutcome::NoReply, 1), None);
    }

    #[test]
    fn test_level_two_reports_every_outcome() {
        assert_eq!(
            format_event(0, addr(), ProbeOutcome::Alive, 2),
            Some("[Worker 0] Host alive: 192.168.1.5".to_string())
        );
        assert_eq!(
            format_event(0, addr(), ProbeOutcome::NoReply, 2),
            Some("[Worker 0] No response: 192.168.1.5".to_string())
        );
        assert_eq!(
            format_event(0, addr(), ProbeOutcome::SendFailed, 2),
            Some("[Worker 0] Send failed: 192.168.1.5".to_string())
        );
    }
}
