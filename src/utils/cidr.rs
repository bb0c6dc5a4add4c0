//! CIDR parsing and validation for sweep targets
//!
//! The sweep engine takes a validated base address and host count; this is
//! where that validation lives. The base must be the aligned network
//! address, and the network and broadcast addresses are excluded from the
//! usable host count.

use anyhow::{bail, Context, Result};
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// A validated, subnet-aligned IPv4 CIDR block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CidrRange {
    /// Aligned network base address
    pub base: Ipv4Addr,
    /// Prefix length (0-32)
    pub prefix: u8,
    /// Usable hosts: 2^(32-prefix) - 2, or 1 for a /32
    pub host_count: u32,
}

/// Parse and validate a CIDR block like `192.168.1.0/24`.
///
/// Rejects input without an explicit prefix, unaligned base addresses, and
/// blocks with zero usable hosts (a /31 has only the network and broadcast
/// addresses).
pub fn parse_cidr(input: &str) -> Result<CidrRange> {
    if !input.contains('/') {
        bail!("CIDR format required (e.g. 192.168.0.0/24)");
    }

    let network: Ipv4Network = input
        .parse()
        .with_context(|| format!("invalid CIDR block: {}", input))?;

    if network.ip() != network.network() {
        bail!(
            "{} is not aligned with /{}; use the network base (e.g. .0 for /24)",
            network.ip(),
            network.prefix()
        );
    }

    let host_count = usable_hosts(network.prefix())?;

    Ok(CidrRange {
        base: network.network(),
        prefix: network.prefix(),
        host_count,
    })
}

fn usable_hosts(prefix: u8) -> Result<u32> {
    match prefix {
        32 => Ok(1),
        31 => bail!("/31 has zero usable hosts"),
        p => {
            let total = 1u64 << (32 - p);
            Ok((total - 2) as u32)
        }
    }
}
