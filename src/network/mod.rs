//! Probe mechanisms for host-liveness checks
//!
//! Two interchangeable probers exist: one spawns the system ping binary per
//! host, one drives a raw ICMP socket directly. Selection happens once at
//! sweep start and never switches mid-sweep.

pub mod icmp;
pub mod ping;

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub use icmp::IcmpProber;
pub use ping::{PingProber, ProcessRegistry};

/// Classification of a single probe's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Host answered the echo request within the timeout
    Alive,
    /// No verifiable reply within the timeout
    NoReply,
    /// The request never left this machine
    SendFailed,
}

impl ProbeOutcome {
    pub fn is_alive(&self) -> bool {
        matches!(self, ProbeOutcome::Alive)
    }
}

/// Probe mechanism selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// Spawn the system ping binary per host; needs no privileges
    Ping,
    /// Raw ICMP socket per worker; needs CAP_NET_RAW or root
    Raw,
}

impl ProbeMode {
    pub fn name(&self) -> &'static str {
        match self {
            ProbeMode::Ping => "ping",
            ProbeMode::Raw => "raw",
        }
    }
}

impl FromStr for ProbeMode {
    type Err = crate::ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ping" => Ok(ProbeMode::Ping),
            "raw" => Ok(ProbeMode::Raw),
            other => Err(crate::ScanError::ConfigError(format!(
                "Unknown probe mode: {} (expected 'ping' or 'raw')",
                other
            ))),
        }
    }
}

/// Probe method trait
#[async_trait::async_trait]
pub trait ProbeMethod: Send + Sync {
    /// Probe a single host, classifying the result. Blocks the calling
    /// worker for at most the configured timeout.
    async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome;

    fn method_name(&self) -> &str;
}

/// Enum wrapper over the probe variants to avoid dyn dispatch at the seam
pub enum Prober {
    Ping(PingProber),
    Icmp(IcmpProber),
}

impl Prober {
    /// Build a prober for one worker. Raw mode opens the worker's own raw
    /// socket here, so a permission failure surfaces before any probing.
    pub fn build(
        mode: ProbeMode,
        timeout: Duration,
        registry: Arc<ProcessRegistry>,
    ) -> crate::Result<Self> {
        match mode {
            ProbeMode::Ping => Ok(Prober::Ping(PingProber::new(timeout, registry))),
            ProbeMode::Raw => Ok(Prober::Icmp(IcmpProber::new(timeout)?)),
        }
    }
}

#[async_trait::async_trait]
impl ProbeMethod for Prober {
    async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome {
        match self {
            Prober::Ping(prober) => prober.probe(target).await,
            Prober::Icmp(prober) => prober.probe(target).await,
        }
    }

    fn method_name(&self) -> &str {
        match self {
            Prober::Ping(prober) => prober.method_name(),
            Prober::Icmp(prober) => prober.method_name(),
        }
    }
}
