//! Raw-socket ICMP echo prober
//!
//! One raw socket per worker, reused for every host in that worker's
//! partition. Exactly one echo request per host, no retransmission.

use crate::network::{ProbeMethod, ProbeOutcome};
use crate::ScanError;
use pnet::packet::icmp::echo_request::MutableEchoRequestPacket;
use pnet::packet::icmp::{IcmpCode, IcmpPacket, IcmpTypes};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

/// Echo request wire size: 8-byte ICMP header plus fixed payload
const PACKET_SIZE: usize = 64;

/// Raw-socket echo prober, one per worker
pub struct IcmpProber {
    socket: Socket,
    identifier: u16,
    sequence: AtomicU16,
    timeout: Duration,
}

impl IcmpProber {
    /// Open the worker's raw ICMP socket
    pub fn new(timeout: Duration) -> crate::Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    ScanError::PermissionError(
                        "raw ICMP socket denied; rerun with CAP_NET_RAW or use --probe ping"
                            .to_string(),
                    )
                } else {
                    ScanError::NetworkError(e.to_string())
                }
            })?;

        socket
            .set_nonblocking(true)
            .map_err(|e| ScanError::NetworkError(e.to_string()))?;

        Ok(Self {
            socket,
            identifier: std::process::id() as u16,
            sequence: AtomicU16::new(0),
            timeout,
        })
    }

    fn send_echo_request(&self, target: Ipv4Addr) -> std::io::Result<()> {
        let mut buffer = [0u8; PACKET_SIZE];
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        build_echo_request(&mut buffer, self.identifier, sequence);

        let dest = socket2::SockAddr::from(SocketAddr::new(IpAddr::V4(target), 0));
        self.socket.send_to(&buffer, &dest)?;
        Ok(())
    }

    /// Poll the socket until an echo reply arrives. The caller bounds this
    /// with the probe timeout; other ICMP traffic on the socket is skipped.
    async fn wait_for_reply(&self) -> std::io::Result<()> {
        let mut buffer = vec![std::mem::MaybeUninit::new(0u8); 1024];

        loop {
            match self.socket.recv_from(&mut buffer) {
                Ok((bytes_received, _addr)) => {
                    // IP header (20) + ICMP header (8)
                    if bytes_received < 28 {
                        continue;
                    }

                    let received: Vec<u8> = buffer[..bytes_received]
                        .iter()
                        .map(|b| unsafe { b.assume_init() })
                        .collect();

                    if let Some(ip_packet) = Ipv4Packet::new(&received) {
                        if ip_packet.get_next_level_protocol() != IpNextHeaderProtocols::Icmp {
                            continue;
                        }
                        let icmp_offset = (ip_packet.get_header_length() as usize) * 4;
                        if let Some(icmp_packet) =
                            IcmpPacket::new(&received[icmp_offset..bytes_received])
                        {
                            if icmp_packet.get_icmp_type() == IcmpTypes::EchoReply {
                                return Ok(());
                            }
                        }
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait::async_trait]
impl ProbeMethod for IcmpProber {
    async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome {
        if let Err(e) = self.send_echo_request(target) {
            log::debug!("echo request to {} failed to send: {}", target, e);
            return ProbeOutcome::SendFailed;
        }

        match tokio::time::timeout(self.timeout, self.wait_for_reply()).await {
            Ok(Ok(())) => ProbeOutcome::Alive,
            Ok(Err(e)) => {
                log::debug!("receive error while waiting on {}: {}", target, e);
                ProbeOutcome::NoReply
            }
            Err(_) => ProbeOutcome::NoReply,
        }
    }

    fn method_name(&self) -> &str {
        "icmp-echo"
    }
}

/// Fill `buffer` with a complete echo request: type 8, code 0, the given
/// identifier and sequence, and a checksum over the whole message.
fn build_echo_request(buffer: &mut [u8], identifier: u16, sequence: u16) {
    {
        let mut packet = MutableEchoRequestPacket::new(buffer)
            .expect("buffer holds at least an ICMP echo header");
        packet.set_icmp_type(IcmpTypes::EchoRequest);
        packet.set_icmp_code(IcmpCode(0));
        packet.set_identifier(identifier);
        packet.set_sequence_number(sequence);
        packet.set_checksum(0);
    }

    let checksum = icmp_checksum(buffer);
    buffer[2..4].copy_from_slice(&checksum.to_be_bytes());
}

/// Standard internet checksum: sum big-endian 16-bit words, fold the
/// carries back into the low 16 bits, complement.
pub fn icmp_checksum(data: &[u8]) -> u16 {
    let mut sum = 0u32;

    for chunk in data.chunks(2) {
        if chunk.len() == 2 {
            sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
        } else {
            sum += (chunk[0] as u32) << 8;
        }
    }

    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !sum as u16
}
