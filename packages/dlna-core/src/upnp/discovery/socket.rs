//! UDP socket seam for SSDP.
//!
//! The discovery round talks to an [`SsdpSocket`] obtained from an
//! [`SsdpSocketFactory`], so tests can script responses without a network.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use async_trait::async_trait;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use super::types::{DiscoveryError, DiscoveryResult};
use crate::protocol_constants::SSDP_MULTICAST_TTL;

/// A datagram socket used for one discovery round.
///
/// The socket is closed when dropped at the end of the round.
#[async_trait]
pub trait SsdpSocket: Send + Sync {
    /// Sends one datagram to `target`.
    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;

    /// Receives one datagram, returning its length and sender.
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;
}

/// Opens a fresh [`SsdpSocket`] per discovery round.
pub trait SsdpSocketFactory: Send + Sync {
    fn open(&self) -> DiscoveryResult<Box<dyn SsdpSocket>>;
}

/// Factory producing real UDP sockets bound to an ephemeral port.
///
/// Renderers reply unicast to the sending socket, so the same socket is
/// used for the search and for collecting responses.
#[derive(Debug, Clone, Copy)]
pub struct UdpSocketFactory {
    bind_ip: Ipv4Addr,
}

impl UdpSocketFactory {
    /// Binds on all interfaces.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bind_ip: Ipv4Addr::UNSPECIFIED,
        }
    }

    /// Binds on a specific local interface address.
    #[must_use]
    pub fn bound_to(bind_ip: Ipv4Addr) -> Self {
        Self { bind_ip }
    }
}

impl Default for UdpSocketFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SsdpSocketFactory for UdpSocketFactory {
    fn open(&self) -> DiscoveryResult<Box<dyn SsdpSocket>> {
        Ok(Box::new(create_socket(self.bind_ip)?))
    }
}

/// Creates a UDP socket for SSDP discovery.
///
/// Sets up socket options:
/// - SO_REUSEADDR for rapid restarts
/// - Multicast TTL of 4 per UPnP spec
fn create_socket(bind_ip: Ipv4Addr) -> DiscoveryResult<UdpSocket> {
    let bind_addr = SocketAddr::new(IpAddr::V4(bind_ip), 0);

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(DiscoveryError::SocketBind)?;

    if let Err(e) = socket.set_reuse_address(true) {
        log::warn!("[SSDP] Failed to set SO_REUSEADDR on {}: {}", bind_ip, e);
    }

    if let Err(e) = socket.set_multicast_ttl_v4(SSDP_MULTICAST_TTL) {
        log::warn!("[SSDP] Failed to set multicast TTL on {}: {}", bind_ip, e);
    }

    // Set non-blocking before converting to tokio socket
    socket
        .set_nonblocking(true)
        .map_err(DiscoveryError::SocketBind)?;

    socket
        .bind(&bind_addr.into())
        .map_err(DiscoveryError::SocketBind)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket).map_err(DiscoveryError::SocketBind)
}

#[async_trait]
impl SsdpSocket for UdpSocket {
    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, target).await
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf).await
    }
}
