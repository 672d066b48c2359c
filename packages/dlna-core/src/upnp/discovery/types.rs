//! Shared types for renderer discovery.

use thiserror::Error;

/// Errors that end a discovery round.
///
/// None of these reach the event listener: discovery is best-effort and the
/// caller may simply start another round.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Failed to create or bind the UDP socket for discovery.
    #[error("failed to bind UDP socket: {0}")]
    SocketBind(#[source] std::io::Error),

    /// Failed to send the SSDP search datagram.
    #[error("failed to send SSDP search: {0}")]
    SendSearch(#[source] std::io::Error),
}

/// Convenient Result alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Counters describing a finished discovery round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundSummary {
    /// Datagrams received during the window.
    pub responses: usize,
    /// Responses that carried a usable `LOCATION` header.
    pub locations: usize,
    /// Whether the round ended because of `stop()` rather than the deadline.
    pub cancelled: bool,
}
