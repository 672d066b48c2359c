//! Renderer discovery over SSDP.
//!
//! - `socket` - UDP socket seam and the socket2-backed factory
//! - `ssdp` - M-SEARCH construction and the per-round receive loop
//! - `types` - errors and round counters

mod socket;
mod ssdp;
mod types;

pub use socket::{SsdpSocket, SsdpSocketFactory, UdpSocketFactory};
pub use ssdp::{build_msearch_message, parse_location, run_search_round};
pub use types::{DiscoveryError, DiscoveryResult, RoundSummary};
