//! DLNA Core - renderer discovery and playback control.
//!
//! This crate finds UPnP/DLNA media renderers on the local network with SSDP,
//! reads their device descriptions and drives playback through AVTransport
//! SOAP actions.
//!
//! # Architecture
//!
//! - [`upnp`]: protocol layer (SSDP, description documents, SOAP, AVTransport)
//! - [`services`]: discovery sessions, device registry, playback sequencing
//! - [`events`]: listener abstraction and single-context event delivery
//! - [`runtime`]: worker pool for background network I/O
//! - [`multicast`]: multicast capability handle
//! - [`lifecycle`]: service state transitions
//! - [`bootstrap`]: composition root and the [`DlnaService`] surface
//! - [`state`]: configuration
//! - [`error`]: error types and codes
//!
//! # Abstraction Traits
//!
//! Every network-facing dependency is injected so the service can be tested
//! without sockets:
//!
//! - [`HttpTransport`](upnp::HttpTransport): description GETs and SOAP POSTs
//! - [`SsdpSocketFactory`](upnp::discovery::SsdpSocketFactory): per-round UDP sockets
//! - [`MulticastLock`](multicast::MulticastLock): platform multicast grant
//! - [`TaskSpawner`](runtime::TaskSpawner): background task submission
//! - [`DlnaListener`](events::DlnaListener): event sink

#![warn(clippy::all)]

pub mod bootstrap;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod multicast;
pub mod protocol_constants;
pub mod runtime;
pub mod services;
pub mod state;
pub mod upnp;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types at the crate root
pub use bootstrap::{bootstrap_service, DlnaService, ServiceDeps};
pub use error::{DlnaError, DlnaResult, ErrorCode};
pub use events::{ChannelListener, DlnaEvent, DlnaListener, LoggingListener, NoopListener};
pub use lifecycle::ServiceState;
pub use multicast::{MulticastLock, ProcessMulticastLock};
pub use runtime::{TaskSpawner, WorkerPool};
pub use services::{ControlTarget, DevicePicker, PickerChoice};
pub use state::Config;
pub use upnp::{AvTransportClient, AvTransportControl, Device, HttpTransport, ReqwestTransport};
