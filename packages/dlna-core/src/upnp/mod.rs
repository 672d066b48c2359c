//! UPnP renderer discovery and AVTransport control.
//!
//! # Module Structure
//!
//! - `types` - the `Device` domain type
//! - `traits` - trait abstractions for testability
//! - `http` - HTTP transport seam and the reqwest implementation
//! - `discovery` - SSDP search rounds
//! - `description` - device description fetching and field extraction
//! - `soap` - low-level SOAP protocol implementation
//! - `playback` - SetAVTransportURI, Play and Stop
//! - `utils` - header, tag and URL helpers

pub mod description;
pub mod discovery;
pub mod http;
pub(crate) mod playback;
pub mod soap;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use description::{DescriptionError, DescriptionFetcher, DescriptionResult};
pub use http::{HttpError, HttpReply, HttpTransport, ReqwestTransport};
pub use playback::AvTransportClient;
pub use traits::{AvTransportControl, DescriptionSource};
pub use types::Device;
