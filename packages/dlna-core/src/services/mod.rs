//! Service layer for discovery and playback.
//!
//! - [`DiscoveryService`] - discovery sessions and description fan-out
//! - [`DeviceRegistry`] - deduplicated device store
//! - [`PlaybackService`] - control target and SetAVTransportURI/Play sequencing
//! - [`DevicePicker`] - seam for presenting devices to a user

pub mod discovery_service;
pub mod picker;
pub mod playback_service;
pub mod registry;

pub use discovery_service::{DiscoveryDeps, DiscoveryService};
pub use picker::{DevicePicker, PickerChoice};
pub use playback_service::{ControlTarget, PlaybackService};
pub use registry::DeviceRegistry;
