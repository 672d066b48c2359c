//! Trait abstractions for renderer operations.
//!
//! These traits enable dependency injection for testability and modularity.
//! Services depend on traits rather than concrete implementations.

use async_trait::async_trait;

use super::description::DescriptionResult;
use super::soap::SoapResult;
use super::types::Device;

/// Trait for AVTransport playback control operations.
///
/// Used by the playback coordinator to drive the selected renderer.
#[async_trait]
pub trait AvTransportControl: Send + Sync {
    /// Sets the renderer's transport URI (`SetAVTransportURI`).
    ///
    /// # Arguments
    /// * `control_url` - Absolute AVTransport control URL of the renderer
    /// * `media_url` - The media URL the renderer should fetch
    async fn set_uri(&self, control_url: &str, media_url: &str) -> SoapResult<()>;

    /// Starts playback of the current transport URI (`Play`, speed 1).
    async fn play(&self, control_url: &str) -> SoapResult<()>;

    /// Stops playback (`Stop`). Best effort: failures are logged, never returned.
    async fn stop(&self, control_url: &str);
}

/// Trait for resolving an SSDP `LOCATION` into a [`Device`].
///
/// Used by the discovery service to fan out description fetches.
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    /// Fetches and parses the device description at `location`.
    async fn fetch(&self, location: &str) -> DescriptionResult<Device>;
}
