//! Device picker seam used by the picker flow.

use async_trait::async_trait;

use crate::upnp::Device;

/// Answer from a [`DevicePicker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerChoice {
    /// Play on this device.
    Select(Device),
    /// Clear the list, rediscover and ask again.
    Refresh,
    /// Abandon the flow.
    Cancel,
}

/// Presents discovered devices to a user and returns their choice.
///
/// `devices` may be empty; the picker should still offer refresh and cancel.
#[async_trait]
pub trait DevicePicker: Send + Sync {
    async fn pick(&self, devices: &[Device]) -> PickerChoice;
}
