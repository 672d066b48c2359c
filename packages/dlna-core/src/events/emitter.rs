//! Listener abstraction for discovery and playback events.

use tokio::sync::mpsc;

use super::DlnaEvent;
use crate::upnp::Device;

/// Receives events from the service.
///
/// Callbacks run on the dispatcher's context and should return quickly.
pub trait DlnaListener: Send + Sync {
    fn on_device_found(&self, device: &Device);

    fn on_device_removed(&self, device: &Device);

    fn on_playback_started(&self, device: &Device, media_url: &str);

    /// `message` is human-readable and names the failing step.
    fn on_playback_error(&self, message: &str);
}

/// Routes `event` to the matching listener callback.
pub fn deliver(listener: &dyn DlnaListener, event: &DlnaEvent) {
    match event {
        DlnaEvent::DeviceFound { device } => listener.on_device_found(device),
        DlnaEvent::DeviceRemoved { device } => listener.on_device_removed(device),
        DlnaEvent::PlaybackStarted { device, media_url } => {
            listener.on_playback_started(device, media_url)
        }
        DlnaEvent::PlaybackError { message } => listener.on_playback_error(message),
    }
}

/// Discards every event.
pub struct NoopListener;

impl DlnaListener for NoopListener {
    fn on_device_found(&self, _device: &Device) {}

    fn on_device_removed(&self, _device: &Device) {}

    fn on_playback_started(&self, _device: &Device, _media_url: &str) {}

    fn on_playback_error(&self, _message: &str) {}
}

/// Logs every event. Useful for debugging event flow.
pub struct LoggingListener;

impl DlnaListener for LoggingListener {
    fn on_device_found(&self, device: &Device) {
        tracing::info!(name = %device.name, udn = ?device.udn, "device_found");
    }

    fn on_device_removed(&self, device: &Device) {
        tracing::debug!(name = %device.name, udn = ?device.udn, "device_removed");
    }

    fn on_playback_started(&self, device: &Device, media_url: &str) {
        tracing::info!(name = %device.name, media_url, "playback_started");
    }

    fn on_playback_error(&self, message: &str) {
        tracing::warn!(message, "playback_error");
    }
}

/// Forwards every event into an unbounded channel.
///
/// Lets async callers consume events as a stream instead of callbacks.
/// Events are dropped once the receiver is gone.
#[derive(Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<DlnaEvent>,
}

impl ChannelListener {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DlnaEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: DlnaEvent) {
        let _ = self.tx.send(event);
    }
}

impl DlnaListener for ChannelListener {
    fn on_device_found(&self, device: &Device) {
        self.forward(DlnaEvent::DeviceFound {
            device: device.clone(),
        });
    }

    fn on_device_removed(&self, device: &Device) {
        self.forward(DlnaEvent::DeviceRemoved {
            device: device.clone(),
        });
    }

    fn on_playback_started(&self, device: &Device, media_url: &str) {
        self.forward(DlnaEvent::PlaybackStarted {
            device: device.clone(),
            media_url: media_url.to_string(),
        });
    }

    fn on_playback_error(&self, message: &str) {
        self.forward(DlnaEvent::PlaybackError {
            message: message.to_string(),
        });
    }
}
