//! Discovery and playback events.
//!
//! This module provides:
//! - [`DlnaEvent`], the four event kinds delivered to callers
//! - [`DlnaListener`] and its stock implementations
//! - [`EventDispatcher`], which delivers events on a designated context

mod dispatcher;
mod emitter;

pub use dispatcher::EventDispatcher;
pub use emitter::{deliver, ChannelListener, DlnaListener, LoggingListener, NoopListener};

use serde::Serialize;

use crate::upnp::Device;

/// Events delivered to the registered listener.
///
/// Each event carries everything needed to act on it, so listeners do not
/// depend on the relative order of events from concurrent operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DlnaEvent {
    /// A new renderer was added to the registry.
    DeviceFound { device: Device },

    /// A renderer was dropped from the registry.
    DeviceRemoved { device: Device },

    /// SetAVTransportURI and Play both succeeded.
    PlaybackStarted {
        device: Device,
        #[serde(rename = "mediaUrl")]
        media_url: String,
    },

    /// A playback request failed.
    PlaybackError { message: String },
}

impl DlnaEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DeviceFound { .. } => "deviceFound",
            Self::DeviceRemoved { .. } => "deviceRemoved",
            Self::PlaybackStarted { .. } => "playbackStarted",
            Self::PlaybackError { .. } => "playbackError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = DlnaEvent::PlaybackError {
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&event).expect("json");
        assert_eq!(json["type"], "playbackError");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn device_found_carries_camel_case_device() {
        let event = DlnaEvent::DeviceFound {
            device: Device {
                name: "TV".to_string(),
                manufacturer: None,
                location: "http://h/d.xml".to_string(),
                control_url: Some("http://h/ctl".to_string()),
                udn: None,
            },
        };
        let json = serde_json::to_value(&event).expect("json");
        assert_eq!(json["type"], "deviceFound");
        assert_eq!(json["device"]["controlUrl"], "http://h/ctl");
        assert_eq!(event.kind(), "deviceFound");
    }
}
