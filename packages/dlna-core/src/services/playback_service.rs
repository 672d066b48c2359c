//! Playback orchestration against the selected renderer.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{DlnaError, DlnaResult};
use crate::events::{DlnaEvent, EventDispatcher};
use crate::upnp::{AvTransportControl, Device};

/// The renderer and media URL of the most recent playback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlTarget {
    pub device: Device,
    pub media_url: String,
}

impl ControlTarget {
    fn control_url(&self) -> Option<&str> {
        self.device.control_url.as_deref()
    }
}

/// Drives SetAVTransportURI then Play and reports one outcome event.
///
/// Only one [`ControlTarget`] is tracked. A new selection replaces the
/// previous one even while the previous request is still in flight; that
/// earlier request still reports its own outcome, but `stop_current` and
/// `selected_device` only see the latest selection.
pub struct PlaybackService {
    control: Arc<dyn AvTransportControl>,
    dispatcher: Arc<EventDispatcher>,
    target: Mutex<Option<ControlTarget>>,
}

impl PlaybackService {
    pub fn new(control: Arc<dyn AvTransportControl>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            control,
            dispatcher,
            target: Mutex::new(None),
        }
    }

    /// Records the selection, then checks preconditions.
    ///
    /// The selection is kept even when a precondition fails, so
    /// `selected_device` reflects the caller's explicit choice. On failure one
    /// `PlaybackError` event is emitted and no request is made; the error is
    /// also returned. The media URL is kept exactly as given.
    pub fn select(&self, device: Device, media_url: &str) -> DlnaResult<ControlTarget> {
        let target = ControlTarget {
            device,
            media_url: media_url.to_string(),
        };
        if let Some(previous) = self.target.lock().replace(target.clone()) {
            if previous.device != target.device {
                log::debug!(
                    "[Playback] Selection moved from {} to {}",
                    previous.device.name,
                    target.device.name
                );
            }
        }

        let precondition = if target.control_url().is_none() {
            Some(DlnaError::MissingControlUrl(target.device.name.clone()))
        } else if media_url.trim().is_empty() {
            Some(DlnaError::MissingMediaUrl)
        } else {
            None
        };
        if let Some(err) = precondition {
            log::warn!(
                "[Playback] Rejected request for {}: {}",
                target.device.name,
                err
            );
            self.report_error(err.to_string());
            return Err(err);
        }

        Ok(target)
    }

    /// Runs the control sequence for `target` and emits its outcome.
    pub async fn execute(&self, target: ControlTarget) -> DlnaResult<()> {
        let name = &target.device.name;
        let Some(control_url) = target.control_url() else {
            let err = DlnaError::MissingControlUrl(name.clone());
            self.report_error(err.to_string());
            return Err(err);
        };

        log::info!("[Playback] {} <- {}", name, target.media_url);

        if let Err(e) = self.control.set_uri(control_url, &target.media_url).await {
            log::warn!("[Playback] SetAVTransportURI failed on {}: {}", name, e);
            self.report_error(format!("Failed to set media URL on {name}: {e}"));
            return Err(e.into());
        }

        if let Err(e) = self.control.play(control_url).await {
            log::warn!("[Playback] Play failed on {}: {}", name, e);
            self.report_error(format!("Failed to start playback on {name}: {e}"));
            return Err(e.into());
        }

        log::info!("[Playback] Started on {}", name);
        self.dispatcher.emit(DlnaEvent::PlaybackStarted {
            device: target.device.clone(),
            media_url: target.media_url.clone(),
        });
        Ok(())
    }

    /// Sends a best-effort Stop to the current target, if it has a control URL.
    pub async fn stop_current(&self) -> bool {
        match self.current_target() {
            Some(target) => self.stop_target(&target).await,
            None => false,
        }
    }

    /// Sends a best-effort Stop to `target`. Returns whether one was sent.
    pub async fn stop_target(&self, target: &ControlTarget) -> bool {
        match target.control_url() {
            Some(url) => {
                log::info!("[Playback] Stopping {}", target.device.name);
                self.control.stop(url).await;
                true
            }
            None => false,
        }
    }

    pub fn selected_device(&self) -> Option<Device> {
        self.target.lock().as_ref().map(|t| t.device.clone())
    }

    pub fn current_target(&self) -> Option<ControlTarget> {
        self.target.lock().clone()
    }

    pub fn clear_target(&self) -> Option<ControlTarget> {
        self.target.lock().take()
    }

    fn report_error(&self, message: String) {
        self.dispatcher.emit(DlnaEvent::PlaybackError { message });
    }
}
