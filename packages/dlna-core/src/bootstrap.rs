//! Service composition root and the public service surface.
//!
//! [`DlnaService`] wires discovery, the registry, playback and event
//! delivery over injected seams (HTTP transport, SSDP socket factory,
//! multicast lock, worker pool, event context). [`bootstrap_service`] builds
//! one with the production implementations.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::error::{DlnaError, DlnaResult};
use crate::events::{DlnaListener, EventDispatcher};
use crate::lifecycle::{Lifecycle, ServiceState};
use crate::multicast::{MulticastLock, ProcessMulticastLock};
use crate::runtime::{TaskSpawner, WorkerPool};
use crate::services::{
    DevicePicker, DeviceRegistry, DiscoveryDeps, DiscoveryService, PickerChoice, PlaybackService,
};
use crate::state::Config;
use crate::upnp::discovery::{SsdpSocketFactory, UdpSocketFactory};
use crate::upnp::{AvTransportClient, DescriptionFetcher, Device, HttpTransport, ReqwestTransport};

/// Injected dependencies of a [`DlnaService`].
pub struct ServiceDeps {
    pub config: Config,
    pub http: Arc<dyn HttpTransport>,
    pub sockets: Arc<dyn SsdpSocketFactory>,
    pub multicast: Arc<dyn MulticastLock>,
    pub spawner: Arc<dyn TaskSpawner>,
    /// Runtime on which listener callbacks run.
    pub event_context: Handle,
}

/// Discovers renderers and plays media on them.
///
/// Every method is safe to call after [`destroy`](Self::destroy); they
/// either do nothing or return [`DlnaError::Unavailable`], and no event
/// reaches the listener afterwards.
pub struct DlnaService {
    config: Arc<Config>,
    lifecycle: Lifecycle,
    dispatcher: Arc<EventDispatcher>,
    discovery: Arc<DiscoveryService>,
    playback: Arc<PlaybackService>,
    spawner: Arc<dyn TaskSpawner>,
    multicast: Arc<dyn MulticastLock>,
    shutdown: CancellationToken,
}

impl DlnaService {
    pub fn new(deps: ServiceDeps) -> Self {
        let config = Arc::new(deps.config);
        let dispatcher = Arc::new(EventDispatcher::new(&deps.event_context));
        let shutdown = CancellationToken::new();

        let discovery = Arc::new(DiscoveryService::new(DiscoveryDeps {
            config: Arc::clone(&config),
            sockets: deps.sockets,
            descriptions: Arc::new(DescriptionFetcher::new(Arc::clone(&deps.http))),
            registry: Arc::new(DeviceRegistry::new()),
            dispatcher: Arc::clone(&dispatcher),
            spawner: Arc::clone(&deps.spawner),
            multicast: Arc::clone(&deps.multicast),
            shutdown: shutdown.clone(),
        }));

        let playback = Arc::new(PlaybackService::new(
            Arc::new(AvTransportClient::new(deps.http)),
            Arc::clone(&dispatcher),
        ));

        Self {
            config,
            lifecycle: Lifecycle::new(),
            dispatcher,
            discovery,
            playback,
            spawner: deps.spawner,
            multicast: deps.multicast,
            shutdown,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> ServiceState {
        self.lifecycle.state()
    }

    /// Validates configuration and enables the entry points.
    ///
    /// Returns `Ok(false)` if already started.
    pub fn start(&self) -> DlnaResult<bool> {
        self.config.validate().map_err(DlnaError::Configuration)?;
        let started = self.lifecycle.start()?;
        if started {
            log::info!("[DlnaService] Started");
        }
        Ok(started)
    }

    /// Registers the event listener, replacing any previous one.
    pub fn set_listener(&self, listener: Arc<dyn DlnaListener>) -> DlnaResult<()> {
        if self.lifecycle.state() == ServiceState::Destroyed {
            return Err(DlnaError::Unavailable);
        }
        self.dispatcher.set_listener(listener);
        Ok(())
    }

    /// Starts a discovery session. `Ok(false)` if one is already active.
    pub fn start_discovery(&self) -> DlnaResult<bool> {
        self.lifecycle.ensure_running()?;
        self.discovery.start()
    }

    /// Stops the active discovery session. Returns whether one was active.
    pub fn stop_discovery(&self) -> bool {
        self.discovery.stop()
    }

    pub fn is_discovering(&self) -> bool {
        self.discovery.is_active()
    }

    /// Snapshot of discovered devices in discovery order.
    pub fn devices(&self) -> Vec<Device> {
        self.discovery.registry().snapshot()
    }

    /// Selects `device` and starts playing `media_url` on it in the background.
    ///
    /// Precondition failures are reported both as a `PlaybackError` event and
    /// as the returned error. The SetAVTransportURI/Play outcome arrives as
    /// exactly one event.
    pub fn play_on_device(&self, device: Device, media_url: &str) -> DlnaResult<()> {
        self.lifecycle.ensure_running()?;
        let target = self.playback.select(device, media_url)?;

        let playback = Arc::clone(&self.playback);
        let accepted = self.spawner.spawn(async move {
            let _ = playback.execute(target).await;
        });
        if accepted {
            Ok(())
        } else {
            Err(DlnaError::WorkerPoolClosed)
        }
    }

    /// Sends a best-effort Stop to the selected device in the background.
    ///
    /// Returns `Ok(false)` when nothing is selected or it has no control URL.
    pub fn stop_playback(&self) -> DlnaResult<bool> {
        self.lifecycle.ensure_running()?;
        let Some(target) = self.playback.current_target() else {
            return Ok(false);
        };
        if target.device.control_url.is_none() {
            return Ok(false);
        }
        let playback = Arc::clone(&self.playback);
        Ok(self.spawner.spawn(async move {
            playback.stop_target(&target).await;
        }))
    }

    pub fn is_device_selected(&self) -> bool {
        self.playback.current_target().is_some()
    }

    pub fn selected_device(&self) -> Option<Device> {
        self.playback.selected_device()
    }

    /// Runs the picker flow until the picker selects a device or cancels.
    ///
    /// Each pass clears the registry (emitting `DeviceRemoved`), restarts
    /// discovery, waits `picker_delay_ms` and presents the snapshot. A
    /// refresh waits `picker_refresh_delay_ms` before the next pass. The
    /// selected device is handed to [`play_on_device`](Self::play_on_device).
    pub async fn show_device_picker(
        &self,
        picker: &dyn DevicePicker,
        media_url: &str,
    ) -> DlnaResult<Option<Device>> {
        loop {
            self.lifecycle.ensure_running()?;
            self.discovery.stop();
            self.discovery.reset_registry();
            self.discovery.start()?;

            tokio::time::sleep(self.config.picker_delay()).await;
            self.lifecycle.ensure_running()?;

            let devices = self.devices();
            log::debug!("[DlnaService] Presenting {} device(s)", devices.len());

            match picker.pick(&devices).await {
                PickerChoice::Select(device) => {
                    log::info!("[DlnaService] Picked {}", device);
                    self.play_on_device(device.clone(), media_url)?;
                    return Ok(Some(device));
                }
                PickerChoice::Refresh => {
                    log::debug!("[DlnaService] Picker refresh requested");
                    tokio::time::sleep(self.config.picker_refresh_delay()).await;
                }
                PickerChoice::Cancel => {
                    log::debug!("[DlnaService] Picker cancelled");
                    return Ok(None);
                }
            }
        }
    }

    /// Tears the service down. Idempotent.
    ///
    /// Silences the listener, stops discovery, sends a best-effort Stop to the
    /// selected device, shuts the worker pool down and releases the
    /// multicast lock.
    pub fn destroy(&self) {
        if !self.lifecycle.destroy() {
            return;
        }
        log::info!("[DlnaService] Destroying");

        self.dispatcher.shutdown();
        self.discovery.stop();
        self.shutdown.cancel();

        if let Some(target) = self.playback.clear_target() {
            let playback = Arc::clone(&self.playback);
            self.spawner.spawn(async move {
                playback.stop_target(&target).await;
            });
        }

        self.spawner.shutdown();
        self.multicast.release();
        self.discovery.registry().clear();
    }
}

impl Drop for DlnaService {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Builds a [`DlnaService`] with the production seams on the current runtime.
///
/// # Errors
///
/// Returns [`DlnaError::Configuration`] if `config` is invalid or the HTTP
/// client cannot be built.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime context.
pub fn bootstrap_service(config: Config) -> DlnaResult<DlnaService> {
    config.validate().map_err(DlnaError::Configuration)?;

    let http = ReqwestTransport::new(&config)
        .map_err(|e| DlnaError::Configuration(format!("HTTP client: {e}")))?;

    Ok(DlnaService::new(ServiceDeps {
        config,
        http: Arc::new(http),
        sockets: Arc::new(UdpSocketFactory::new()),
        multicast: Arc::new(ProcessMulticastLock::new()),
        spawner: Arc::new(WorkerPool::current()),
        event_context: Handle::current(),
    }))
}
