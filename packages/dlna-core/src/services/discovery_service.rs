//! Discovery sessions: SSDP rounds, description fan-out and registry updates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::{DlnaError, DlnaResult};
use crate::events::{DlnaEvent, EventDispatcher};
use crate::multicast::MulticastLock;
use crate::runtime::TaskSpawner;
use crate::state::Config;
use crate::upnp::discovery::{run_search_round, SsdpSocketFactory};
use crate::upnp::{DescriptionSource, Device};

use super::registry::DeviceRegistry;

struct ActiveSession {
    id: u64,
    cancel: CancellationToken,
}

/// Dependencies of [`DiscoveryService`].
pub struct DiscoveryDeps {
    pub config: Arc<Config>,
    pub sockets: Arc<dyn SsdpSocketFactory>,
    pub descriptions: Arc<dyn DescriptionSource>,
    pub registry: Arc<DeviceRegistry>,
    pub dispatcher: Arc<EventDispatcher>,
    pub spawner: Arc<dyn TaskSpawner>,
    pub multicast: Arc<dyn MulticastLock>,
    /// Parent of every session token; cancelling it ends all sessions.
    pub shutdown: CancellationToken,
}

/// Owns the discovery on/off state.
///
/// At most one session is active. A session runs exactly one search round
/// on the worker pool and holds the multicast lock until the round ends or
/// [`stop`](Self::stop) is called, whichever comes first.
pub struct DiscoveryService {
    deps: DiscoveryDeps,
    session: Mutex<Option<ActiveSession>>,
    next_session_id: AtomicU64,
}

impl DiscoveryService {
    pub fn new(deps: DiscoveryDeps) -> Self {
        Self {
            deps,
            session: Mutex::new(None),
            next_session_id: AtomicU64::new(1),
        }
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.deps.registry
    }

    /// Starts a session unless one is active.
    ///
    /// Returns `Ok(false)` when a session was already running.
    pub fn start(self: &Arc<Self>) -> DlnaResult<bool> {
        if self.deps.shutdown.is_cancelled() {
            return Err(DlnaError::Unavailable);
        }

        let mut session = self.session.lock();
        if session.is_some() {
            log::debug!("[Discovery] Already active, start ignored");
            return Ok(false);
        }

        if let Err(e) = self.deps.multicast.acquire() {
            log::warn!("[Discovery] Proceeding without multicast lock: {}", e);
        }

        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let cancel = self.deps.shutdown.child_token();
        let this = Arc::clone(self);
        let token = cancel.clone();

        if !self.deps.spawner.spawn(async move { this.run_session(id, token).await }) {
            self.deps.multicast.release();
            return Err(DlnaError::WorkerPoolClosed);
        }

        *session = Some(ActiveSession { id, cancel });
        log::info!("[Discovery] Session {} started", id);
        Ok(true)
    }

    /// Ends the active session, if any. Returns whether one was active.
    pub fn stop(&self) -> bool {
        let Some(session) = self.session.lock().take() else {
            return false;
        };
        session.cancel.cancel();
        self.deps.multicast.release();
        log::info!("[Discovery] Session {} stopped", session.id);
        true
    }

    pub fn is_active(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Empties the registry, emitting `DeviceRemoved` for each entry.
    pub fn reset_registry(&self) -> usize {
        let removed = self.deps.registry.clear();
        for device in &removed {
            self.deps.dispatcher.emit(DlnaEvent::DeviceRemoved {
                device: device.clone(),
            });
        }
        removed.len()
    }

    async fn run_session(self: Arc<Self>, id: u64, cancel: CancellationToken) {
        match self.deps.sockets.open() {
            Ok(socket) => {
                let result = run_search_round(
                    socket.as_ref(),
                    &self.deps.config,
                    &cancel,
                    |location| self.submit_fetch(location),
                )
                .await;
                if let Err(e) = result {
                    log::warn!("[Discovery] Round aborted: {}", e);
                }
            }
            Err(e) => log::warn!("[Discovery] Could not open SSDP socket: {}", e),
        }
        self.finish_session(id);
    }

    /// Clears the session slot if `id` still owns it.
    fn finish_session(&self, id: u64) {
        let mut session = self.session.lock();
        if session.as_ref().is_some_and(|s| s.id == id) {
            *session = None;
            self.deps.multicast.release();
            log::debug!("[Discovery] Session {} finished", id);
        }
    }

    fn submit_fetch(self: &Arc<Self>, location: String) {
        let this = Arc::clone(self);
        let accepted = self.deps.spawner.spawn(async move {
            match this.deps.descriptions.fetch(&location).await {
                Ok(device) => this.accept(device),
                Err(e) => log::warn!("[Discovery] Dropped {}: {}", location, e),
            }
        });
        if !accepted {
            log::debug!("[Discovery] Worker pool closed, fetch skipped");
        }
    }

    fn accept(&self, device: Device) {
        if !self.deps.dispatcher.is_alive() {
            log::trace!("[Discovery] Ignoring {} after teardown", device.name);
            return;
        }
        if self.deps.registry.try_insert(device.clone()) {
            self.deps.dispatcher.emit(DlnaEvent::DeviceFound { device });
        }
    }
}
