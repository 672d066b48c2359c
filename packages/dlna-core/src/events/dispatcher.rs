//! Single-listener event delivery on a designated context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::emitter::{deliver, DlnaListener};
use super::DlnaEvent;

type ListenerSlot = Arc<RwLock<Option<Arc<dyn DlnaListener>>>>;

/// Delivers events to at most one listener.
///
/// Producers call [`emit`](Self::emit) from any task; a single dispatch task
/// spawned on the designated runtime invokes the listener, so callbacks never
/// run concurrently with each other. Registering a listener replaces the
/// previous one. After [`shutdown`](Self::shutdown) nothing is delivered,
/// including events that were queued before it.
pub struct EventDispatcher {
    listener: ListenerSlot,
    alive: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<DlnaEvent>,
}

impl EventDispatcher {
    /// Creates a dispatcher whose callbacks run on `context`.
    pub fn new(context: &Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let listener: ListenerSlot = Arc::new(RwLock::new(None));
        let alive = Arc::new(AtomicBool::new(true));

        context.spawn(dispatch_loop(rx, Arc::clone(&listener), Arc::clone(&alive)));

        Self {
            listener,
            alive,
            tx,
        }
    }

    /// Registers `listener`, replacing any previous one.
    pub fn set_listener(&self, listener: Arc<dyn DlnaListener>) {
        if self.listener.write().replace(listener).is_some() {
            log::debug!("[Dispatcher] Replaced existing listener");
        }
    }

    pub fn has_listener(&self) -> bool {
        self.listener.read().is_some()
    }

    /// Queues `event` for delivery. Returns `false` after shutdown.
    pub fn emit(&self, event: DlnaEvent) -> bool {
        if !self.is_alive() {
            log::trace!("[Dispatcher] Dropped {} after shutdown", event.kind());
            return false;
        }
        self.tx.send(event).is_ok()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Stops delivery permanently and releases the listener.
    pub fn shutdown(&self) {
        // Flipped under the write lock so the dispatch loop never pairs a
        // live flag with a listener that shutdown is about to drop.
        let mut slot = self.listener.write();
        if self.alive.swap(false, Ordering::AcqRel) {
            slot.take();
            log::debug!("[Dispatcher] Shut down");
        }
    }
}

async fn dispatch_loop(
    mut rx: mpsc::UnboundedReceiver<DlnaEvent>,
    listener: ListenerSlot,
    alive: Arc<AtomicBool>,
) {
    while let Some(event) = rx.recv().await {
        let current = {
            let slot = listener.read();
            if !alive.load(Ordering::Acquire) {
                break;
            }
            slot.clone()
        };
        match current {
            Some(listener) => deliver(listener.as_ref(), &event),
            None => log::trace!("[Dispatcher] No listener for {}", event.kind()),
        }
    }
    log::trace!("[Dispatcher] Dispatch loop exited");
}
