//! Multicast capability handle.
//!
//! Some platforms require an explicit, system-wide grant before a process
//! receives multicast datagrams. Discovery holds the grant for the duration
//! of a session and must release it on every exit path.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// The platform refused or failed to grant multicast reception.
#[derive(Debug, Error)]
#[error("multicast lock unavailable: {0}")]
pub struct MulticastLockError(pub String);

/// A re-entrant multicast grant.
///
/// `acquire` while held and `release` while not held are no-ops.
pub trait MulticastLock: Send + Sync {
    fn acquire(&self) -> Result<(), MulticastLockError>;
    fn release(&self);
    fn is_held(&self) -> bool;
}

/// In-process lock used on platforms with no multicast grant API.
///
/// Handles created with [`ProcessMulticastLock::sharing`] count against the
/// same holder total, so callers can observe that every handle was released.
#[derive(Debug, Default)]
pub struct ProcessMulticastLock {
    held: AtomicBool,
    holders: Arc<AtomicUsize>,
}

impl ProcessMulticastLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates another handle sharing this handle's holder count.
    #[must_use]
    pub fn sharing(&self) -> Self {
        Self {
            held: AtomicBool::new(false),
            holders: Arc::clone(&self.holders),
        }
    }

    /// Number of handles currently holding the grant.
    pub fn holders(&self) -> usize {
        self.holders.load(Ordering::Acquire)
    }
}

impl MulticastLock for ProcessMulticastLock {
    fn acquire(&self) -> Result<(), MulticastLockError> {
        if !self.held.swap(true, Ordering::AcqRel) {
            self.holders.fetch_add(1, Ordering::AcqRel);
            log::debug!("[Multicast] Lock acquired");
        }
        Ok(())
    }

    fn release(&self) {
        if self.held.swap(false, Ordering::AcqRel) {
            self.holders.fetch_sub(1, Ordering::AcqRel);
            log::debug!("[Multicast] Lock released");
        }
    }

    fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}
