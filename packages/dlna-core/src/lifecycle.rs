//! Service lifecycle state.

use parking_lot::Mutex;

use crate::error::{DlnaError, DlnaResult};

/// Where a service is in its lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Created,
    Running,
    Destroyed,
}

/// Guards lifecycle transitions.
#[derive(Debug)]
pub struct Lifecycle {
    state: Mutex<ServiceState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            state: Mutex::new(ServiceState::Created),
        }
    }
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ServiceState {
        *self.state.lock()
    }

    /// Moves to `Running`. Returns `Ok(false)` if already running.
    pub fn start(&self) -> DlnaResult<bool> {
        let mut state = self.state.lock();
        match *state {
            ServiceState::Created => {
                *state = ServiceState::Running;
                Ok(true)
            }
            ServiceState::Running => Ok(false),
            ServiceState::Destroyed => Err(DlnaError::Unavailable),
        }
    }

    /// Moves to `Destroyed`. Returns `true` only for the first call.
    pub fn destroy(&self) -> bool {
        let mut state = self.state.lock();
        let first = *state != ServiceState::Destroyed;
        *state = ServiceState::Destroyed;
        first
    }

    /// Errors unless the service is running.
    pub fn ensure_running(&self) -> DlnaResult<()> {
        match self.state() {
            ServiceState::Running => Ok(()),
            ServiceState::Created => Err(DlnaError::NotStarted),
            ServiceState::Destroyed => Err(DlnaError::Unavailable),
        }
    }
}
