//! Centralized error types for the DLNA core library.
//!
//! Layer errors (`DiscoveryError`, `DescriptionError`, `SoapError`, ...) live
//! next to the code that produces them; [`DlnaError`] is what the service
//! surface returns to callers.

use serde::Serialize;
use thiserror::Error;

use crate::multicast::MulticastLockError;
use crate::upnp::description::DescriptionError;
use crate::upnp::discovery::DiscoveryError;
use crate::upnp::http::HttpError;
use crate::upnp::soap::SoapError;

pub use crate::upnp::description::DescriptionResult;
pub use crate::upnp::discovery::DiscoveryResult;
pub use crate::upnp::soap::SoapResult;

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    /// Returns a stable machine-readable error code.
    fn code(&self) -> &'static str;
}

impl ErrorCode for HttpError {
    fn code(&self) -> &'static str {
        if self.is_timeout() {
            "http_timeout"
        } else {
            "http_request_failed"
        }
    }
}

impl ErrorCode for DiscoveryError {
    fn code(&self) -> &'static str {
        match self {
            Self::SocketBind(_) => "socket_bind_failed",
            Self::SendSearch(_) => "ssdp_send_failed",
        }
    }
}

impl ErrorCode for DescriptionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(e) => e.code(),
            Self::HttpStatus(_) => "description_http_status",
            Self::InvalidLocation(_) => "invalid_location",
            Self::InvalidControlUrl(_) => "invalid_control_url",
        }
    }
}

impl ErrorCode for SoapError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(e) => e.code(),
            Self::HttpStatus(_, _) => "http_error_status",
        }
    }
}

impl ErrorCode for MulticastLockError {
    fn code(&self) -> &'static str {
        "multicast_lock_unavailable"
    }
}

/// Errors returned by the service surface.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum DlnaError {
    /// An entry point was used before `start()`.
    #[error("Service not started")]
    NotStarted,

    /// The service has been destroyed.
    #[error("Service unavailable")]
    Unavailable,

    /// The selected device has no AVTransport control URL.
    #[error("Device '{0}' has no AVTransport control URL")]
    MissingControlUrl(String),

    /// No media URL was supplied.
    #[error("No media URL to play")]
    MissingMediaUrl,

    /// The worker pool refused new work.
    #[error("Worker pool is shut down")]
    WorkerPoolClosed,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A control action failed.
    #[error("SOAP request failed: {0}")]
    Soap(String),
}

impl ErrorCode for DlnaError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Unavailable => "unavailable",
            Self::MissingControlUrl(_) => "missing_control_url",
            Self::MissingMediaUrl => "missing_media_url",
            Self::WorkerPoolClosed => "worker_pool_closed",
            Self::Configuration(_) => "configuration_error",
            Self::Soap(_) => "soap_error",
        }
    }
}

impl From<SoapError> for DlnaError {
    fn from(err: SoapError) -> Self {
        Self::Soap(err.to_string())
    }
}

/// Convenient Result alias for service operations.
pub type DlnaResult<T> = Result<T, DlnaError>;
