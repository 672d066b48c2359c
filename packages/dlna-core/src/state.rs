//! Library configuration.
//!
//! [`Config`] holds every tunable of the discovery and control paths. All
//! fields have defaults matching common renderer behavior, so an empty YAML
//! document (or `Config::default()`) yields a working setup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol_constants::AV_TRANSPORT_SEARCH_TARGET;

/// Configuration for discovery, description fetching and playback control.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    // Discovery
    /// SSDP search target (`ST` header).
    pub search_target: String,

    /// Maximum response delay requested from devices (`MX` header, seconds).
    pub mx: u8,

    /// Wall-clock length of one discovery round (milliseconds).
    pub discovery_window_ms: u64,

    /// Per-call receive timeout inside a discovery round (milliseconds).
    ///
    /// Bounds how long a `stop()` may go unnoticed by a blocked receive.
    pub recv_timeout_ms: u64,

    /// Size of the datagram receive buffer (bytes).
    pub recv_buffer_size: usize,

    // HTTP
    /// Connect timeout for description GETs and SOAP POSTs (milliseconds).
    pub http_connect_timeout_ms: u64,

    /// Read timeout for description GETs and SOAP POSTs (milliseconds).
    pub http_read_timeout_ms: u64,

    // Picker
    /// Delay between starting discovery and presenting the device picker (milliseconds).
    pub picker_delay_ms: u64,

    /// Delay before the picker flow is re-run after a refresh request (milliseconds).
    pub picker_refresh_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_target: AV_TRANSPORT_SEARCH_TARGET.to_string(),
            mx: 3,
            discovery_window_ms: 5000,
            recv_timeout_ms: 500,
            recv_buffer_size: 8192,
            http_connect_timeout_ms: 5000,
            http_read_timeout_ms: 5000,
            picker_delay_ms: 3000,
            picker_refresh_delay_ms: 1000,
        }
    }
}

impl Config {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.search_target.trim().is_empty() {
            return Err("search_target must not be empty".to_string());
        }
        if self.discovery_window_ms == 0 {
            return Err("discovery_window_ms must be >= 1".to_string());
        }
        if self.recv_timeout_ms == 0 {
            return Err("recv_timeout_ms must be >= 1".to_string());
        }
        if self.recv_buffer_size == 0 {
            return Err("recv_buffer_size must be >= 1".to_string());
        }
        if self.http_connect_timeout_ms == 0 || self.http_read_timeout_ms == 0 {
            return Err("HTTP timeouts must be >= 1".to_string());
        }
        Ok(())
    }

    pub fn discovery_window(&self) -> Duration {
        Duration::from_millis(self.discovery_window_ms)
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }

    pub fn http_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.http_connect_timeout_ms)
    }

    pub fn http_read_timeout(&self) -> Duration {
        Duration::from_millis(self.http_read_timeout_ms)
    }

    pub fn picker_delay(&self) -> Duration {
        Duration::from_millis(self.picker_delay_ms)
    }

    pub fn picker_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.picker_refresh_delay_ms)
    }
}
