//! Domain types for discovered renderers.

use std::fmt;

use serde::Serialize;

use crate::protocol_constants::UNKNOWN_MANUFACTURER;

/// A discovered media renderer, built from its device description document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Friendly name (falls back to a placeholder when the document has none).
    pub name: String,
    /// Manufacturer label, if the document has one.
    pub manufacturer: Option<String>,
    /// Absolute URL of the device description document.
    pub location: String,
    /// Absolute URL of the AVTransport control endpoint.
    ///
    /// `None` means the renderer cannot be driven.
    pub control_url: Option<String>,
    /// Unique Device Name (e.g. `uuid:...`).
    pub udn: Option<String>,
}

impl Device {
    /// Returns the UDN if it is present and non-empty.
    ///
    /// Only devices with a dedup key take part in registry deduplication.
    #[must_use]
    pub fn dedup_key(&self) -> Option<&str> {
        self.udn.as_deref().filter(|udn| !udn.is_empty())
    }

    /// Returns true if the device advertised an AVTransport control URL.
    #[must_use]
    pub fn is_controllable(&self) -> bool {
        self.control_url.is_some()
    }

    /// Manufacturer for display, `"Unknown"` when absent.
    #[must_use]
    pub fn manufacturer_label(&self) -> &str {
        self.manufacturer.as_deref().unwrap_or(UNKNOWN_MANUFACTURER)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
