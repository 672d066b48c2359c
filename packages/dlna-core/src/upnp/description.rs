//! Device description fetching and field extraction.
//!
//! Only four fields of the description document are consumed:
//! `friendlyName`, `manufacturer`, `UDN` and `controlURL`. Extraction is a
//! first-match substring search (see [`extract_tag`]), not a document parse.
//!
//! Note: when a description lists several services, the first `controlURL`
//! in document order wins even if it belongs to RenderingControl or
//! ConnectionManager rather than AVTransport. Renderers that list
//! AVTransport first (the common layout) are unaffected.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::http::{HttpError, HttpTransport};
use super::traits::DescriptionSource;
use super::types::Device;
use super::utils::{extract_tag, resolve_control_url};
use crate::protocol_constants::UNKNOWN_DEVICE_NAME;

/// Errors that drop a discovery candidate.
#[derive(Debug, Error)]
pub enum DescriptionError {
    /// GET of the description document failed.
    #[error("failed to fetch device description: {0}")]
    Http(#[from] HttpError),

    /// Description server answered with a non-success status.
    #[error("device description returned HTTP {0}")]
    HttpStatus(u16),

    /// The SSDP `LOCATION` is not an absolute URL.
    #[error("invalid description location: {0}")]
    InvalidLocation(String),

    /// `controlURL` could not be resolved against the location.
    #[error("unresolvable control URL: {0}")]
    InvalidControlUrl(String),
}

/// Convenient Result alias for description operations.
pub type DescriptionResult<T> = Result<T, DescriptionError>;

/// Builds a [`Device`] from a description document fetched from `location`.
///
/// Missing `friendlyName` yields the placeholder name; missing or empty
/// `controlURL` yields a device without a control URL. Relative control URLs
/// are resolved against `location`.
pub fn parse_device_description(xml: &str, location: &str) -> DescriptionResult<Device> {
    if reqwest::Url::parse(location).is_err() {
        return Err(DescriptionError::InvalidLocation(location.to_string()));
    }

    // An empty controlURL is absent, not a reference to the location's directory.
    let control_url = match extract_tag(xml, "controlURL").filter(|c| !c.is_empty()) {
        Some(raw) => Some(
            resolve_control_url(location, &raw)
                .ok_or(DescriptionError::InvalidControlUrl(raw))?,
        ),
        None => None,
    };

    let name = extract_tag(xml, "friendlyName")
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNKNOWN_DEVICE_NAME.to_string());

    Ok(Device {
        name,
        manufacturer: extract_tag(xml, "manufacturer").filter(|m| !m.is_empty()),
        location: location.to_string(),
        control_url,
        udn: extract_tag(xml, "UDN").filter(|u| !u.is_empty()),
    })
}

/// Fetches description documents over an [`HttpTransport`].
#[derive(Clone)]
pub struct DescriptionFetcher {
    transport: Arc<dyn HttpTransport>,
}

impl DescriptionFetcher {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DescriptionSource for DescriptionFetcher {
    async fn fetch(&self, location: &str) -> DescriptionResult<Device> {
        log::debug!("[Description] GET {}", location);

        let reply = self.transport.get(location).await?;
        if !reply.is_success() {
            return Err(DescriptionError::HttpStatus(reply.status));
        }

        let device = parse_device_description(&reply.body, location)?;
        log::debug!(
            "[Description] Parsed {} (udn={:?}, control={:?})",
            device.name,
            device.udn,
            device.control_url
        );
        Ok(device)
    }
}
