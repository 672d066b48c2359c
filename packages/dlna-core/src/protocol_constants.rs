//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by external specifications (SSDP, UPnP AVTransport,
//! SOAP 1.1) and changing them would break interoperability with renderers.
//! Tunable values (windows, timeouts, delays) live in [`crate::state::Config`].

use std::net::{Ipv4Addr, SocketAddrV4};

// ─────────────────────────────────────────────────────────────────────────────
// SSDP (Simple Service Discovery Protocol)
// ─────────────────────────────────────────────────────────────────────────────

/// Standard SSDP multicast group and port (protocol specification).
pub const SSDP_MULTICAST_ADDR: SocketAddrV4 =
    SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1900);

/// Multicast TTL recommended by UPnP 1.0 for SSDP.
pub const SSDP_MULTICAST_TTL: u32 = 4;

/// Search target for media renderers exposing an AVTransport service.
pub const AV_TRANSPORT_SEARCH_TARGET: &str = "urn:schemas-upnp-org:service:AVTransport:1";

// ─────────────────────────────────────────────────────────────────────────────
// UPnP AVTransport / SOAP
// ─────────────────────────────────────────────────────────────────────────────

/// AVTransport service URN used as the SOAP action namespace.
pub const AV_TRANSPORT_URN: &str = "urn:schemas-upnp-org:service:AVTransport:1";

/// AVTransport instance addressed by every action. Renderers exposing several
/// transport instances are not supported.
pub const AV_TRANSPORT_INSTANCE_ID: &str = "0";

/// `Content-Type` header sent with every SOAP request.
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SOAP 1.1 encoding style.
pub const SOAP_ENCODING_STYLE: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// The only HTTP status treated as a successful control action.
pub const SOAP_SUCCESS_STATUS: u16 = 200;

// ─────────────────────────────────────────────────────────────────────────────
// Device description
// ─────────────────────────────────────────────────────────────────────────────

/// Display name used when a description document has no `friendlyName`.
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown Device";

/// Display label used when a device has no manufacturer.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";
