//! Shared test fixtures for device description documents.
//!
//! These constants are used by multiple test modules to avoid duplication.

/// Minimal renderer description with a relative AVTransport control URL.
pub const RENDERER_DESCRIPTION: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <specVersion><major>1</major><minor>0</minor></specVersion>
  <device>
    <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
    <friendlyName>Living Room TV</friendlyName>
    <manufacturer>Acme</manufacturer>
    <UDN>uuid:4d696e69-444c-164e-9d41-001ec0f1a2b3</UDN>
    <serviceList>
      <service>
        <serviceType>urn:schemas-upnp-org:service:AVTransport:1</serviceType>
        <serviceId>urn:upnp-org:serviceId:AVTransport</serviceId>
        <controlURL>/AVTransport/control</controlURL>
        <eventSubURL>/AVTransport/event</eventSubURL>
      </service>
    </serviceList>
  </device>
</root>"#;

/// Description without `friendlyName` or `controlURL`.
pub const BARE_DESCRIPTION: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <device>
    <UDN>uuid:bare-device</UDN>
  </device>
</root>"#;

/// Description whose first service block is RenderingControl, so the first
/// `controlURL` in document order is not the AVTransport one.
pub const MULTI_SERVICE_DESCRIPTION: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <device>
    <friendlyName>Bedroom Speaker</friendlyName>
    <UDN>uuid:multi-service</UDN>
    <serviceList>
      <service>
        <serviceType>urn:schemas-upnp-org:service:RenderingControl:1</serviceType>
        <controlURL>/RenderingControl/control</controlURL>
      </service>
      <service>
        <serviceType>urn:schemas-upnp-org:service:ConnectionManager:1</serviceType>
        <controlURL>/ConnectionManager/control</controlURL>
      </service>
      <service>
        <serviceType>urn:schemas-upnp-org:service:AVTransport:1</serviceType>
        <controlURL>/AVTransport/control</controlURL>
      </service>
    </serviceList>
  </device>
</root>"#;

/// SSDP search response advertising a description location.
pub fn ssdp_response(location: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age=1800\r\n\
         EXT:\r\n\
         Location: {location}\r\n\
         SERVER: Linux/4.9 UPnP/1.0 Renderer/1.0\r\n\
         ST: urn:schemas-upnp-org:service:AVTransport:1\r\n\
         USN: uuid:4d696e69-444c-164e-9d41-001ec0f1a2b3::urn:schemas-upnp-org:service:AVTransport:1\r\n\
         \r\n"
    )
}
