//! Low-level SOAP protocol implementation for UPnP control.
//!
//! This module handles the raw SOAP envelope building, HTTP transport and
//! fault parsing. For the AVTransport actions, see `playback.rs`.

use thiserror::Error;

use super::http::{HttpError, HttpTransport};
use super::utils::{escape_xml, extract_xml_text};
use crate::protocol_constants::{
    AV_TRANSPORT_INSTANCE_ID, AV_TRANSPORT_URN, SOAP_ENCODING_STYLE, SOAP_ENVELOPE_NS,
    SOAP_SUCCESS_STATUS,
};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during SOAP operations with a renderer.
#[derive(Debug, Error)]
pub enum SoapError {
    /// HTTP request to the renderer failed before a status was received.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// Renderer answered with anything other than HTTP 200.
    ///
    /// The detail is the UPnP error description or SOAP fault string when
    /// present, else the (possibly empty) response body.
    #[error("HTTP error {0}{detail}", detail = fmt_detail(.1))]
    HttpStatus(u16, String),
}

fn fmt_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

/// Convenient Result alias for SOAP operations.
pub type SoapResult<T> = Result<T, SoapError>;

// ─────────────────────────────────────────────────────────────────────────────
// SOAP Request/Response
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a SOAP 1.1 envelope for `action` on `service`.
///
/// The envelope is a single line with no leading whitespace; some renderer
/// SOAP stacks reject XML with whitespace before the root element. Argument
/// values are XML-escaped, argument order is preserved.
pub fn build_envelope(service: &str, action: &str, args: &[(&str, &str)]) -> String {
    let mut body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope xmlns:s="{SOAP_ENVELOPE_NS}" s:encodingStyle="{SOAP_ENCODING_STYLE}"><s:Body><u:{action} xmlns:u="{service}">"#
    );

    for (k, v) in args {
        body.push_str(&format!("<{k}>{}</{k}>", escape_xml(v)));
    }

    body.push_str(&format!("</u:{action}></s:Body></s:Envelope>"));
    body
}

/// Returns the quoted `SOAPAction` header value, e.g. `"urn:...:AVTransport:1#Play"`.
pub fn soap_action_header(service: &str, action: &str) -> String {
    format!("\"{service}#{action}\"")
}

/// Sends a SOAP request to a renderer's control URL.
///
/// Success is strictly HTTP 200; any other status becomes
/// [`SoapError::HttpStatus`] with the renderer's fault detail when present.
///
/// # Returns
/// The response body on success.
pub async fn send_soap_request(
    transport: &dyn HttpTransport,
    control_url: &str,
    service: &str,
    action: &str,
    args: &[(&str, &str)],
) -> SoapResult<String> {
    let body = build_envelope(service, action, args);

    log::info!("[SOAP] {} -> {} (body: {} bytes)", action, control_url, body.len());
    log::debug!("[SOAP] Request body: {}", body);

    let start = std::time::Instant::now();
    let res = transport
        .post_soap(control_url, &soap_action_header(service, action), body)
        .await;

    log::info!(
        "[SOAP] {} completed in {:?}: {:?}",
        action,
        start.elapsed(),
        res.as_ref().map(|r| r.status)
    );

    let reply = res?;

    if reply.status != SOAP_SUCCESS_STATUS {
        let detail = extract_fault_detail(&reply.body).unwrap_or_else(|| reply.body.trim().to_string());
        return Err(SoapError::HttpStatus(reply.status, detail));
    }

    Ok(reply.body)
}

/// Extracts a human-readable fault description from a SOAP fault body.
///
/// Prefers the UPnP `errorDescription` (with `errorCode`), falling back to
/// the SOAP `faultstring`.
fn extract_fault_detail(xml: &str) -> Option<String> {
    let code = extract_xml_text(xml, "errorCode");
    match (extract_xml_text(xml, "errorDescription"), code) {
        (Some(desc), Some(code)) => Some(format!("UPnP error {code}: {desc}")),
        (Some(desc), None) => Some(desc),
        (None, Some(code)) => Some(format!("UPnP error {code}")),
        (None, None) => extract_xml_text(xml, "faultstring"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SOAP Request Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for constructing and sending SOAP requests to a renderer.
///
/// The service defaults to AVTransport, the only service this library drives.
///
/// # Example
/// ```ignore
/// let response = SoapRequestBuilder::new(transport, control_url, "Play")
///     .instance_id()
///     .arg("Speed", "1")
///     .send()
///     .await?;
/// ```
pub struct SoapRequestBuilder<'a> {
    transport: &'a dyn HttpTransport,
    control_url: &'a str,
    service: &'a str,
    action: &'a str,
    args: Vec<(&'a str, String)>,
}

impl<'a> SoapRequestBuilder<'a> {
    #[must_use]
    pub fn new(transport: &'a dyn HttpTransport, control_url: &'a str, action: &'a str) -> Self {
        Self {
            transport,
            control_url,
            service: AV_TRANSPORT_URN,
            action,
            args: Vec::new(),
        }
    }

    /// Adds an argument to the SOAP request.
    ///
    /// Arguments are included in the SOAP body in the order they are added.
    #[must_use]
    pub fn arg(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.args.push((key, value.into()));
        self
    }

    /// Adds the `InstanceID` argument addressing the single transport instance.
    #[must_use]
    pub fn instance_id(self) -> Self {
        self.arg("InstanceID", AV_TRANSPORT_INSTANCE_ID)
    }

    /// Sends the SOAP request and returns the response body.
    pub async fn send(self) -> SoapResult<String> {
        let args: Vec<(&str, &str)> = self.args.iter().map(|(k, v)| (*k, v.as_str())).collect();

        send_soap_request(
            self.transport,
            self.control_url,
            self.service,
            self.action,
            &args,
        )
        .await
    }

    /// Returns the request parts without sending (for testing).
    #[cfg(test)]
    pub fn into_parts(self) -> (&'a str, &'a str, Vec<(&'a str, String)>) {
        (self.service, self.action, self.args)
    }
}
