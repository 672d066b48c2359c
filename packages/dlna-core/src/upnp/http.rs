//! HTTP transport used for description fetches and SOAP control requests.
//!
//! Services depend on the [`HttpTransport`] trait rather than on `reqwest`
//! directly, so discovery and playback can be exercised without a network.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::Client;
use thiserror::Error;

use crate::protocol_constants::SOAP_CONTENT_TYPE;
use crate::state::Config;

/// Errors raised by an [`HttpTransport`] before a response status is known.
#[derive(Debug, Error)]
pub enum HttpError {
    /// `reqwest` failed to connect, send or read (including timeouts).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Transport-level failure reported by a non-`reqwest` transport.
    #[error("HTTP transport error: {0}")]
    Transport(String),
}

impl HttpError {
    /// Returns true if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout(),
            Self::Transport(_) => false,
        }
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    /// Returns true for any 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking-style HTTP operations the library performs against renderers.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs a GET and returns the status and body.
    async fn get(&self, url: &str) -> Result<HttpReply, HttpError>;

    /// POSTs an XML body with the given `SOAPAction` header value.
    async fn post_soap(
        &self,
        url: &str,
        soap_action: &str,
        body: String,
    ) -> Result<HttpReply, HttpError>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
///
/// Connect and read timeouts come from [`Config`] and apply to every request.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds the shared client with the configured timeouts.
    pub fn new(config: &Config) -> Result<Self, HttpError> {
        let client = Client::builder()
            .connect_timeout(config.http_connect_timeout())
            .read_timeout(config.http_read_timeout())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, HttpError> {
        let res = self.client.get(url).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(HttpReply { status, body })
    }

    async fn post_soap(
        &self,
        url: &str,
        soap_action: &str,
        body: String,
    ) -> Result<HttpReply, HttpError> {
        let res = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(SOAP_CONTENT_TYPE))
            .header("SOAPAction", soap_action)
            .body(body)
            .send()
            .await?;
        let status = res.status().as_u16();
        // A failed body read after the status arrived still tells us the status.
        let body = res.text().await.unwrap_or_default();
        Ok(HttpReply { status, body })
    }
}
