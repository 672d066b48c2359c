//! AVTransport control actions.
//!
//! Provides set-URI, play and stop via AVTransport SOAP actions against a
//! renderer's control URL. There are no retries: a failed action is reported
//! once and the caller decides whether to try again.

use std::sync::Arc;

use async_trait::async_trait;

use super::http::HttpTransport;
use super::soap::{SoapRequestBuilder, SoapResult};
use super::traits::AvTransportControl;

/// Sets the renderer's current transport URI.
///
/// `CurrentURIMetaData` is sent empty; the media URL is XML-escaped.
pub async fn set_av_transport_uri(
    transport: &dyn HttpTransport,
    control_url: &str,
    media_url: &str,
) -> SoapResult<()> {
    log::info!("[AVTransport] SetAVTransportURI: url={}, uri={}", control_url, media_url);

    SoapRequestBuilder::new(transport, control_url, "SetAVTransportURI")
        .instance_id()
        .arg("CurrentURI", media_url)
        .arg("CurrentURIMetaData", "")
        .send()
        .await?;

    Ok(())
}

/// Starts playback of the current transport URI at normal speed.
pub async fn play(transport: &dyn HttpTransport, control_url: &str) -> SoapResult<()> {
    log::info!("[AVTransport] Sending Play command to {}", control_url);

    SoapRequestBuilder::new(transport, control_url, "Play")
        .instance_id()
        .arg("Speed", "1")
        .send()
        .await?;

    Ok(())
}

/// Stops playback on the renderer.
pub async fn stop(transport: &dyn HttpTransport, control_url: &str) -> SoapResult<()> {
    SoapRequestBuilder::new(transport, control_url, "Stop")
        .instance_id()
        .send()
        .await?;

    Ok(())
}

/// [`AvTransportControl`] implementation over an [`HttpTransport`].
#[derive(Clone)]
pub struct AvTransportClient {
    transport: Arc<dyn HttpTransport>,
}

impl AvTransportClient {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AvTransportControl for AvTransportClient {
    async fn set_uri(&self, control_url: &str, media_url: &str) -> SoapResult<()> {
        set_av_transport_uri(self.transport.as_ref(), control_url, media_url).await
    }

    async fn play(&self, control_url: &str) -> SoapResult<()> {
        play(self.transport.as_ref(), control_url).await
    }

    async fn stop(&self, control_url: &str) {
        match stop(self.transport.as_ref(), control_url).await {
            Ok(()) => log::debug!("[AVTransport] Stop succeeded for {}", control_url),
            Err(e) => log::warn!("[AVTransport] Stop failed for {} (ignored): {}", control_url, e),
        }
    }
}
