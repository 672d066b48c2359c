//! SSDP search round for AVTransport renderers.
//!
//! A round sends one M-SEARCH to the multicast group and then collects
//! unicast responses on the same socket until the discovery window closes
//! or the session is cancelled. Each response's `LOCATION` header is handed
//! to the caller, which fetches the description document.

use std::net::SocketAddr;

use tokio::time::{sleep, timeout, Instant};
use tokio_util::sync::CancellationToken;

use super::socket::SsdpSocket;
use super::types::{DiscoveryError, DiscoveryResult, RoundSummary};
use crate::protocol_constants::SSDP_MULTICAST_ADDR;
use crate::state::Config;
use crate::upnp::utils::extract_header;

/// Builds the M-SEARCH request for `search_target`.
///
/// HOST always names the multicast group, even though the datagram is
/// addressed there anyway.
pub fn build_msearch_message(search_target: &str, mx: u8) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: 239.255.255.250:1900\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         ST: {}\r\n\r\n",
        mx, search_target
    )
}

/// Extracts a non-empty `LOCATION` value from an SSDP response.
pub fn parse_location(response: &str) -> Option<&str> {
    extract_header(response, "LOCATION").filter(|loc| !loc.is_empty())
}

/// Runs one discovery round on `socket`.
///
/// `on_location` is called for every response carrying a location, in
/// arrival order and without deduplication. A failed search send aborts the
/// round with [`DiscoveryError::SendSearch`]; receive errors and per-call
/// timeouts are swallowed. Cancellation through `cancel` ends the round at
/// the next receive boundary.
pub async fn run_search_round<F>(
    socket: &dyn SsdpSocket,
    config: &Config,
    cancel: &CancellationToken,
    mut on_location: F,
) -> DiscoveryResult<RoundSummary>
where
    F: FnMut(String) + Send,
{
    let message = build_msearch_message(&config.search_target, config.mx);
    let target = SocketAddr::V4(SSDP_MULTICAST_ADDR);

    socket
        .send_to(message.as_bytes(), target)
        .await
        .map_err(DiscoveryError::SendSearch)?;
    log::debug!("[SSDP] M-SEARCH sent to {} (ST={})", target, config.search_target);

    let start = Instant::now();
    let deadline = start + config.discovery_window();
    let recv_timeout = config.recv_timeout();
    let mut buf = vec![0u8; config.recv_buffer_size];
    let mut summary = RoundSummary::default();

    loop {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        let wait = recv_timeout.min(deadline - now);

        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                summary.cancelled = true;
                break;
            }
            received = timeout(wait, socket.recv_from(&mut buf)) => received,
        };

        match received {
            Ok(Ok((amt, src))) => {
                summary.responses += 1;
                let response = String::from_utf8_lossy(&buf[..amt]);
                match parse_location(&response) {
                    Some(location) => {
                        log::trace!("[SSDP] Response from {}: LOCATION={}", src, location);
                        summary.locations += 1;
                        on_location(location.to_string());
                    }
                    None => log::trace!("[SSDP] Response from {} without LOCATION", src),
                }
            }
            Ok(Err(e)) => {
                log::debug!("[SSDP] Transient recv error: {}", e);
                // Back off so a socket that fails instantly does not spin.
                sleep(wait).await;
            }
            Err(_) => {} // per-call timeout, re-check flag and deadline
        }
    }

    log::debug!(
        "[SSDP] Round finished after {}ms: {} responses, {} locations{}",
        start.elapsed().as_millis(),
        summary.responses,
        summary.locations,
        if summary.cancelled { " (stopped)" } else { "" }
    );
    Ok(summary)
}
