//! dlna-cast - discover DLNA renderers and play media on them.
//!
//! A thin command-line front end over `dlna-core`: it supplies the device
//! picker and reacts to discovery and playback events.

mod config;
mod picker;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dlna_core::{
    bootstrap_service, AvTransportClient, AvTransportControl, ChannelListener, DevicePicker,
    DlnaEvent, DlnaService, ReqwestTransport,
};
use tokio::signal;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::CastConfig;
use crate::picker::{MatchingPicker, TerminalPicker};

/// Refreshes a `--device` lookup may take before giving up.
const DEVICE_MATCH_REFRESHES: usize = 2;

/// Extra time allowed after the discovery window for late description fetches.
const FETCH_GRACE: Duration = Duration::from_millis(1500);

/// dlna-cast - Discover UPnP/DLNA renderers and play media on them.
#[derive(Parser, Debug)]
#[command(name = "dlna-cast")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(
        short,
        long,
        default_value = "info",
        env = "DLNA_CAST_LOG_LEVEL",
        global = true
    )]
    log_level: log::LevelFilter,

    /// Discovery window in milliseconds (overrides config file).
    #[arg(short, long, value_name = "MS", global = true)]
    window_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one discovery round and list the renderers found.
    Discover {
        /// Print one JSON object per device.
        #[arg(long)]
        json: bool,
    },
    /// Pick a renderer and play a media URL on it.
    Play {
        /// URL the renderer should fetch.
        media_url: String,

        /// Friendly name or UDN to select without prompting.
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Send a best-effort Stop to an AVTransport control URL.
    Stop {
        #[arg(long, value_name = "URL")]
        control_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::debug!("dlna-cast v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config =
        CastConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(window) = args.window_ms {
        config.core.discovery_window_ms = window;
    }

    match args.command {
        Command::Discover { json } => discover(config, json).await,
        Command::Play { media_url, device } => {
            let wanted = device.or(config.default_device.clone());
            play(config, &media_url, wanted).await
        }
        Command::Stop { control_url } => stop(config, &control_url).await,
    }
}

/// Builds and starts the service with a channel listener attached.
fn start_service(config: CastConfig) -> Result<(DlnaService, UnboundedReceiver<DlnaEvent>)> {
    let service = bootstrap_service(config.core).context("Failed to bootstrap service")?;
    let (listener, events) = ChannelListener::new();
    service.set_listener(Arc::new(listener))?;
    service.start().context("Failed to start service")?;
    Ok((service, events))
}

async fn discover(config: CastConfig, json: bool) -> Result<()> {
    let (service, mut events) = start_service(config)?;
    let deadline = tokio::time::Instant::now() + service.config().discovery_window() + FETCH_GRACE;

    service.start_discovery()?;
    log::info!(
        "Searching for {} ms...",
        service.config().discovery_window_ms
    );

    let mut found = 0usize;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(DlnaEvent::DeviceFound { device }) => {
                    found += 1;
                    if json {
                        println!("{}", serde_json::to_string(&device)?);
                    } else {
                        println!("{}. {} ({})", found, device, device.manufacturer_label());
                        println!("   udn:     {}", device.udn.as_deref().unwrap_or("-"));
                        println!("   control: {}", device.control_url.as_deref().unwrap_or("-"));
                    }
                }
                Some(_) => {}
                None => break,
            },
            _ = tokio::time::sleep_until(deadline) => break,
            _ = shutdown_signal() => {
                log::info!("Interrupted");
                break;
            }
        }
    }

    service.destroy();
    if found == 0 && !json {
        println!("No renderers found.");
    }
    Ok(())
}

async fn play(config: CastConfig, media_url: &str, wanted: Option<String>) -> Result<()> {
    let (service, mut events) = start_service(config)?;

    let picker: Box<dyn DevicePicker> = match wanted {
        Some(name) => Box::new(MatchingPicker::new(name, DEVICE_MATCH_REFRESHES)),
        None => Box::new(TerminalPicker),
    };

    let picked = tokio::select! {
        picked = service.show_device_picker(picker.as_ref(), media_url) => picked,
        _ = shutdown_signal() => {
            log::info!("Interrupted");
            service.destroy();
            return Ok(());
        }
    };

    let device = match picked {
        Ok(Some(device)) => device,
        Ok(None) => {
            service.destroy();
            bail!("No renderer selected");
        }
        Err(e) => {
            service.destroy();
            return Err(e).context("Playback request rejected");
        }
    };

    log::info!("Sending {} to {}", media_url, device);
    let outcome = tokio::select! {
        outcome = wait_for_outcome(&mut events) => outcome,
        _ = shutdown_signal() => {
            log::info!("Interrupted");
            service.destroy();
            return Ok(());
        }
    };

    if let Err(message) = outcome {
        service.destroy();
        bail!("Playback failed: {message}");
    }

    println!("Playing on {}. Press Ctrl+C to stop.", device);
    shutdown_signal().await;

    log::info!("Shutdown signal received, stopping playback...");
    service.destroy();
    // Give the best-effort Stop a chance to reach the renderer.
    tokio::time::sleep(Duration::from_millis(500)).await;
    Ok(())
}

/// Waits for the playback outcome, skipping discovery events.
async fn wait_for_outcome(events: &mut UnboundedReceiver<DlnaEvent>) -> Result<(), String> {
    while let Some(event) = events.recv().await {
        match event {
            DlnaEvent::PlaybackStarted { .. } => return Ok(()),
            DlnaEvent::PlaybackError { message } => return Err(message),
            other => log::debug!("Ignoring {} while waiting for playback", other.kind()),
        }
    }
    Err("event stream closed".to_string())
}

async fn stop(config: CastConfig, control_url: &str) -> Result<()> {
    let transport =
        ReqwestTransport::new(&config.core).context("Failed to create HTTP client")?;
    let client = AvTransportClient::new(Arc::new(transport));
    client.stop(control_url).await;
    println!("Stop sent to {}", control_url);
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
