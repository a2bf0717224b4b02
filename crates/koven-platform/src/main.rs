//! Koven platform entry point.
//!
//! This binary connects to the simulated oven's binary frame link and serves
//! browsers over WebSocket.  It is the only component browsers talk to.
//!
//! # Why a separate platform process?
//!
//! Web browsers can only communicate over HTTP/WebSocket; they cannot open raw
//! TCP sockets.  The oven speaks a compact binary framing on top of raw TCP.
//! The platform translates between the two so a web page can:
//!
//! - Watch the oven's state tick by tick as display-ready JSON.
//! - Start and stop baking programs.
//! - Ask whether the oven is reachable.
//!
//! # Usage
//!
//! ```text
//! koven-platform [OPTIONS]
//!
//! Options:
//!   --ws-bind        <IP>    WebSocket bind address       [default: 0.0.0.0]
//!   --ws-port        <PORT>  WebSocket listener port      [default: 8080]
//!   --device-host    <IP>    Oven device address          [default: 127.0.0.1]
//!   --device-port    <PORT>  Oven device frame link port  [default: 7878]
//!   --reconnect-secs <SECS>  Pause between device reconnects [default: 5]
//!   --client-buffer  <N>     Events a browser may lag by  [default: 256]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable               | Default     | Description                     |
//! |------------------------|-------------|---------------------------------|
//! | `KOVEN_WS_BIND`        | `0.0.0.0`   | WebSocket bind address          |
//! | `KOVEN_WS_PORT`        | `8080`      | WebSocket listener port         |
//! | `KOVEN_DEVICE_HOST`    | `127.0.0.1` | Oven device address             |
//! | `KOVEN_DEVICE_PORT`    | `7878`      | Oven device frame link port     |
//! | `KOVEN_RECONNECT_SECS` | `5`         | Device reconnect pause (secs)   |
//! | `KOVEN_CLIENT_BUFFER`  | `256`       | Per-browser event backlog       |
//!
//! # Architecture overview
//!
//! ```text
//! Web Browser  (JSON over WebSocket)
//!       ↕
//! koven-platform  ← this process
//!   WsServer    one task per browser session
//!   EventHub    fan-out of translated events
//!   DeviceLink  reconnecting TCP client
//!       ↕
//! koven-device  (binary frames over TCP, port 7878)
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use koven_platform::application::EventHub;
use koven_platform::domain::PlatformConfig;
use koven_platform::infrastructure::{DeviceLink, WsServer};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Koven platform.
///
/// Relays oven events to browsers over WebSocket and forwards their commands
/// to the oven.
#[derive(Debug, Parser)]
#[command(
    name = "koven-platform",
    about = "WebSocket platform for the Koven oven simulator",
    version
)]
struct Cli {
    /// IP address to bind the WebSocket server to.
    ///
    /// Use `0.0.0.0` to accept browsers from any interface, or `127.0.0.1`
    /// to accept only local connections.
    #[arg(long, default_value = "0.0.0.0", env = "KOVEN_WS_BIND")]
    ws_bind: String,

    /// TCP port for the WebSocket server to listen on.
    #[arg(long, default_value_t = 8080, env = "KOVEN_WS_PORT")]
    ws_port: u16,

    /// IP address of the oven device.
    #[arg(long, default_value = "127.0.0.1", env = "KOVEN_DEVICE_HOST")]
    device_host: String,

    /// TCP port of the oven device's frame link.
    #[arg(long, default_value_t = 7878, env = "KOVEN_DEVICE_PORT")]
    device_port: u16,

    /// Seconds to wait before reconnecting to an unreachable device.
    #[arg(long, default_value_t = 5, env = "KOVEN_RECONNECT_SECS")]
    reconnect_secs: u64,

    /// Events a browser session may fall behind before it is disconnected.
    #[arg(long, default_value_t = 256, env = "KOVEN_CLIENT_BUFFER")]
    client_buffer: usize,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`PlatformConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--ws-bind` or `--device-host` is not a valid IP
    /// address, or if `--reconnect-secs` or `--client-buffer` is zero.
    fn into_platform_config(self) -> anyhow::Result<PlatformConfig> {
        let ws_bind_addr: SocketAddr = format!("{}:{}", self.ws_bind, self.ws_port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid WebSocket bind address: '{}:{}'",
                    self.ws_bind, self.ws_port
                )
            })?;

        let device_addr: SocketAddr = format!("{}:{}", self.device_host, self.device_port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid device address: '{}:{}'",
                    self.device_host, self.device_port
                )
            })?;

        ensure!(self.reconnect_secs > 0, "--reconnect-secs must be at least 1");
        ensure!(self.client_buffer > 0, "--client-buffer must be at least 1");

        Ok(PlatformConfig {
            ws_bind_addr,
            device_addr,
            reconnect_interval: Duration::from_secs(self.reconnect_secs),
            client_buffer: self.client_buffer,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised; `RUST_LOG` controls the level.
/// 2. CLI arguments are parsed into a [`PlatformConfig`].
/// 3. A Ctrl+C handler is spawned; it broadcasts on the shutdown channel.
/// 4. The [`DeviceLink`] task starts connecting to the oven.
/// 5. The [`WsServer`] accepts browsers until shutdown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Parse CLI arguments ───────────────────────────────────────────────────
    let config = Cli::parse().into_platform_config()?;

    info!(
        ws = %config.ws_bind_addr,
        device = %config.device_addr,
        "Koven platform starting"
    );

    // ── Graceful shutdown channel ─────────────────────────────────────────────
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("received Ctrl+C, initiating graceful shutdown"),
                Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
            }
            let _ = shutdown.send(());
        });
    }

    // ── Wire the device link, the hub and the WebSocket server ────────────────
    let hub = EventHub::new(config.client_buffer);
    let (link, link_task) = DeviceLink::start(
        config.device_addr,
        config.reconnect_interval,
        hub.clone(),
        shutdown_tx.subscribe(),
    );

    let server = WsServer::bind(config.ws_bind_addr).await?;
    server
        .run(hub, Arc::new(link), shutdown_tx.subscribe())
        .await;

    link_task.await.context("device link task panicked")?;

    info!("Koven platform stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
