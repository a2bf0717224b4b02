//! Koven device entry point.
//!
//! Wires the oven driver to the TCP frame link and runs both until Ctrl+C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Cli::into_device_config()   -- TOML file + flag/env overrides
//!  └─ run_oven()                  -- owns the Oven, ticks it
//!  │     ▲ frames_rx (mpsc)         ▼ events_tx (broadcast)
//!  └─ LinkServer::run()           -- one controller at a time over TCP
//! ```
//!
//! # Usage
//!
//! ```text
//! koven-device [OPTIONS]
//!
//! Options:
//!   --config  <PATH>   TOML config file
//!   --listen  <ADDR>   Link listen address [default from config: 127.0.0.1:7878]
//!   --tick-ms <MS>     Tick interval in milliseconds [default from config: 1000]
//! ```
//!
//! Each option can also be set with `KOVEN_CONFIG`, `KOVEN_LISTEN` and
//! `KOVEN_TICK_MS`.  Flags win over the config file.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use koven_device::application::driver::{run_oven, OvenDriver};
use koven_device::infrastructure::config::{load_config, DeviceConfig};
use koven_device::infrastructure::link::LinkServer;

/// Queued command frames before the link waits for the driver.
const COMMAND_QUEUE: usize = 32;

/// Event frames a slow controller may fall behind before skipping.
const EVENT_QUEUE: usize = 64;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Simulated Koven oven.
#[derive(Debug, Parser)]
#[command(
    name = "koven-device",
    about = "Simulated oven that reports its state over a binary frame link",
    version
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "KOVEN_CONFIG")]
    config: Option<PathBuf>,

    /// Address the frame link listens on.
    #[arg(long, env = "KOVEN_LISTEN")]
    listen: Option<SocketAddr>,

    /// Length of one simulated time unit in milliseconds.
    #[arg(long = "tick-ms", env = "KOVEN_TICK_MS")]
    tick_ms: Option<u64>,
}

impl Cli {
    /// Loads the config file (if any) and applies flag overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// the resulting tick interval is zero.
    fn into_device_config(self) -> anyhow::Result<DeviceConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => DeviceConfig::default(),
        };

        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        config.validate().context("invalid device config")?;

        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_device_config()?;

    // RUST_LOG wins; otherwise use the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        listen = %config.listen_addr,
        tick_ms = config.tick_interval_ms,
        "Koven device starting"
    );

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("received Ctrl+C, shutting down"),
                Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
            }
            let _ = shutdown.send(());
        });
    }

    // ── Channels between link and driver ─────────────────────────────────────
    let (frames_tx, frames_rx) = mpsc::channel(COMMAND_QUEUE);
    let (events_tx, _) = broadcast::channel(EVENT_QUEUE);

    let link = LinkServer::bind(config.listen_addr, frames_tx, events_tx.clone())
        .await
        .context("starting frame link")?;

    let oven_task = tokio::spawn(run_oven(
        OvenDriver::new(),
        config.tick_interval(),
        frames_rx,
        events_tx,
        shutdown_tx.subscribe(),
    ));

    let link_result = link.run(shutdown_tx.subscribe()).await;
    if link_result.is_err() {
        // Stop the oven too; the link is the only way to reach it.
        let _ = shutdown_tx.send(());
    }

    let driver = oven_task.await.context("oven task panicked")?;
    info!(final_state = %driver.snapshot().state, "Koven device stopped");

    link_result.context("frame link failed")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
