//! TCP connection to the oven device.
//!
//! The platform keeps exactly one connection to the device's frame link and
//! re-establishes it whenever it drops.  A background task owns the socket:
//!
//! - bytes read from the device are cut into frames with [`FrameBuffer`],
//!   decoded as [`Event`](koven_core::Event)s and published on the
//!   [`EventHub`];
//! - commands queued through [`DeviceLink`] (the [`CommandSink`] seen by the
//!   WebSocket sessions) are encoded and written to the socket.
//!
//! # Binary streaming protocol
//!
//! TCP is a *stream* protocol: a single `read()` call may return less than one
//! complete frame, or more than one.  [`FrameBuffer`] accumulates bytes and
//! hands back whole frames, so this module never has to reason about partial
//! reads.
//!
//! # Connection state
//!
//! While the device is unreachable [`DeviceLink::send_command`] fails fast
//! with [`BridgeError::NotConnected`] instead of queueing commands that would
//! be replayed, possibly much later, on the next connection.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use koven_core::{decode_event, encode_command, Command, FrameBuffer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::{BridgeError, CommandSink, EventHub};

/// Commands that may be queued for the device before senders see
/// [`BridgeError::SendFailed`].
const COMMAND_QUEUE: usize = 16;

/// Handle used to send commands to the device.
///
/// Cheap to clone; every clone feeds the same background connection task.
#[derive(Debug, Clone)]
pub struct DeviceLink {
    connected: Arc<AtomicBool>,
    commands_tx: mpsc::Sender<Command>,
}

/// Why one device connection ended.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Disconnected,
    Shutdown,
}

impl DeviceLink {
    /// Spawns the connection task and returns a handle to it.
    ///
    /// The task connects to `device_addr`, retries every `reconnect_interval`
    /// while the device is unreachable, and exits when `shutdown` fires or
    /// every [`DeviceLink`] clone has been dropped.
    pub fn start(
        device_addr: SocketAddr,
        reconnect_interval: Duration,
        hub: EventHub,
        shutdown: broadcast::Receiver<()>,
    ) -> (Self, JoinHandle<()>) {
        let connected = Arc::new(AtomicBool::new(false));
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE);

        let task = tokio::spawn(run_link(
            device_addr,
            reconnect_interval,
            hub,
            Arc::clone(&connected),
            commands_rx,
            shutdown,
        ));

        (
            Self {
                connected,
                commands_tx,
            },
            task,
        )
    }
}

impl CommandSink for DeviceLink {
    fn send_command(&self, cmd: &Command) -> Result<(), BridgeError> {
        if !self.is_connected() {
            return Err(BridgeError::NotConnected);
        }
        self.commands_tx.try_send(*cmd).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                BridgeError::SendFailed("command queue full".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => BridgeError::NotConnected,
        })
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

// ── Background task ───────────────────────────────────────────────────────────

async fn run_link(
    device_addr: SocketAddr,
    reconnect_interval: Duration,
    hub: EventHub,
    connected: Arc<AtomicBool>,
    mut commands_rx: mpsc::Receiver<Command>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let attempt = tokio::select! {
            _ = shutdown.recv() => return,
            attempt = TcpStream::connect(device_addr) => attempt,
        };

        match attempt {
            Ok(stream) => {
                info!(%device_addr, "connected to device");
                connected.store(true, Ordering::SeqCst);
                let end = serve(stream, &hub, &mut commands_rx, &mut shutdown).await;
                connected.store(false, Ordering::SeqCst);

                // Anything still queued was meant for the connection that just died.
                while let Ok(cmd) = commands_rx.try_recv() {
                    warn!(action = %cmd.action, "dropping command queued for lost device");
                }

                if end == SessionEnd::Shutdown {
                    info!("device link stopped");
                    return;
                }
                warn!(
                    %device_addr,
                    "device connection lost; reconnecting in {:?}", reconnect_interval
                );
            }
            Err(e) => {
                warn!(
                    %device_addr,
                    "device unreachable: {e}; retrying in {:?}", reconnect_interval
                );
            }
        }

        tokio::select! {
            _ = shutdown.recv() => return,
            _ = tokio::time::sleep(reconnect_interval) => {}
        }
    }
}

/// Runs one device connection until it drops or shutdown is requested.
async fn serve(
    mut stream: TcpStream,
    hub: &EventHub,
    commands_rx: &mut mpsc::Receiver<Command>,
    shutdown: &mut broadcast::Receiver<()>,
) -> SessionEnd {
    let mut frames = FrameBuffer::new();
    let mut read_buf = [0u8; 256];

    loop {
        tokio::select! {
            _ = shutdown.recv() => return SessionEnd::Shutdown,

            read = stream.read(&mut read_buf) => {
                let n = match read {
                    Ok(0) => return SessionEnd::Disconnected,
                    Ok(n) => n,
                    Err(e) => {
                        warn!("device read error: {e}");
                        return SessionEnd::Disconnected;
                    }
                };
                frames.push(&read_buf[..n]);
                while let Some(frame) = frames.next_frame() {
                    match decode_event(&frame) {
                        Ok(event) => {
                            let sessions = hub.publish(&event);
                            debug!(state = %event.state, sessions, "event relayed");
                        }
                        Err(e) => warn!("discarding bad frame from device: {e}"),
                    }
                }
            }

            cmd = commands_rx.recv() => {
                let Some(cmd) = cmd else {
                    // Every DeviceLink handle is gone.
                    return SessionEnd::Shutdown;
                };
                if let Err(e) = stream.write_all(&encode_command(&cmd)).await {
                    warn!(action = %cmd.action, "device write error: {e}");
                    return SessionEnd::Disconnected;
                }
                debug!(action = %cmd.action, "command written to device");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
