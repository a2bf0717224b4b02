//! TCP frame link between the device and its controller.
//!
//! The device listens; the platform connects.  Only one controller is served
//! at a time: while a connection is open, further connection attempts wait in
//! the listen backlog until it closes.
//!
//! Per connection, a single task:
//! - reads bytes, cuts them into frames with [`FrameBuffer`] and forwards each
//!   raw frame to the oven driver;
//! - writes every event frame published by the driver to the socket.
//!
//! The link never decodes commands itself.  [`FrameBuffer`] drops damaged
//! bytes and the driver rejects frames with unknown codes, so the connection
//! survives both.

use std::net::SocketAddr;

use koven_core::FrameBuffer;
use thiserror::Error;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::{broadcast, mpsc},
};
use tracing::{debug, error, info, warn};

/// Errors that can occur in the device link layer.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The listen socket could not be bound.
    #[error("failed to bind link listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Accepting a controller connection failed.
    #[error("failed to accept controller: {0}")]
    Accept(#[source] std::io::Error),

    /// The driver's command channel is closed; nothing can consume frames.
    #[error("oven driver is no longer running")]
    DriverGone,
}

/// Why a controller session ended.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    /// The controller closed the connection or an I/O error occurred.
    Disconnected,
    /// The process is shutting down.
    Shutdown,
}

/// Accepts controllers and shuttles frames between them and the oven driver.
pub struct LinkServer {
    listener: TcpListener,
    frames_tx: mpsc::Sender<Vec<u8>>,
    events_tx: broadcast::Sender<Vec<u8>>,
}

impl LinkServer {
    /// Binds the listener.
    ///
    /// `frames_tx` receives every complete frame read from a controller;
    /// `events_tx` is subscribed to once per connection.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Bind`] if the address is in use or not local.
    pub async fn bind(
        addr: SocketAddr,
        frames_tx: mpsc::Sender<Vec<u8>>,
        events_tx: broadcast::Sender<Vec<u8>>,
    ) -> Result<Self, LinkError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| LinkError::Bind { addr, source })?;
        Ok(Self {
            listener,
            frames_tx,
            events_tx,
        })
    }

    /// Address actually bound (useful when binding port 0).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the socket has no local address.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves controllers one after another until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Accept`] if the listener fails, or
    /// [`LinkError::DriverGone`] if the driver stopped consuming frames.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), LinkError> {
        info!(addr = ?self.listener.local_addr().ok(), "link listening for controller");

        loop {
            let (stream, peer) = tokio::select! {
                _ = shutdown.recv() => {
                    info!("link shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => accepted.map_err(LinkError::Accept)?,
            };

            info!(%peer, "controller connected");
            let end = self.serve(stream, &mut shutdown).await?;
            info!(%peer, "controller disconnected");
            if end == SessionEnd::Shutdown {
                return Ok(());
            }
        }
    }

    /// Runs one controller session.
    async fn serve(
        &self,
        mut stream: TcpStream,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<SessionEnd, LinkError> {
        let mut events_rx = self.events_tx.subscribe();
        let mut frames = FrameBuffer::new();
        let mut read_buf = [0u8; 256];

        loop {
            tokio::select! {
                _ = shutdown.recv() => return Ok(SessionEnd::Shutdown),

                read = stream.read(&mut read_buf) => {
                    let n = match read {
                        Ok(0) => return Ok(SessionEnd::Disconnected),
                        Ok(n) => n,
                        Err(e) => {
                            warn!("link read error: {e}");
                            return Ok(SessionEnd::Disconnected);
                        }
                    };
                    frames.push(&read_buf[..n]);
                    while let Some(frame) = frames.next_frame() {
                        debug!(len = frame.len(), "frame received from controller");
                        self.frames_tx
                            .send(frame)
                            .await
                            .map_err(|_| LinkError::DriverGone)?;
                    }
                }

                event = events_rx.recv() => match event {
                    Ok(frame) => {
                        if let Err(e) = stream.write_all(&frame).await {
                            warn!("link write error: {e}");
                            return Ok(SessionEnd::Disconnected);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "controller too slow; skipped events");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        error!("event channel closed; ending session");
                        return Ok(SessionEnd::Shutdown);
                    }
                },
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
