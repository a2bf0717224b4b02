//! WebSocket server: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from browsers.
//! 3. Upgrading each connection to a WebSocket session.
//! 4. Running one task per session that concurrently:
//!    - forwards every oven event from the [`EventHub`] as a JSON text frame;
//!    - answers each JSON request from the browser with exactly one reply.
//! 5. Closing every session gracefully when shutdown is signalled.
//!
//! # Scalability
//!
//! Each browser session runs in its own Tokio task.  The accept loop never
//! blocks on a session: it accepts a connection and immediately spawns a task
//! for it before accepting the next one.
//!
//! # Slow browsers
//!
//! A session that falls more than the hub's capacity behind is closed rather
//! than allowed to stall event delivery for everyone else.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::{handle_browser_message, CommandSink, EventHub};
use crate::domain::messages::{BrowserToPlatformMsg, PlatformToBrowserMsg};

// ── Public API ────────────────────────────────────────────────────────────────

/// Accepts browser WebSocket sessions.
pub struct WsServer {
    listener: TcpListener,
}

impl WsServer {
    /// Binds the WebSocket listener on `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the port is already in use or the process lacks
    /// permission to bind it.
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind WebSocket listener on {addr}"))?;
        Ok(Self { listener })
    }

    /// Address actually bound (useful when binding port 0).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the socket has no local address.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until `shutdown` fires.
    ///
    /// Every session receives events from `hub` and sends commands through
    /// `sink`.  Sessions get their own shutdown receiver and close themselves.
    pub async fn run(
        self,
        hub: EventHub,
        sink: Arc<dyn CommandSink>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        info!(
            addr = ?self.listener.local_addr().ok(),
            "WebSocket server listening"
        );

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("WebSocket server shutting down");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        info!("new browser connection from {peer_addr}");
                        tokio::spawn(handle_browser_session(
                            stream,
                            peer_addr,
                            hub.clone(),
                            Arc::clone(&sink),
                            shutdown.resubscribe(),
                        ));
                    }
                    Err(e) => {
                        // Transient accept error (e.g., too many open file descriptors).
                        error!("accept error: {e}");
                    }
                },
            }
        }
    }
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Top-level handler for a single browser WebSocket session.
///
/// Wraps [`run_session`] and logs the outcome.
async fn handle_browser_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    hub: EventHub,
    sink: Arc<dyn CommandSink>,
    shutdown: broadcast::Receiver<()>,
) {
    let session_id = Uuid::new_v4();
    match run_session(raw_stream, session_id, hub, sink, shutdown).await {
        Ok(()) => info!(%session_id, "session {peer_addr} closed normally"),
        Err(e) => warn!(%session_id, "session {peer_addr} closed with error: {e:#}"),
    }
}

/// Runs the complete lifecycle of a single browser WebSocket session.
///
/// # Errors
///
/// Returns an error if the handshake fails, a frame cannot be written, or
/// the browser fell too far behind the event stream.
async fn run_session(
    raw_stream: TcpStream,
    session_id: Uuid,
    hub: EventHub,
    sink: Arc<dyn CommandSink>,
    mut shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(raw_stream)
        .await
        .context("WebSocket handshake failed")?;

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // Subscribe only after the handshake so half-open sockets are not counted.
    let mut events = hub.subscribe();
    info!(%session_id, clients = hub.client_count(), "browser session established");

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                let _ = ws_tx.send(WsMessage::Close(None)).await;
                return Ok(());
            }

            event = events.recv() => match event {
                Ok(json) => ws_tx
                    .send(WsMessage::Text(json))
                    .await
                    .context("failed to send event")?,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    let _ = ws_tx.send(WsMessage::Close(None)).await;
                    bail!("browser too slow; {skipped} events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    let _ = ws_tx.send(WsMessage::Close(None)).await;
                    return Ok(());
                }
            },

            frame = ws_rx.next() => {
                let ws_msg = match frame {
                    Some(Ok(msg)) => msg,
                    Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                        debug!(%session_id, "browser WebSocket closed");
                        return Ok(());
                    }
                    Some(Err(e)) => return Err(e).context("browser WebSocket error"),
                    None => {
                        debug!(%session_id, "browser stream ended");
                        return Ok(());
                    }
                };

                match ws_msg {
                    WsMessage::Text(text) => {
                        let reply = reply_to(&text, sink.as_ref(), hub.client_count());
                        let json = serde_json::to_string(&reply)
                            .context("failed to serialize reply")?;
                        ws_tx
                            .send(WsMessage::Text(json))
                            .await
                            .context("failed to send reply")?;
                    }
                    WsMessage::Binary(_) => {
                        // The browser-facing protocol is JSON-only.
                        warn!(%session_id, "unexpected binary WebSocket frame (ignored)");
                    }
                    WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {
                        // tungstenite queues the Pong reply itself.
                    }
                    WsMessage::Close(_) => {
                        debug!(%session_id, "WebSocket Close frame received");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Parses one browser text frame and produces its reply.
///
/// Invalid JSON does not close the session; the browser gets an error reply.
fn reply_to(text: &str, sink: &dyn CommandSink, clients: usize) -> PlatformToBrowserMsg {
    match serde_json::from_str::<BrowserToPlatformMsg>(text) {
        Ok(msg) => {
            debug!("browser → platform: {}", browser_msg_type_name(&msg));
            handle_browser_message(&msg, sink, clients)
        }
        Err(e) => {
            warn!("invalid JSON from browser: {e}");
            PlatformToBrowserMsg::error(format!("invalid request: {e}"))
        }
    }
}

/// Returns a short, human-readable name for a browser message type.
fn browser_msg_type_name(msg: &BrowserToPlatformMsg) -> &'static str {
    match msg {
        BrowserToPlatformMsg::Start { .. } => "start",
        BrowserToPlatformMsg::Stop => "stop",
        BrowserToPlatformMsg::Health => "health",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
