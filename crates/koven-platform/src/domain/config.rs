//! Platform configuration types.
//!
//! [`PlatformConfig`] is the single source of truth for all runtime settings.
//! It is built from CLI arguments in `main.rs`, or from defaults in tests.

use std::net::SocketAddr;
use std::time::Duration;

/// All runtime configuration for the platform process.
///
/// # Example
///
/// ```rust
/// use koven_platform::domain::PlatformConfig;
///
/// let cfg = PlatformConfig::default();
/// assert_eq!(cfg.ws_bind_addr.port(), 8080);
/// assert_eq!(cfg.device_addr.port(), 7878);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Address the WebSocket server binds to.
    ///
    /// `0.0.0.0` accepts browsers from any interface; `127.0.0.1` restricts
    /// the platform to local browsers.
    pub ws_bind_addr: SocketAddr,

    /// TCP address of the oven device's frame link.
    pub device_addr: SocketAddr,

    /// Pause between attempts to (re)connect to the device.
    pub reconnect_interval: Duration,

    /// Events a browser session may fall behind before it is disconnected.
    pub client_buffer: usize,
}

impl Default for PlatformConfig {
    /// | Field              | Default          |
    /// |--------------------|------------------|
    /// | ws_bind_addr       | `0.0.0.0:8080`   |
    /// | device_addr        | `127.0.0.1:7878` |
    /// | reconnect_interval | 5 seconds        |
    /// | client_buffer      | 256              |
    fn default() -> Self {
        Self {
            ws_bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            device_addr: SocketAddr::from(([127, 0, 0, 1], 7878)),
            reconnect_interval: Duration::from_secs(5),
            client_buffer: 256,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
