//! OvenDriver: the single owner of the simulated oven.
//!
//! The oven in `koven-core` is not synchronised, so every mutation has to
//! happen on one task.  [`run_oven`] is that task: it takes raw command frames
//! from the link layer and timer ticks from a tokio interval and feeds both to
//! one [`OvenDriver`], one at a time.
//!
//! # Why a `select!` loop instead of a mutex? (for beginners)
//!
//! A `Mutex<Oven>` shared between a reader task and a timer task would also
//! be correct, but the lock would have to be taken on every tick and every
//! frame.  With `tokio::select!` a single task waits on both sources and
//! handles whichever is ready first.  Commands and ticks can never interleave
//! because only one branch body runs at a time.

use std::time::Duration;

use koven_core::{decode_command, encode_event, Command, DecodeError, Event, Oven};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// Decodes command frames into an [`Oven`] and encodes its tick events.
#[derive(Debug, Default)]
pub struct OvenDriver {
    oven: Oven,
}

impl OvenDriver {
    /// Creates a driver around a fresh idle oven.
    pub fn new() -> Self {
        Self { oven: Oven::new() }
    }

    /// Decodes `frame` as a command and applies it to the oven.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeError`] when the frame is malformed.  The oven is
    /// left untouched in that case.
    pub fn handle_frame(&mut self, frame: &[u8]) -> Result<Command, DecodeError> {
        let cmd = decode_command(frame)?;
        info!(
            action = %cmd.action,
            temperature = cmd.temperature,
            duration = cmd.duration,
            "command received"
        );
        self.oven.apply(&cmd);
        Ok(cmd)
    }

    /// Advances the oven by one tick and returns the encoded event frame.
    pub fn advance(&mut self) -> Vec<u8> {
        let event = self.oven.tick();
        debug!(
            state = %event.state,
            temperature = event.current_temperature,
            remaining = event.remaining_time,
            programmed_temperature = event.programmed_temperature,
            programmed_duration = event.programmed_duration,
            "publishing event"
        );
        encode_event(&event)
    }

    /// Current oven snapshot, without ticking.
    pub fn snapshot(&self) -> Event {
        self.oven.snapshot()
    }
}

/// Runs the oven until `shutdown` fires.
///
/// The first tick happens one full `tick_interval` after the call.  Each
/// tick's event frame is sent on `events_tx`; having nobody subscribed (no
/// controller connected) is normal and only logged at trace level.
///
/// Returns the driver so callers can inspect the final state.
pub async fn run_oven(
    mut driver: OvenDriver,
    tick_interval: Duration,
    mut frames_rx: mpsc::Receiver<Vec<u8>>,
    events_tx: broadcast::Sender<Vec<u8>>,
    mut shutdown: broadcast::Receiver<()>,
) -> OvenDriver {
    let mut ticker = time::interval_at(Instant::now() + tick_interval, tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(tick_ms = tick_interval.as_millis() as u64, "oven running");

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                info!("oven loop shutting down");
                break;
            }
            Some(frame) = frames_rx.recv() => {
                if let Err(e) = driver.handle_frame(&frame) {
                    warn!("dropping command frame: {e}");
                }
            }
            _ = ticker.tick() => {
                let frame = driver.advance();
                if events_tx.send(frame).is_err() {
                    trace!("no controller subscribed; event not delivered");
                }
            }
        }
    }

    driver
}

// ── Tests ─────────────────────────────────────────────────────────────────────
