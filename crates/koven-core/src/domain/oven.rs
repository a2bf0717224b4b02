//! Oven simulation domain entity.
//!
//! The oven is a four-state machine advanced one discrete tick at a time.  Its
//! fields are exactly the fields of an [`Event`], so every tick returns a
//! snapshot that can be put on the wire unchanged.
//!
//! ```text
//!            start                 target reached         remaining == 0
//!   Idle ───────────► Preheating ─────────────────► Baking ───────────────┐
//!    ▲                    │ stop                      │ stop               │
//!    │                    ▼                           ▼                    ▼
//!    └──────────────── CoolingDown ◄──────────────────┴──── (above room) ──┘
//!        at room temp
//! ```
//!
//! `stop` and baking completion skip the cooling phase entirely when the oven
//! is not above room temperature.

use tracing::{debug, trace};

use crate::protocol::messages::{Action, Command, Event, OvenState, NOT_APPLICABLE};

/// Ambient temperature that an idle or fully cooled oven settles to.
pub const ROOM_TEMPERATURE: i16 = 25;

/// A single simulated oven.
///
/// The oven performs no locking.  Exactly one owner calls [`Oven::apply`] and
/// [`Oven::tick`], and the two must not interleave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oven {
    state: OvenState,
    current_temperature: i16,
    remaining_time: i16,
    programmed_duration: i16,
    programmed_temperature: i16,
}

impl Default for Oven {
    fn default() -> Self {
        Self::new()
    }
}

impl Oven {
    /// Creates an idle oven at room temperature with no program.
    pub fn new() -> Self {
        Self {
            state: OvenState::Idle,
            current_temperature: ROOM_TEMPERATURE,
            remaining_time: NOT_APPLICABLE,
            programmed_duration: NOT_APPLICABLE,
            programmed_temperature: NOT_APPLICABLE,
        }
    }

    /// Current discrete state.
    pub fn state(&self) -> OvenState {
        self.state
    }

    /// Current temperature in degrees Celsius.
    pub fn current_temperature(&self) -> i16 {
        self.current_temperature
    }

    /// Applies a decoded command.
    ///
    /// - `start` is only accepted while idle; a running program cannot be
    ///   replaced or queued.
    /// - `stop` is accepted in every state and ignores the command's
    ///   temperature and duration.
    pub fn apply(&mut self, cmd: &Command) {
        match cmd.action {
            Action::Start => {
                if self.state != OvenState::Idle {
                    debug!(state = %self.state, "start ignored: program already active");
                    return;
                }
                self.state = OvenState::Preheating;
                self.programmed_temperature = cmd.temperature;
                self.programmed_duration = cmd.duration;
                debug!(
                    target_temperature = cmd.temperature,
                    duration = cmd.duration,
                    "program started"
                );
            }
            Action::Stop => {
                self.clear_program();
                if self.is_above_room_temperature() {
                    self.state = OvenState::CoolingDown;
                } else {
                    self.reset();
                }
                debug!(
                    state = %self.state,
                    temperature = self.current_temperature,
                    "program stopped"
                );
            }
        }
    }

    /// Advances the simulation by one time unit and returns the resulting
    /// snapshot.
    ///
    /// Heating, counting down and cooling move one unit per tick.  A phase
    /// change happens on the tick *after* the boundary is reached, so each
    /// event pairs a state with numbers that belong to it.
    pub fn tick(&mut self) -> Event {
        match self.state {
            OvenState::Idle => {}
            OvenState::Preheating => {
                if self.current_temperature < self.programmed_temperature {
                    self.current_temperature += 1;
                } else {
                    self.state = OvenState::Baking;
                    self.remaining_time = self.programmed_duration;
                    debug!(remaining = self.remaining_time, "target reached, baking");
                }
            }
            OvenState::Baking => {
                if self.remaining_time > 0 {
                    self.remaining_time -= 1;
                } else if self.is_above_room_temperature() {
                    self.state = OvenState::CoolingDown;
                    self.programmed_temperature = NOT_APPLICABLE;
                    self.programmed_duration = NOT_APPLICABLE;
                    debug!(temperature = self.current_temperature, "baking done, cooling down");
                } else {
                    self.reset();
                    debug!("baking done at room temperature, idle");
                }
            }
            OvenState::CoolingDown => {
                if self.is_above_room_temperature() {
                    self.current_temperature -= 1;
                } else {
                    self.reset();
                    debug!("cooled down, idle");
                }
            }
        }

        let event = self.snapshot();
        trace!(?event, "tick");
        event
    }

    /// Returns the current state as an [`Event`] without advancing time.
    pub fn snapshot(&self) -> Event {
        Event {
            state: self.state,
            current_temperature: self.current_temperature,
            remaining_time: self.remaining_time,
            programmed_duration: self.programmed_duration,
            programmed_temperature: self.programmed_temperature,
        }
    }

    /// Shared branch condition for `stop` and baking completion.
    fn is_above_room_temperature(&self) -> bool {
        self.current_temperature > ROOM_TEMPERATURE
    }

    fn clear_program(&mut self) {
        self.remaining_time = NOT_APPLICABLE;
        self.programmed_duration = NOT_APPLICABLE;
        self.programmed_temperature = NOT_APPLICABLE;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an oven in an arbitrary state without going through the ticks.
    fn oven_with(
        state: OvenState,
        current_temperature: i16,
        remaining_time: i16,
        programmed_duration: i16,
        programmed_temperature: i16,
    ) -> Oven {
        Oven {
            state,
            current_temperature,
            remaining_time,
            programmed_duration,
            programmed_temperature,
        }
    }

    fn preheating_at(temperature: i16) -> Oven {
        oven_with(OvenState::Preheating, temperature, NOT_APPLICABLE, 60, 200)
    }

    #[test]
    fn test_new_oven_is_idle_at_room_temperature() {
        let event = Oven::new().snapshot();
        assert_eq!(event.state, OvenState::Idle);
        assert_eq!(event.current_temperature, 25);
        assert_eq!(event.remaining_time, -1);
        assert_eq!(event.programmed_duration, -1);
        assert_eq!(event.programmed_temperature, -1);
    }

    #[test]
    fn test_idle_tick_changes_nothing() {
        let mut oven = Oven::new();
        let before = oven.snapshot();
        assert_eq!(oven.tick(), before);
    }

    #[test]
    fn test_start_from_idle_begins_preheating() {
        let mut oven = Oven::new();
        oven.apply(&Command::start(180, 600));

        let event = oven.snapshot();
        assert_eq!(event.state, OvenState::Preheating);
        assert_eq!(event.programmed_temperature, 180);
        assert_eq!(event.programmed_duration, 600);
        assert_eq!(event.remaining_time, -1, "remaining stays unset until baking");
        assert_eq!(event.current_temperature, 25);
    }

    #[test]
    fn test_start_while_preheating_is_ignored() {
        let mut oven = preheating_at(40);
        let before = oven.clone();
        oven.apply(&Command::start(250, 5));
        assert_eq!(oven, before);
    }

    #[test]
    fn test_start_while_baking_is_ignored() {
        let mut oven = oven_with(OvenState::Baking, 200, 17, 60, 200);
        let before = oven.clone();
        oven.apply(&Command::start(100, 10));
        assert_eq!(oven, before);
    }

    #[test]
    fn test_start_while_cooling_down_is_ignored() {
        let mut oven = oven_with(OvenState::CoolingDown, 80, -1, -1, -1);
        let before = oven.clone();
        oven.apply(&Command::start(100, 10));
        assert_eq!(oven, before);
    }

    #[test]
    fn test_stop_above_room_temperature_cools_down() {
        let mut oven = preheating_at(75);
        oven.apply(&Command::stop());

        let event = oven.snapshot();
        assert_eq!(event.state, OvenState::CoolingDown);
        assert_eq!(event.current_temperature, 75);
        assert_eq!(event.remaining_time, -1);
        assert_eq!(event.programmed_duration, -1);
        assert_eq!(event.programmed_temperature, -1);
    }

    #[test]
    fn test_stop_at_room_temperature_goes_straight_to_idle() {
        let mut oven = Oven::new();
        oven.apply(&Command::start(100, 10));
        oven.apply(&Command::stop());
        assert_eq!(oven, Oven::new());
    }

    #[test]
    fn test_stop_ignores_payload_parameters() {
        let mut oven = preheating_at(75);
        oven.apply(&Command {
            action: Action::Stop,
            temperature: 999,
            duration: 999,
        });
        assert_eq!(oven.snapshot().programmed_temperature, -1);
        assert_eq!(oven.snapshot().programmed_duration, -1);
    }

    #[test]
    fn test_stop_while_idle_keeps_idle() {
        let mut oven = Oven::new();
        oven.apply(&Command::stop());
        assert_eq!(oven, Oven::new());
    }

    #[test]
    fn test_preheating_increments_until_target() {
        let mut oven = oven_with(OvenState::Preheating, 28, -1, 5, 30);
        assert_eq!(oven.tick().current_temperature, 29);
        assert_eq!(oven.tick().current_temperature, 30);
        let event = oven.tick();
        assert_eq!(event.state, OvenState::Baking);
        assert_eq!(event.current_temperature, 30);
        assert_eq!(event.remaining_time, 5);
    }

    #[test]
    fn test_target_below_current_bakes_on_next_tick() {
        let mut oven = Oven::new();
        oven.apply(&Command::start(10, 2));
        let event = oven.tick();
        assert_eq!(event.state, OvenState::Baking);
        assert_eq!(event.current_temperature, 25, "no heating when already above target");
        assert_eq!(event.remaining_time, 2);
    }

    #[test]
    fn test_zero_duration_program_completes_without_countdown() {
        let mut oven = oven_with(OvenState::Preheating, 30, -1, 0, 30);
        let event = oven.tick();
        assert_eq!(event.state, OvenState::Baking);
        assert_eq!(event.remaining_time, 0);

        let event = oven.tick();
        assert_eq!(event.state, OvenState::CoolingDown);
        assert_eq!(event.programmed_duration, -1);
        assert_eq!(event.programmed_temperature, -1);
    }

    #[test]
    fn test_baking_done_at_room_temperature_resets_to_idle() {
        let mut oven = oven_with(OvenState::Baking, ROOM_TEMPERATURE, 0, 3, 20);
        assert_eq!(oven.tick(), Oven::new().snapshot());
    }

    #[test]
    fn test_baking_done_keeps_remaining_at_zero_while_cooling() {
        let mut oven = oven_with(OvenState::Baking, 40, 0, 3, 40);
        let event = oven.tick();
        assert_eq!(event.state, OvenState::CoolingDown);
        assert_eq!(event.remaining_time, 0);
        assert_eq!(event.current_temperature, 40);
    }

    #[test]
    fn test_cooling_down_decrements_then_idles() {
        let mut oven = oven_with(OvenState::CoolingDown, 27, -1, -1, -1);
        assert_eq!(oven.tick().current_temperature, 26);
        assert_eq!(oven.tick().current_temperature, 25);
        assert_eq!(oven.tick(), Oven::new().snapshot());
    }

    #[test]
    fn test_cooling_below_room_temperature_resets_immediately() {
        let mut oven = oven_with(OvenState::CoolingDown, 10, -1, -1, -1);
        assert_eq!(oven.tick(), Oven::new().snapshot());
    }

    #[test]
    fn test_tick_returns_post_tick_snapshot() {
        let mut oven = preheating_at(100);
        let event = oven.tick();
        assert_eq!(event, oven.snapshot());
        assert_eq!(event.current_temperature, 101);
    }

    #[test]
    fn test_preheating_to_max_target_does_not_overflow() {
        let mut oven = oven_with(OvenState::Preheating, i16::MAX - 1, -1, 1, i16::MAX);
        assert_eq!(oven.tick().current_temperature, i16::MAX);
        assert_eq!(oven.tick().state, OvenState::Baking);
    }
}
