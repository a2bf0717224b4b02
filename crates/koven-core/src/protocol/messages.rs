//! Koven protocol message types.
//!
//! Two message kinds travel on the wire: a [`Command`] sent to the oven and an
//! [`Event`] sent by the oven once per tick.  Both are fixed-size payloads
//! wrapped in the same frame shape (see [`crate::protocol::codec`]).
//!
//! # The −1 sentinel (for beginners)
//!
//! Every numeric field of an [`Event`] is a signed 16-bit integer.  A value of
//! [`NOT_APPLICABLE`] (−1) means "this field has no meaning in the current
//! state", for example the remaining time while the oven is still heating.
//! The wire format cannot tell a sentinel apart from a real −1, so the typed
//! accessors on [`Event`] map the sentinel to `None` for display code.

// ── Protocol constants ────────────────────────────────────────────────────────

/// Message-kind byte for a [`Command`] frame.
pub const MSG_TYPE_COMMAND: u8 = 0x01;

/// Message-kind byte for an [`Event`] frame.
pub const MSG_TYPE_EVENT: u8 = 0x02;

/// Size of the frame header: kind (1) + payload length (2).
pub const HEADER_SIZE: usize = 3;

/// Size of the trailing checksum.
pub const CHECKSUM_SIZE: usize = 2;

/// Fixed command payload size: action (1) + temperature (2) + duration (2).
pub const COMMAND_PAYLOAD_SIZE: usize = 5;

/// Fixed event payload size: state (1) + four signed 16-bit fields.
pub const EVENT_PAYLOAD_SIZE: usize = 9;

/// Total size of an encoded command frame (10 bytes).
pub const COMMAND_FRAME_SIZE: usize = HEADER_SIZE + COMMAND_PAYLOAD_SIZE + CHECKSUM_SIZE;

/// Total size of an encoded event frame (14 bytes).
pub const EVENT_FRAME_SIZE: usize = HEADER_SIZE + EVENT_PAYLOAD_SIZE + CHECKSUM_SIZE;

/// Sentinel meaning "field not applicable in the current state".
pub const NOT_APPLICABLE: i16 = -1;

// ── Action ────────────────────────────────────────────────────────────────────

/// What a [`Command`] asks the oven to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    /// Begin a baking program (preheat, bake, cool down).
    Start = 0x01,
    /// Abort whatever is running.
    Stop = 0x02,
}

impl TryFrom<u8> for Action {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Action::Start),
            0x02 => Ok(Action::Stop),
            _ => Err(()),
        }
    }
}

impl Action {
    /// Lower-case name used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Oven state ────────────────────────────────────────────────────────────────

/// Discrete operating state of the oven, as carried in an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum OvenState {
    #[default]
    Idle = 0x00,
    Preheating = 0x01,
    Baking = 0x02,
    CoolingDown = 0x03,
}

impl TryFrom<u8> for OvenState {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(OvenState::Idle),
            0x01 => Ok(OvenState::Preheating),
            0x02 => Ok(OvenState::Baking),
            0x03 => Ok(OvenState::CoolingDown),
            _ => Err(()),
        }
    }
}

impl OvenState {
    /// Lower-case name used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            OvenState::Idle => "idle",
            OvenState::Preheating => "preheating",
            OvenState::Baking => "baking",
            OvenState::CoolingDown => "cooling down",
        }
    }
}

impl std::fmt::Display for OvenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Payloads ──────────────────────────────────────────────────────────────────

/// COMMAND (0x01): sent to the oven.
///
/// `temperature` is in degrees Celsius and `duration` in seconds.  Both are
/// ignored by the oven for [`Action::Stop`], but they are still carried on
/// the wire so a frame round-trips exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command {
    pub action: Action,
    pub temperature: i16,
    pub duration: i16,
}

impl Command {
    /// Builds a start command for the given target temperature and bake time.
    pub fn start(temperature: i16, duration: i16) -> Self {
        Self {
            action: Action::Start,
            temperature,
            duration,
        }
    }

    /// Builds a stop command.  Temperature and duration are zeroed.
    pub fn stop() -> Self {
        Self {
            action: Action::Stop,
            temperature: 0,
            duration: 0,
        }
    }
}

/// EVENT (0x02): snapshot of the oven sent once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub state: OvenState,
    /// Current temperature in degrees Celsius.
    pub current_temperature: i16,
    /// Seconds of baking left, or [`NOT_APPLICABLE`] outside the baking phase.
    pub remaining_time: i16,
    /// Programmed bake time in seconds, or [`NOT_APPLICABLE`].
    pub programmed_duration: i16,
    /// Programmed target temperature, or [`NOT_APPLICABLE`].
    pub programmed_temperature: i16,
}

impl Event {
    /// Current temperature, or `None` when the sentinel is present.
    pub fn current_temperature(&self) -> Option<i16> {
        applicable(self.current_temperature)
    }

    /// Remaining bake time, or `None` when not applicable.
    pub fn remaining_time(&self) -> Option<i16> {
        applicable(self.remaining_time)
    }

    /// Programmed bake time, or `None` when no program is set.
    pub fn programmed_duration(&self) -> Option<i16> {
        applicable(self.programmed_duration)
    }

    /// Programmed target temperature, or `None` when no program is set.
    pub fn programmed_temperature(&self) -> Option<i16> {
        applicable(self.programmed_temperature)
    }
}

fn applicable(value: i16) -> Option<i16> {
    (value != NOT_APPLICABLE).then_some(value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_sizes_match_wire_layout() {
        assert_eq!(COMMAND_FRAME_SIZE, 10);
        assert_eq!(EVENT_FRAME_SIZE, 14);
    }

    #[test]
    fn test_action_try_from_known_codes() {
        assert_eq!(Action::try_from(1), Ok(Action::Start));
        assert_eq!(Action::try_from(2), Ok(Action::Stop));
    }

    #[test]
    fn test_action_try_from_rejects_unknown_codes() {
        for code in [0u8, 3, 0x7F, 0xFF] {
            assert!(Action::try_from(code).is_err(), "code {code} must be rejected");
        }
    }

    #[test]
    fn test_oven_state_codes_round_trip_through_u8() {
        for state in [
            OvenState::Idle,
            OvenState::Preheating,
            OvenState::Baking,
            OvenState::CoolingDown,
        ] {
            assert_eq!(OvenState::try_from(state as u8), Ok(state));
        }
        assert!(OvenState::try_from(4).is_err());
    }

    #[test]
    fn test_stop_command_zeroes_parameters() {
        let cmd = Command::stop();
        assert_eq!(cmd.action, Action::Stop);
        assert_eq!(cmd.temperature, 0);
        assert_eq!(cmd.duration, 0);
    }

    #[test]
    fn test_event_accessors_hide_sentinel() {
        let event = Event {
            state: OvenState::Preheating,
            current_temperature: 40,
            remaining_time: NOT_APPLICABLE,
            programmed_duration: 60,
            programmed_temperature: NOT_APPLICABLE,
        };
        assert_eq!(event.current_temperature(), Some(40));
        assert_eq!(event.remaining_time(), None);
        assert_eq!(event.programmed_duration(), Some(60));
        assert_eq!(event.programmed_temperature(), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(OvenState::CoolingDown.to_string(), "cooling down");
        assert_eq!(Action::Start.to_string(), "start");
    }
}
