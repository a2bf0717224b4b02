//! JSON message types for the browser-facing WebSocket protocol.
//!
//! The oven speaks compact binary frames; browsers speak JSON.  The platform
//! exposes a small JSON protocol on its WebSocket and translates in both
//! directions (see [`crate::application`]).
//!
//! # Message flow
//!
//! ```text
//! Browser  → Platform: JSON text frame → BrowserToPlatformMsg
//! Platform → Browser:  Event / reply   → PlatformToBrowserMsg → JSON text frame
//! ```
//!
//! # JSON discriminant
//!
//! Every message is a JSON object with a `"type"` field naming the variant in
//! snake case.  All other fields sit in the same object:
//!
//! ```json
//! {"type":"start","temperature":180,"duration":60}
//! ```

use serde::{Deserialize, Serialize};

// ── Browser → Platform messages ───────────────────────────────────────────────

/// All messages a browser can send to the platform.
///
/// ```json
/// {"type":"start","temperature":180,"duration":60}
/// {"type":"stop"}
/// {"type":"health"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserToPlatformMsg {
    /// Start a baking program.
    ///
    /// The fields are wider than the wire's signed 16-bit values so that an
    /// out-of-range request reaches the translator and gets a clear error
    /// instead of a generic JSON failure.
    Start {
        /// Target temperature in degrees Celsius.
        temperature: i64,
        /// Bake time in seconds.
        duration: i64,
    },

    /// Abort the current program.
    Stop,

    /// Ask whether the device link is up and how many browsers are connected.
    Health,
}

// ── Platform → Browser messages ───────────────────────────────────────────────

/// All messages the platform sends to browsers.
///
/// ```json
/// {"type":"event","state":"PREHEATING","current_temperature":"30°C","remaining_time":"--","programmed_duration":"60s","programmed_temperature":"180°C"}
/// {"type":"health","status":true,"websocket_clients":2}
/// {"type":"ack","status":"success"}
/// {"type":"error","message":"device not connected"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformToBrowserMsg {
    /// One oven tick, pre-formatted for display.
    Event {
        /// `IDLE`, `PREHEATING`, `BAKING` or `COOLING_DOWN`.
        state: String,
        /// e.g. `"30°C"`, or `"--"` when not applicable.
        current_temperature: String,
        /// e.g. `"42s"`, or `"--"` when not baking.
        remaining_time: String,
        /// e.g. `"60s"`, or `"Not set"` when no program is active.
        programmed_duration: String,
        /// e.g. `"180°C"`, or `"Not set"` when no program is active.
        programmed_temperature: String,
    },

    /// Reply to [`BrowserToPlatformMsg::Health`].
    Health {
        /// `true` while the device link is connected.
        status: bool,
        /// Number of browser sessions currently attached.
        websocket_clients: usize,
    },

    /// A command was handed to the device link.
    Ack {
        /// Always `"success"`.
        status: String,
    },

    /// A request could not be parsed, validated or delivered.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl PlatformToBrowserMsg {
    /// The acknowledgement sent after a command was forwarded.
    pub fn success() -> Self {
        Self::Ack {
            status: "success".to_string(),
        }
    }

    /// An error reply carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_parses_from_json() {
        // Arrange
        let text = r#"{"type":"start","temperature":180,"duration":60}"#;

        // Act
        let msg: BrowserToPlatformMsg = serde_json::from_str(text).unwrap();

        // Assert
        assert_eq!(
            msg,
            BrowserToPlatformMsg::Start {
                temperature: 180,
                duration: 60
            }
        );
    }

    #[test]
    fn test_stop_and_health_parse_without_fields() {
        let stop: BrowserToPlatformMsg = serde_json::from_str(r#"{"type":"stop"}"#).unwrap();
        let health: BrowserToPlatformMsg = serde_json::from_str(r#"{"type":"health"}"#).unwrap();
        assert_eq!(stop, BrowserToPlatformMsg::Stop);
        assert_eq!(health, BrowserToPlatformMsg::Health);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_str::<BrowserToPlatformMsg>(r#"{"type":"bake"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_start_missing_duration_is_rejected() {
        let result =
            serde_json::from_str::<BrowserToPlatformMsg>(r#"{"type":"start","temperature":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_event_serializes_with_snake_case_tag() {
        // Arrange
        let msg = PlatformToBrowserMsg::Event {
            state: "BAKING".into(),
            current_temperature: "180°C".into(),
            remaining_time: "42s".into(),
            programmed_duration: "60s".into(),
            programmed_temperature: "180°C".into(),
        };

        // Act
        let value = serde_json::to_value(&msg).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({
                "type": "event",
                "state": "BAKING",
                "current_temperature": "180°C",
                "remaining_time": "42s",
                "programmed_duration": "60s",
                "programmed_temperature": "180°C"
            })
        );
    }

    #[test]
    fn test_health_serializes() {
        let msg = PlatformToBrowserMsg::Health {
            status: true,
            websocket_clients: 2,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "health", "status": true, "websocket_clients": 2})
        );
    }

    #[test]
    fn test_success_ack_serializes() {
        assert_eq!(
            serde_json::to_value(PlatformToBrowserMsg::success()).unwrap(),
            json!({"type": "ack", "status": "success"})
        );
    }

    #[test]
    fn test_error_serializes() {
        assert_eq!(
            serde_json::to_value(PlatformToBrowserMsg::error("nope")).unwrap(),
            json!({"type": "error", "message": "nope"})
        );
    }
}
