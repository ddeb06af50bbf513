//! Outbound gesture events.
//!
//! Each event is sent to the client as one flat JSON object in a WebSocket
//! text frame, discriminated by an upper-case `type` field:
//!
//! ```text
//! {"type":"CURSOR","x":0.41,"y":0.63}
//! {"type":"SCROLL","dir":"DOWN"}
//! {"type":"GESTURE","action":"NEXT"}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminated union of events sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum GestureEvent {
    /// Smoothed index-fingertip position.
    Cursor {
        /// Normalized X coordinate [0.0, 1.0].
        x: f64,
        /// Normalized Y coordinate [0.0, 1.0].
        y: f64,
    },

    /// Scroll state change requested by finger posture.
    Scroll { dir: ScrollDirection },

    /// Page navigation triggered by a horizontal wrist swipe.
    Gesture { action: NavAction },
}

/// Scroll direction carried by [`GestureEvent::Scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScrollDirection {
    Up,
    Down,
    Stop,
}

/// Navigation action carried by [`GestureEvent::Gesture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NavAction {
    Next,
    Back,
}

impl GestureEvent {
    pub fn cursor(x: f64, y: f64) -> Self {
        Self::Cursor { x, y }
    }

    pub fn scroll(dir: ScrollDirection) -> Self {
        Self::Scroll { dir }
    }

    pub fn gesture(action: NavAction) -> Self {
        Self::Gesture { action }
    }

    /// Wire `type` tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cursor { .. } => "CURSOR",
            Self::Scroll { .. } => "SCROLL",
            Self::Gesture { .. } => "GESTURE",
        }
    }

    /// Serialize to the single-line JSON text sent over the wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Stop => "STOP",
        })
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Next => "NEXT",
            Self::Back => "BACK",
        })
    }
}

/// Parse one wire message back into an event.
pub fn parse_event(text: &str) -> Result<GestureEvent, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wire_format() {
        let json = GestureEvent::cursor(0.5, 0.25).to_json().unwrap();
        assert_eq!(json, r#"{"type":"CURSOR","x":0.5,"y":0.25}"#);
    }

    #[test]
    fn test_scroll_wire_format() {
        assert_eq!(
            GestureEvent::scroll(ScrollDirection::Down).to_json().unwrap(),
            r#"{"type":"SCROLL","dir":"DOWN"}"#
        );
        assert_eq!(
            GestureEvent::scroll(ScrollDirection::Up).to_json().unwrap(),
            r#"{"type":"SCROLL","dir":"UP"}"#
        );
        assert_eq!(
            GestureEvent::scroll(ScrollDirection::Stop).to_json().unwrap(),
            r#"{"type":"SCROLL","dir":"STOP"}"#
        );
    }

    #[test]
    fn test_gesture_wire_format() {
        assert_eq!(
            GestureEvent::gesture(NavAction::Next).to_json().unwrap(),
            r#"{"type":"GESTURE","action":"NEXT"}"#
        );
        assert_eq!(
            GestureEvent::gesture(NavAction::Back).to_json().unwrap(),
            r#"{"type":"GESTURE","action":"BACK"}"#
        );
    }

    #[test]
    fn test_parse_client_visible_messages() {
        let event = parse_event(r#"{"type":"GESTURE","action":"BACK"}"#).unwrap();
        assert_eq!(event, GestureEvent::gesture(NavAction::Back));

        assert!(parse_event(r#"{"type":"SCROLL","dir":"SIDEWAYS"}"#).is_err());
        assert!(parse_event(r#"{"type":"cursor","x":0.1,"y":0.1}"#).is_err());
    }

    #[test]
    fn test_kind_matches_type_tag() {
        for event in [
            GestureEvent::cursor(0.0, 0.0),
            GestureEvent::scroll(ScrollDirection::Stop),
            GestureEvent::gesture(NavAction::Next),
        ] {
            let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
            assert_eq!(value["type"], event.kind());
        }
    }

    #[test]
    fn test_display_matches_wire_values() {
        assert_eq!(ScrollDirection::Down.to_string(), "DOWN");
        assert_eq!(NavAction::Back.to_string(), "BACK");
    }
}
