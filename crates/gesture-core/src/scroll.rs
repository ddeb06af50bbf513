//! Scroll classification from finger posture.
//!
//! Y grows downward, so "tip.y > joint.y" means the fingertip is folded
//! below its knuckle. Rules are evaluated in order and the first match wins:
//!
//! 1. thumb tip below thumb IP by more than the thumb margin, and index tip
//!    below index MCP → `DOWN`
//! 2. index tip below index MCP, and middle tip below middle MCP → `UP`
//! 3. index tip above index MCP by more than the stop margin → `STOP`
//! 4. otherwise no scroll event
//!
//! Rules 1 and 2 overlap (a folded thumb with folded index and middle
//! fingers satisfies both); ordering alone decides, so `DOWN` wins.

use handwave_common::config::GestureConfig;
use handwave_gesture_model::event::ScrollDirection;
use handwave_gesture_model::landmark::{
    LandmarkSet, INDEX_MCP, INDEX_TIP, MIDDLE_MCP, MIDDLE_TIP, THUMB_IP, THUMB_TIP,
};

/// Margins used by the scroll rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollThresholds {
    /// How far the thumb tip must sit below the thumb IP joint for `DOWN`.
    pub thumb_margin: f64,
    /// How far the index tip must sit above the index MCP joint for `STOP`.
    pub stop_margin: f64,
}

impl Default for ScrollThresholds {
    fn default() -> Self {
        Self {
            thumb_margin: 0.05,
            stop_margin: 0.05,
        }
    }
}

impl From<&GestureConfig> for ScrollThresholds {
    fn from(config: &GestureConfig) -> Self {
        Self {
            thumb_margin: config.scroll_thumb_margin,
            stop_margin: config.scroll_stop_margin,
        }
    }
}

/// Classify the scroll intent of one hand.
pub fn classify_scroll(hand: &LandmarkSet, thresholds: &ScrollThresholds) -> Option<ScrollDirection> {
    let thumb_tip = hand[THUMB_TIP].y;
    let thumb_ip = hand[THUMB_IP].y;
    let index_tip = hand[INDEX_TIP].y;
    let index_mcp = hand[INDEX_MCP].y;
    let middle_tip = hand[MIDDLE_TIP].y;
    let middle_mcp = hand[MIDDLE_MCP].y;

    if thumb_tip > thumb_ip + thresholds.thumb_margin && index_tip > index_mcp {
        Some(ScrollDirection::Down)
    } else if index_tip > index_mcp && middle_tip > middle_mcp {
        Some(ScrollDirection::Up)
    } else if index_tip < index_mcp - thresholds.stop_margin {
        Some(ScrollDirection::Stop)
    } else {
        None
    }
}
