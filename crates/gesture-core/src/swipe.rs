//! Swipe navigation from wrist displacement.
//!
//! A swipe is a horizontal wrist jump larger than the threshold between two
//! consecutive hand frames. After a swipe fires, the next `cooldown_frames`
//! hand frames cannot fire another one. Frames without a hand are never fed
//! to the tracker, so they neither advance the cooldown nor reset the
//! previous wrist position.

use handwave_common::config::GestureConfig;
use handwave_gesture_model::event::NavAction;

/// Swipe detection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// Minimum absolute wrist x travel between two hand frames.
    pub threshold: f64,
    /// Hand frames suppressed after a swipe fires.
    pub cooldown_frames: u32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            cooldown_frames: 25,
        }
    }
}

impl From<&GestureConfig> for SwipeConfig {
    fn from(config: &GestureConfig) -> Self {
        Self {
            threshold: config.swipe_threshold,
            cooldown_frames: config.swipe_cooldown_frames,
        }
    }
}

/// Tracks the wrist across hand frames.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeTracker {
    config: SwipeConfig,
    prev_wrist_x: Option<f64>,
    cooldown: u32,
}

impl SwipeTracker {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            prev_wrist_x: None,
            cooldown: 0,
        }
    }

    /// Resume from a known state.
    pub fn from_state(config: SwipeConfig, prev_wrist_x: Option<f64>, cooldown: u32) -> Self {
        Self {
            config,
            prev_wrist_x,
            cooldown,
        }
    }

    /// Feed the wrist x of the current hand frame.
    pub fn update(&mut self, wrist_x: f64) -> Option<NavAction> {
        let mut action = None;

        if self.cooldown > 0 {
            self.cooldown -= 1;
        } else if let Some(prev) = self.prev_wrist_x {
            let diff = wrist_x - prev;
            if diff.abs() > self.config.threshold {
                action = Some(if diff > 0.0 {
                    NavAction::Next
                } else {
                    NavAction::Back
                });
                self.cooldown = self.config.cooldown_frames;
            }
        }

        self.prev_wrist_x = Some(wrist_x);
        action
    }

    pub fn prev_wrist_x(&self) -> Option<f64> {
        self.prev_wrist_x
    }

    /// Remaining suppressed hand frames.
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_never_swipes() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.update(0.9), None);
        assert_eq!(tracker.prev_wrist_x(), Some(0.9));
        assert_eq!(tracker.cooldown(), 0);
    }

    #[test]
    fn test_rightward_jump_is_next_and_starts_cooldown() {
        let mut tracker = SwipeTracker::from_state(SwipeConfig::default(), Some(0.30), 0);
        assert_eq!(tracker.update(0.50), Some(NavAction::Next));
        assert_eq!(tracker.cooldown(), 25);
        assert_eq!(tracker.prev_wrist_x(), Some(0.50));
    }

    #[test]
    fn test_leftward_jump_is_back() {
        let mut tracker = SwipeTracker::from_state(SwipeConfig::default(), Some(0.50), 0);
        assert_eq!(tracker.update(0.30), Some(NavAction::Back));
        assert_eq!(tracker.cooldown(), 25);
    }

    #[test]
    fn test_cooldown_suppresses_next_25_frames() {
        let mut tracker = SwipeTracker::from_state(SwipeConfig::default(), Some(0.30), 0);
        assert_eq!(tracker.update(0.50), Some(NavAction::Next));

        // Every following frame jumps by 0.4, which would qualify on its own
        let mut x = 0.50;
        for frame in 0..25 {
            x = if x > 0.5 { 0.2 } else { 0.6 };
            assert_eq!(tracker.update(x), None, "frame {frame} should be suppressed");
        }
        assert_eq!(tracker.cooldown(), 0);

        let next = if x > 0.5 { 0.2 } else { 0.6 };
        assert!(tracker.update(next).is_some());
    }

    #[test]
    fn test_previous_wrist_tracks_through_cooldown() {
        let mut tracker = SwipeTracker::from_state(SwipeConfig::default(), Some(0.30), 3);
        tracker.update(0.35);
        tracker.update(0.40);
        assert_eq!(tracker.prev_wrist_x(), Some(0.40));
        assert_eq!(tracker.cooldown(), 1);
    }

    #[test]
    fn test_small_moves_do_not_swipe() {
        let mut tracker = SwipeTracker::default();
        for x in [0.40, 0.50, 0.60, 0.70, 0.60, 0.50] {
            assert_eq!(tracker.update(x), None);
        }
        assert_eq!(tracker.cooldown(), 0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = SwipeConfig {
            threshold: 0.25,
            cooldown_frames: 25,
        };
        let mut tracker = SwipeTracker::from_state(config, Some(0.25), 0);
        assert_eq!(tracker.update(0.5), None);
    }
}
