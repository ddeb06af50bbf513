//! Per-frame gesture interpretation.
//!
//! For each frame with a detected hand the interpreter, in order:
//! 1. smooths the index fingertip and emits `CURSOR`,
//! 2. classifies finger posture and may emit `SCROLL`,
//! 3. tracks the wrist and may emit `GESTURE`.
//!
//! Frames without a hand produce no events and leave the session state
//! untouched.

use handwave_common::config::GestureConfig;
use handwave_gesture_model::event::GestureEvent;
use handwave_gesture_model::landmark::LandmarkSet;

use crate::cursor_smooth::{CursorSmoother, SmoothingAlgorithm};
use crate::scroll::{classify_scroll, ScrollThresholds};
use crate::swipe::{SwipeConfig, SwipeTracker};

/// Tunables for one interpreter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpreterConfig {
    pub smoothing: SmoothingAlgorithm,
    pub scroll: ScrollThresholds,
    pub swipe: SwipeConfig,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingAlgorithm::Ema { alpha: 0.2 },
            scroll: ScrollThresholds::default(),
            swipe: SwipeConfig::default(),
        }
    }
}

impl From<&GestureConfig> for InterpreterConfig {
    fn from(config: &GestureConfig) -> Self {
        Self {
            smoothing: CursorSmoother::algorithm_from_config(config),
            scroll: ScrollThresholds::from(config),
            swipe: SwipeConfig::from(config),
        }
    }
}

/// Mutable state carried between frames of one client session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    smoother: CursorSmoother,
    swipe: SwipeTracker,
}

impl SessionState {
    pub fn new(config: &InterpreterConfig) -> Self {
        Self {
            smoother: CursorSmoother::new(config.smoothing),
            swipe: SwipeTracker::new(config.swipe),
        }
    }

    /// Current smoothed cursor position.
    pub fn cursor(&self) -> (f64, f64) {
        self.smoother.position()
    }

    /// Wrist x from the last hand frame, if any.
    pub fn prev_wrist_x(&self) -> Option<f64> {
        self.swipe.prev_wrist_x()
    }

    /// Remaining swipe cooldown in hand frames.
    pub fn cooldown(&self) -> u32 {
        self.swipe.cooldown()
    }
}

/// Converts landmark sets into outbound events for one session.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    config: InterpreterConfig,
    state: SessionState,
}

impl GestureInterpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            state: SessionState::new(&config),
            config,
        }
    }

    /// Interpreter with the stock thresholds.
    pub fn with_defaults() -> Self {
        Self::new(InterpreterConfig::default())
    }

    /// Interpret one camera frame's detection result.
    pub fn process_frame(&mut self, hand: Option<&LandmarkSet>) -> Vec<GestureEvent> {
        match hand {
            Some(hand) => self.process_hand(hand),
            None => Vec::new(),
        }
    }

    /// Interpret a frame in which a hand was detected.
    pub fn process_hand(&mut self, hand: &LandmarkSet) -> Vec<GestureEvent> {
        let mut events = Vec::with_capacity(3);

        let tip = hand.index_tip();
        let (x, y) = self.state.smoother.update(tip.x, tip.y);
        events.push(GestureEvent::cursor(x, y));

        if let Some(dir) = classify_scroll(hand, &self.config.scroll) {
            tracing::trace!(%dir, "Scroll posture");
            events.push(GestureEvent::scroll(dir));
        }

        if let Some(action) = self.state.swipe.update(hand.wrist().x) {
            tracing::debug!(
                %action,
                cooldown = self.state.swipe.cooldown(),
                "Swipe detected"
            );
            events.push(GestureEvent::gesture(action));
        }

        events
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handwave_gesture_model::event::{NavAction, ScrollDirection};
    use handwave_gesture_model::landmark::{INDEX_MCP, INDEX_TIP, WRIST};

    /// Relaxed open hand: no scroll rule matches.
    fn neutral_hand(wrist_x: f64) -> LandmarkSet {
        LandmarkSet::splat(0.5, 0.5)
            .with(WRIST, wrist_x, 0.9)
            .with(INDEX_MCP, 0.5, 0.60)
            .with(INDEX_TIP, 0.5, 0.57)
    }

    #[test]
    fn test_hand_always_emits_cursor_first() {
        let mut interpreter = GestureInterpreter::with_defaults();
        let events = interpreter.process_frame(Some(&neutral_hand(0.5)));
        assert_eq!(events.len(), 1);
        match events[0] {
            GestureEvent::Cursor { x, y } => {
                assert!((x - 0.1).abs() < 1e-12);
                assert!((y - 0.114).abs() < 1e-12);
            }
            other => panic!("expected cursor, got {other:?}"),
        }
    }

    #[test]
    fn test_no_hand_leaves_state_untouched() {
        let mut interpreter = GestureInterpreter::with_defaults();
        interpreter.process_frame(Some(&neutral_hand(0.30)));
        interpreter.process_frame(Some(&neutral_hand(0.50)));
        let before = interpreter.state().clone();
        assert_eq!(before.cooldown(), 25);

        for _ in 0..10 {
            assert!(interpreter.process_frame(None).is_empty());
        }
        assert_eq!(interpreter.state(), &before);
    }

    #[test]
    fn test_event_order_is_cursor_scroll_gesture() {
        let mut interpreter = GestureInterpreter::with_defaults();
        interpreter.process_frame(Some(&neutral_hand(0.30)));

        // Raised index (STOP) and a rightward swipe in the same frame
        let hand = neutral_hand(0.50).with(INDEX_TIP, 0.5, 0.30);
        let events = interpreter.process_frame(Some(&hand));
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind(), "CURSOR");
        assert_eq!(events[1], GestureEvent::scroll(ScrollDirection::Stop));
        assert_eq!(events[2], GestureEvent::gesture(NavAction::Next));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = GestureInterpreter::with_defaults();
        let mut b = GestureInterpreter::with_defaults();
        a.process_frame(Some(&neutral_hand(0.30)));
        a.process_frame(Some(&neutral_hand(0.50)));
        assert_eq!(a.state().cooldown(), 25);
        assert_eq!(b.state().cooldown(), 0);
        assert_eq!(b.state().cursor(), (0.0, 0.0));

        b.process_frame(Some(&neutral_hand(0.9)));
        assert_eq!(b.state().prev_wrist_x(), Some(0.9));
        assert_eq!(a.state().prev_wrist_x(), Some(0.50));
    }

    #[test]
    fn test_config_from_gesture_settings() {
        let settings = GestureConfig {
            swipe_threshold: 0.3,
            swipe_cooldown_frames: 5,
            ..GestureConfig::default()
        };
        let config = InterpreterConfig::from(&settings);
        assert_eq!(config.swipe.threshold, 0.3);
        assert_eq!(config.swipe.cooldown_frames, 5);
        assert_eq!(config.smoothing, SmoothingAlgorithm::Ema { alpha: 0.2 });
    }
}
