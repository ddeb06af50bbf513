//! Handwave Gesture Core: the interpreter
//!
//! Turns per-frame hand landmark sets into outbound events:
//! - **Cursor Smoothing:** Exponential smoothing of the index fingertip
//! - **Scroll Classification:** Finger-posture rules for scroll up/down/stop
//! - **Swipe Navigation:** Wrist displacement with a frame cooldown
//!
//! This crate is pure computation. It does no I/O and touches no camera or socket.
//! All inputs are data; all outputs are data.

pub mod cursor_smooth;
pub mod interpreter;
pub mod scroll;
pub mod swipe;

pub use cursor_smooth::{CursorSmoother, SmoothingAlgorithm};
pub use interpreter::{GestureInterpreter, InterpreterConfig, SessionState};
pub use scroll::{classify_scroll, ScrollThresholds};
pub use swipe::{SwipeConfig, SwipeTracker};
