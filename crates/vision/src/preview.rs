//! Preview window abstraction.

use handwave_common::error::HandwaveResult;

use crate::frame::Frame;

/// A local display for annotated frames.
pub trait PreviewSink: Send {
    /// Display a frame.
    fn show(&mut self, frame: &Frame) -> HandwaveResult<()>;

    /// Poll the window for the quit key. Called once per frame after `show`.
    fn quit_requested(&mut self) -> HandwaveResult<bool>;

    /// Close the window. Must be idempotent.
    fn close(&mut self);

    /// Whether frames shown here should carry the landmark overlay.
    fn wants_overlay(&self) -> bool {
        true
    }
}

/// Headless preview. Counts frames and can simulate a quit key press.
#[derive(Debug, Default)]
pub struct NullPreview {
    shown: u64,
    quit_after: Option<u64>,
}

impl NullPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the quit key once `frames` frames have been shown.
    pub fn quit_after(frames: u64) -> Self {
        Self {
            quit_after: Some(frames),
            ..Self::default()
        }
    }

    pub fn frames_shown(&self) -> u64 {
        self.shown
    }
}

impl PreviewSink for NullPreview {
    fn show(&mut self, _frame: &Frame) -> HandwaveResult<()> {
        self.shown += 1;
        Ok(())
    }

    fn quit_requested(&mut self) -> HandwaveResult<bool> {
        Ok(self.quit_after.is_some_and(|n| self.shown >= n))
    }

    fn close(&mut self) {}

    fn wants_overlay(&self) -> bool {
        false
    }
}
