//! The per-session frame loop.
//!
//! One pipeline owns one camera, one detector, one preview and one gesture
//! interpreter. It runs on a blocking thread until the camera closes, the
//! preview's quit key is pressed, the stop flag is raised, or the source,
//! detector or event sink fails. The camera and preview are released on every one of those paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use handwave_common::clock::{FrameRateMeter, SessionClock};
use handwave_common::config::CameraConfig;
use handwave_common::error::HandwaveResult;
use handwave_gesture_core::GestureInterpreter;
use handwave_gesture_model::GestureEvent;

use crate::detector::LandmarkDetector;
use crate::frame::Frame;
use crate::overlay::{draw_landmarks, OverlayStyle};
use crate::preview::PreviewSink;
use crate::source::FrameSource;

/// Destination for interpreted events.
///
/// An error from `send` ends the session.
pub trait EventSink {
    fn send(&mut self, event: GestureEvent) -> HandwaveResult<()>;
}

impl EventSink for Vec<GestureEvent> {
    fn send(&mut self, event: GestureEvent) -> HandwaveResult<()> {
        self.push(event);
        Ok(())
    }
}

/// Loop timing and overlay settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Sleep after a read that returned no frame.
    pub idle_delay: Duration,
    /// Sleep after each processed frame.
    pub frame_delay: Duration,
    pub overlay: OverlayStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

impl From<&CameraConfig> for PipelineConfig {
    fn from(config: &CameraConfig) -> Self {
        Self {
            idle_delay: Duration::from_millis(config.idle_delay_ms),
            frame_delay: Duration::from_millis(config.frame_delay_ms),
            overlay: OverlayStyle::default(),
        }
    }
}

impl PipelineConfig {
    /// No sleeping at all. Used for replays and tests.
    pub fn unthrottled() -> Self {
        Self {
            idle_delay: Duration::ZERO,
            frame_delay: Duration::ZERO,
            overlay: OverlayStyle::default(),
        }
    }
}

/// Why a pipeline run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineExit {
    /// The frame source stopped delivering.
    SourceClosed,
    /// The quit key was pressed in the preview.
    QuitRequested,
    /// The stop flag was raised from outside.
    Stopped,
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    /// Frames that went through detection.
    pub frames_processed: u64,

    /// Reads that returned no frame.
    pub frames_skipped: u64,

    /// Processed frames with a detected hand.
    pub hand_frames: u64,

    /// Events handed to the sink.
    pub events_emitted: u64,
}

impl PipelineStats {
    /// Share of processed frames that contained a hand, as a percentage.
    pub fn hand_rate(&self) -> f64 {
        if self.frames_processed == 0 {
            return 0.0;
        }
        self.hand_frames as f64 / self.frames_processed as f64 * 100.0
    }
}

pub struct FramePipeline {
    source: Box<dyn FrameSource>,
    detector: Box<dyn LandmarkDetector>,
    preview: Box<dyn PreviewSink>,
    interpreter: GestureInterpreter,
    config: PipelineConfig,
    stop_flag: Arc<AtomicBool>,
    stats: PipelineStats,
}

impl FramePipeline {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn LandmarkDetector>,
        preview: Box<dyn PreviewSink>,
        interpreter: GestureInterpreter,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            detector,
            preview,
            interpreter,
            config,
            stop_flag: Arc::new(AtomicBool::new(false)),
            stats: PipelineStats::default(),
        }
    }

    /// Share an existing stop flag instead of the pipeline's own.
    pub fn with_stop_flag(mut self, stop_flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = stop_flag;
        self
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn interpreter(&self) -> &GestureInterpreter {
        &self.interpreter
    }

    /// Run until the session ends, then release the camera and preview.
    pub fn run(&mut self, sink: &mut dyn EventSink) -> HandwaveResult<PipelineExit> {
        let clock = SessionClock::start();
        tracing::info!(
            source = %self.source.name(),
            detector = %self.detector.name(),
            started_at = %clock.epoch_wall(),
            "Frame pipeline started"
        );

        let result = self.run_loop(&clock, sink);
        let duration_secs = clock.elapsed_secs();

        self.source.release();
        self.preview.close();

        match &result {
            Ok(exit) => tracing::info!(
                exit = ?exit,
                frames = self.stats.frames_processed,
                skipped = self.stats.frames_skipped,
                events = self.stats.events_emitted,
                duration_secs,
                "Frame pipeline stopped"
            ),
            Err(e) if e.is_disconnect() => tracing::info!(
                reason = %e,
                frames = self.stats.frames_processed,
                duration_secs,
                "Frame pipeline stopped, client went away"
            ),
            Err(e) => tracing::error!(
                error = %e,
                frames = self.stats.frames_processed,
                duration_secs,
                "Frame pipeline failed"
            ),
        }
        result
    }

    fn run_loop(
        &mut self,
        clock: &SessionClock,
        sink: &mut dyn EventSink,
    ) -> HandwaveResult<PipelineExit> {
        let mut meter = FrameRateMeter::per_second();

        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                return Ok(PipelineExit::Stopped);
            }
            if !self.source.is_open() {
                return Ok(PipelineExit::SourceClosed);
            }

            let frame = match self.source.read() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    self.stats.frames_skipped += 1;
                    pause(self.config.idle_delay);
                    continue;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Frame source failed, ending session");
                    return Err(e);
                }
            };

            if self.process_frame(frame, sink)? {
                return Ok(PipelineExit::QuitRequested);
            }

            if let Some(fps) = meter.tick(clock.elapsed_ns()) {
                tracing::debug!(fps = %format!("{fps:.1}"), "Pipeline frame rate");
            }
            pause(self.config.frame_delay);
        }
    }

    /// Handle one frame. Returns whether the preview asked to quit.
    fn process_frame(
        &mut self,
        mut frame: Frame,
        sink: &mut dyn EventSink,
    ) -> HandwaveResult<bool> {
        frame.mirror();
        let hand = self.detector.detect(&frame.to_rgb())?;
        self.stats.frames_processed += 1;

        if let Some(hand) = &hand {
            self.stats.hand_frames += 1;
            if self.preview.wants_overlay() {
                draw_landmarks(&mut frame, hand, &self.config.overlay);
            }
        }

        for event in self.interpreter.process_frame(hand.as_ref()) {
            sink.send(event)?;
            self.stats.events_emitted += 1;
        }

        self.preview.show(&frame)?;
        self.preview.quit_requested()
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_camera() {
        let camera = CameraConfig {
            idle_delay_ms: 5,
            frame_delay_ms: 33,
            ..CameraConfig::default()
        };
        let config = PipelineConfig::from(&camera);
        assert_eq!(config.idle_delay, Duration::from_millis(5));
        assert_eq!(config.frame_delay, Duration::from_millis(33));
    }

    #[test]
    fn test_hand_rate() {
        let stats = PipelineStats {
            frames_processed: 4,
            hand_frames: 3,
            ..PipelineStats::default()
        };
        assert!((stats.hand_rate() - 75.0).abs() < 1e-9);
        assert_eq!(PipelineStats::default().hand_rate(), 0.0);
    }
}
